//! The per-tick fleet update pipeline.

use agv_fleet::{kinematics, AgvState, AgvStatus, WaitReason};
use agv_traffic::{arbitrate, recovery, Verdict};

use crate::autopilot;
use crate::engine::Engine;
use crate::observer::SimObserver;

impl Engine {
    /// Advance the simulation by one tick.
    ///
    /// The fleet state captured at the start of the tick is the read
    /// snapshot for every vehicle's arbitration; writes go to the live
    /// fleet, confined to the vehicle being stepped.  This gives the tick
    /// simultaneous-move semantics — iteration order within a tick cannot
    /// change the outcome.
    pub fn tick(&mut self) {
        let snapshot = self.fleet.clone();
        for idx in 0..self.fleet.len() {
            self.step_agv(idx, &snapshot);
        }
        self.now = self.now + 1;
    }

    /// Run `n` ticks, invoking observer hooks at every tick boundary and
    /// `on_sim_end` once the batch finishes.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            let t = self.now;
            observer.on_tick_start(t);
            self.tick();
            observer.on_tick_end(t, &self.fleet);
        }
        observer.on_sim_end(self.now);
    }

    /// One vehicle's slice of the tick: verdict, then apply.
    fn step_agv(&mut self, idx: usize, snapshot: &[AgvState]) {
        let status = self.fleet[idx].status;

        if status.at_rest() {
            if self.auto_pilot {
                autopilot::try_dispatch(self, idx);
            }
            return;
        }

        if self.fleet[idx].path.is_empty() {
            // A route ran dry without an arrival commit (degenerate state):
            // settle the vehicle where it stands.
            let finished = self.fleet[idx].target_node.is_some();
            self.fleet[idx].clear_navigation(if finished {
                AgvStatus::Completed
            } else {
                AgvStatus::Idle
            });
            return;
        }

        match arbitrate(&snapshot[idx], snapshot, &self.graph) {
            Verdict::Move => {
                let agv = &mut self.fleet[idx];
                agv.reset_wait();
                agv.status = AgvStatus::Moving;
                kinematics::advance(agv, &self.graph);
            }
            Verdict::Wait { reason, blocker } => {
                recovery::handle_wait(&mut self.fleet[idx], reason, blocker, snapshot, &self.graph);
            }
            Verdict::RepathHeadOn { avoid, blocker } => {
                if !recovery::repath_head_on(&mut self.fleet[idx], avoid, &self.graph) {
                    // No way around the contested edge: hold and let the
                    // retry ladder take over.
                    recovery::handle_wait(
                        &mut self.fleet[idx],
                        WaitReason::NoPath,
                        blocker,
                        snapshot,
                        &self.graph,
                    );
                }
            }
        }
    }
}
