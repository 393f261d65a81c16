//! The `Engine` struct and its command interface.
//!
//! The engine exclusively owns the fleet.  External callers observe through
//! [`Engine::snapshot`] (a deep copy) and mutate through the narrow command
//! surface: `spawn`, `set_target`, `remove_agv`, `update_config`,
//! `set_auto_pilot`, `set_map`, `tick`.  Commands apply immediately between
//! ticks; a tick itself is indivisible.

use std::collections::VecDeque;

use agv_core::{AgvId, ConfigKey, NodeId, Point, SimRng, Tick, VehicleConfig};
use agv_fleet::{AgvState, AgvStatus, WaitReason};
use agv_map::{find_path, Avoid, Graph, MapData};

use crate::error::{EngineError, EngineResult};

// ── FleetSnapshot ─────────────────────────────────────────────────────────────

/// A read-only copy of the fleet at one tick boundary.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleetSnapshot {
    pub agvs: Vec<AgvState>,
    pub now: Tick,
}

// ── EngineBuilder ─────────────────────────────────────────────────────────────

/// Fluent builder for [`Engine`].
///
/// # Required inputs
///
/// - [`MapData`] — the generated floor plan.
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                        |
/// |-----------------|--------------------------------|
/// | `.defaults(c)`  | `VehicleConfig::default()`     |
/// | `.seed(u32)` / `.seed_str(s)` | `0`              |
/// | `.auto_pilot(b)`| `false`                        |
///
/// # Example
///
/// ```rust,ignore
/// let map = generate_map("floor-3", 50);
/// let mut engine = EngineBuilder::new(map)
///     .seed_str("floor-3")
///     .auto_pilot(true)
///     .build();
/// ```
pub struct EngineBuilder {
    map: MapData,
    defaults: VehicleConfig,
    seed: u32,
    auto_pilot: bool,
}

impl EngineBuilder {
    pub fn new(map: MapData) -> Self {
        Self {
            map,
            defaults: VehicleConfig::default(),
            seed: 0,
            auto_pilot: false,
        }
    }

    /// Fleet-default vehicle configuration, copied into each spawn.
    pub fn defaults(mut self, config: VehicleConfig) -> Self {
        self.defaults = config;
        self
    }

    /// Raw seed for the engine PRNG (auto-pilot and spawn placement).
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Seed the engine PRNG from a configuration string.
    pub fn seed_str(mut self, seed: &str) -> Self {
        self.seed = agv_core::rng::hash_seed(seed);
        self
    }

    pub fn auto_pilot(mut self, on: bool) -> Self {
        self.auto_pilot = on;
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            graph: Graph::from_map(&self.map),
            fleet: Vec::new(),
            defaults: self.defaults,
            rng: SimRng::new(self.seed),
            now: Tick::ZERO,
            auto_pilot: self.auto_pilot,
            next_agv_id: 0,
            plan_seq: 0,
        }
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// The simulation engine: graph, fleet, PRNG, and clock.
pub struct Engine {
    pub(crate) graph: Graph,
    pub(crate) fleet: Vec<AgvState>,
    pub(crate) defaults: VehicleConfig,
    pub(crate) rng: SimRng,
    pub(crate) now: Tick,
    pub(crate) auto_pilot: bool,
    pub(crate) next_agv_id: u32,
    /// Monotonic planning counter backing `AgvState::plan_stamp`.
    pub(crate) plan_seq: u64,
}

impl Engine {
    /// All-defaults construction; see [`EngineBuilder`] for the full set of
    /// knobs.
    pub fn new(map: MapData, defaults: VehicleConfig) -> Engine {
        EngineBuilder::new(map).defaults(defaults).build()
    }

    // ── Read surface ──────────────────────────────────────────────────────

    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Read-only view of the live fleet, in spawn order.
    pub fn fleet(&self) -> &[AgvState] {
        &self.fleet
    }

    pub fn agv(&self, id: AgvId) -> Option<&AgvState> {
        self.fleet.iter().find(|a| a.id == id)
    }

    /// Deep copy of the fleet for external consumers.
    pub fn snapshot(&self) -> FleetSnapshot {
        FleetSnapshot {
            agvs: self.fleet.clone(),
            now: self.now,
        }
    }

    /// Map a floor position (e.g. a pointer click) to the nearest node.
    pub fn nearest_node(&self, pos: Point) -> Option<NodeId> {
        self.graph.snap_to_node(pos)
    }

    /// The `k` nodes nearest to `pos`, closest first.
    pub fn k_nearest(&self, pos: Point, k: usize) -> Vec<NodeId> {
        self.graph.k_nearest(pos, k)
    }

    // ── Commands ──────────────────────────────────────────────────────────

    pub fn set_auto_pilot(&mut self, on: bool) {
        self.auto_pilot = on;
    }

    /// Atomically clear the fleet and swap in a new floor plan.
    ///
    /// The clock and id counters restart; the PRNG stream continues, so a
    /// fixed command trace stays reproducible across the swap.
    pub fn set_map(&mut self, map: MapData) {
        self.graph = Graph::from_map(&map);
        self.fleet.clear();
        self.now = Tick::ZERO;
        self.next_agv_id = 0;
        self.plan_seq = 0;
    }

    /// Spawn a vehicle on a clear node.
    ///
    /// Prefers nodes at least `2 × safety_distance` away from every live
    /// vehicle; falls back to a uniform random node when the floor is
    /// crowded.  Errors only on an empty map.
    pub fn spawn(&mut self) -> EngineResult<AgvId> {
        if self.graph.is_empty() {
            return Err(EngineError::EmptyMap);
        }

        let spacing = 2.0 * self.defaults.safety_distance;
        let clear: Vec<NodeId> = self
            .graph
            .node_ids()
            .filter(|&n| match self.graph.position(n) {
                Some(p) => self.fleet.iter().all(|a| a.pos.distance(p) >= spacing),
                None => false,
            })
            .collect();

        let node = if clear.is_empty() {
            NodeId(self.rng.gen_index(self.graph.node_count()) as u32)
        } else {
            clear[self.rng.gen_index(clear.len())]
        };
        let pos = self
            .graph
            .position(node)
            .ok_or(EngineError::UnknownNode(node))?;

        let id = AgvId(self.next_agv_id);
        self.next_agv_id += 1;
        self.fleet.push(AgvState::new(id, node, pos, self.defaults));
        Ok(id)
    }

    /// Spawn a vehicle on a specific node (scripted placement).
    ///
    /// Skips the spacing heuristic and consumes no PRNG draws; scenario
    /// setups and host editors use this for exact initial conditions.
    pub fn spawn_at(&mut self, node: NodeId) -> EngineResult<AgvId> {
        let pos = self
            .graph
            .position(node)
            .ok_or(EngineError::UnknownNode(node))?;
        let id = AgvId(self.next_agv_id);
        self.next_agv_id += 1;
        self.fleet.push(AgvState::new(id, node, pos, self.defaults));
        Ok(id)
    }

    /// Remove a vehicle from the fleet (its lease disappears with it).
    pub fn remove_agv(&mut self, id: AgvId) -> EngineResult<()> {
        let idx = self.index_of(id).ok_or(EngineError::UnknownAgv(id))?;
        self.fleet.remove(idx);
        Ok(())
    }

    /// Plan and assign a new target, cancelling any navigation in progress.
    ///
    /// Mid-edge, planning starts from the far end of the current edge and
    /// the path is prefixed with it, so the vehicle finishes the edge first.
    /// An unreachable goal returns [`EngineError::NoPath`] and leaves the
    /// vehicle idle (at a node) or finishing its edge (mid-route), with the
    /// `no path` advisory set either way.
    pub fn set_target(&mut self, id: AgvId, goal: NodeId) -> EngineResult<()> {
        if !self.graph.contains(goal) {
            return Err(EngineError::UnknownNode(goal));
        }
        let idx = self.index_of(id).ok_or(EngineError::UnknownAgv(id))?;
        self.plan_route(idx, goal)
    }

    /// Update one config key, for one vehicle or (with `None`) for the
    /// fleet default and every live vehicle.
    pub fn update_config(
        &mut self,
        id: Option<AgvId>,
        key: ConfigKey,
        value: f64,
    ) -> EngineResult<()> {
        match id {
            Some(id) => {
                let idx = self.index_of(id).ok_or(EngineError::UnknownAgv(id))?;
                self.fleet[idx].config.set(key, value)?;
                if key == ConfigKey::HardBorrowLength {
                    self.fleet[idx].refresh_reservations();
                }
            }
            None => {
                self.defaults.set(key, value)?;
                for agv in &mut self.fleet {
                    agv.config.set(key, value)?;
                    if key == ConfigKey::HardBorrowLength {
                        agv.refresh_reservations();
                    }
                }
            }
        }
        Ok(())
    }

    // ── Internals ─────────────────────────────────────────────────────────

    pub(crate) fn index_of(&self, id: AgvId) -> Option<usize> {
        self.fleet.iter().position(|a| a.id == id)
    }

    /// Route `fleet[idx]` to `goal`.  Shared by `set_target` and the
    /// auto-pilot.
    pub(crate) fn plan_route(&mut self, idx: usize, goal: NodeId) -> EngineResult<()> {
        self.plan_seq += 1;
        let stamp = self.plan_seq;
        let graph = &self.graph;
        let agv = &mut self.fleet[idx];

        // Re-targeting the current destination is a no-op modulo the stamp.
        if agv.target_node == Some(goal) && !agv.path.is_empty() {
            agv.plan_stamp = stamp;
            return Ok(());
        }

        if agv.progress > 0.0 && !agv.path.is_empty() {
            // Mid-edge: the far end of the current edge is the fixed point.
            let from = agv.path[0];
            match find_path(graph, from, goal, &Avoid::none()) {
                Ok(tail) => {
                    let mut path = VecDeque::with_capacity(tail.len() + 1);
                    path.push_back(from);
                    path.extend(tail);
                    agv.path = path;
                    assign_plan(agv, goal, stamp);
                    Ok(())
                }
                Err(_) => {
                    // Unreachable: finish the current edge, then stop there.
                    agv.path.truncate(1);
                    assign_plan(agv, from, stamp);
                    agv.wait_reason = Some(WaitReason::NoPath);
                    Err(EngineError::NoPath { from, to: goal })
                }
            }
        } else {
            let start = agv.current_node;
            if start == goal {
                agv.clear_navigation(AgvStatus::Completed);
                agv.plan_stamp = stamp;
                return Ok(());
            }
            match find_path(graph, start, goal, &Avoid::none()) {
                Ok(tail) => {
                    agv.path = tail.into();
                    agv.progress = 0.0;
                    agv.progress_distance = 0.0;
                    assign_plan(agv, goal, stamp);
                    Ok(())
                }
                Err(_) => {
                    agv.clear_navigation(AgvStatus::Idle);
                    agv.wait_reason = Some(WaitReason::NoPath);
                    agv.plan_stamp = stamp;
                    Err(EngineError::NoPath { from: start, to: goal })
                }
            }
        }
    }
}

/// Common tail of a successful plan assignment.
fn assign_plan(agv: &mut AgvState, goal: NodeId, stamp: u64) {
    agv.target_node = Some(goal);
    agv.status = AgvStatus::Planning;
    agv.path_rank = 0;
    agv.reset_wait();
    agv.plan_stamp = stamp;
    agv.refresh_reservations();
}
