//! The traffic arbitration rule set.
//!
//! `arbitrate` is a pure function from (ego vehicle, fleet snapshot, graph
//! geometry) to a verdict.  Rules are evaluated in a fixed order, each
//! scanning the snapshot in fleet order; the first rule that fires wins.
//!
//! | #   | Trigger              | Verdict                          |
//! |-----|----------------------|----------------------------------|
//! | R0  | Next node leased by an earlier planner | WAIT (reserved) |
//! | R1  | Head-on pair on one edge | REPATH for the lower id      |
//! | R2a | Stationary occupant on the next node | WAIT (occupied)  |
//! | R2b | Entry contention, other is closer | WAIT (yield entry)  |
//! | R3  | Occupant still near the node ahead | WAIT (node busy)   |
//! | R4  | Mid-edge merge, other is closer | WAIT (merge yield)    |
//! | R5  | Forward sensor sees a closing vehicle | WAIT (sensor)   |
//!
//! Two refinements keep the rule set coherent under the snapshot-based
//! simultaneous update (both recorded in DESIGN.md): R0 honors first-come
//! priority via `plan_stamp`, and R1 fires only for the lower-id vehicle of
//! a head-on pair — its counterpart falls through to the WAIT rules.  Both
//! asymmetries exist because the two vehicles read the same snapshot and
//! would otherwise always act in lockstep.

use std::f64::consts::FRAC_PI_2;

use agv_core::geom::normalize_angle;
use agv_core::{AgvId, NodeId};
use agv_fleet::{AgvState, WaitReason};
use agv_map::Graph;

/// Progress below which a vehicle counts as "at" its current node.
pub const AT_NODE_PROGRESS: f64 = 0.05;

/// R3 radius: an occupant within this many pixels of the node ahead blocks
/// entry even while moving off it.
pub const NODE_PROXIMITY: f64 = 60.0;

/// R2b slack: contenders within this distance of each other tie on ids.
pub const ENTRY_TIE_SLACK: f64 = 5.0;

/// R4 slack: the farther vehicle yields once it trails by more than this.
pub const MERGE_SLACK: f64 = 15.0;

// ── Verdict ───────────────────────────────────────────────────────────────────

/// The arbitration outcome for one vehicle on one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Clear to advance along the current edge.
    Move,
    /// Hold position; `blocker` is the vehicle the rule fired against.
    Wait { reason: WaitReason, blocker: AgvId },
    /// Replan immediately, avoiding the undirected edge `avoid`.
    RepathHeadOn { avoid: (NodeId, NodeId), blocker: AgvId },
}

/// Classify `ego`'s immediate intent against the fleet snapshot.
///
/// Pure: identical inputs always produce the identical verdict.  A vehicle
/// with no route, or whose node lookups fail, is waved through — the
/// kinematics treat the same malformed state as a no-op.
pub fn arbitrate(ego: &AgvState, fleet: &[AgvState], graph: &Graph) -> Verdict {
    let Some(next) = ego.next_node() else {
        return Verdict::Move;
    };
    let (Some(ego_node_pos), Some(next_pos)) =
        (graph.position(ego.current_node), graph.position(next))
    else {
        return Verdict::Move;
    };

    let at_node = ego.progress < AT_NODE_PROGRESS;

    // ── R0: reservation block ─────────────────────────────────────────────
    //
    // Leases are advisory and only read here.  First-come priority: a lease
    // only blocks ego if its holder planned earlier (ties to the lower id),
    // otherwise two vehicles leasing the same node would deadlock.
    if at_node {
        for other in others(fleet, ego.id) {
            if other.reserved_nodes.contains(&next) && planned_before(other, ego) {
                return Verdict::Wait {
                    reason: WaitReason::NodeReserved(next),
                    blocker: other.id,
                };
            }
        }
    }

    // ── R1: head-on ───────────────────────────────────────────────────────
    for other in others(fleet, ego.id) {
        if other.current_node == next
            && other.next_node() == Some(ego.current_node)
            && ego.id < other.id
        {
            return Verdict::RepathHeadOn {
                avoid: (ego.current_node, next),
                blocker: other.id,
            };
        }
    }

    // ── R2a: stationary occupant on the destination node ──────────────────
    //
    // A vehicle with no route is stationary regardless of its progress
    // marker (completed vehicles keep progress = 1 from their last arrival).
    if at_node {
        for other in others(fleet, ego.id) {
            if other.current_node == next
                && (other.progress < AT_NODE_PROGRESS || other.path.is_empty())
            {
                return Verdict::Wait {
                    reason: WaitReason::DestOccupied,
                    blocker: other.id,
                };
            }
        }
    }

    // ── R2b: entry contention ─────────────────────────────────────────────
    if at_node {
        let d_ego = ego.pos.distance(next_pos);
        for other in others(fleet, ego.id) {
            if other.next_node() != Some(next) {
                continue;
            }
            let d_other = other.pos.distance(next_pos);
            let other_wins = d_other + ENTRY_TIE_SLACK < d_ego
                || ((d_ego - d_other).abs() <= ENTRY_TIE_SLACK && other.id < ego.id);
            if other_wins {
                return Verdict::Wait {
                    reason: WaitReason::YieldEntry,
                    blocker: other.id,
                };
            }
        }
    }

    // ── R3: moving occupant still near the node ahead ─────────────────────
    for other in others(fleet, ego.id) {
        if other.current_node == next && ego_node_pos.distance(other.pos) < NODE_PROXIMITY {
            return Verdict::Wait {
                reason: WaitReason::NodeOccupied(next),
                blocker: other.id,
            };
        }
    }

    // ── R4: mid-edge merge ────────────────────────────────────────────────
    if !at_node {
        let d_ego = ego.pos.distance(next_pos);
        for other in others(fleet, ego.id) {
            if other.next_node() == Some(next)
                && d_ego > other.pos.distance(next_pos) + MERGE_SLACK
            {
                return Verdict::Wait {
                    reason: WaitReason::MergeYield,
                    blocker: other.id,
                };
            }
        }
    }

    // ── R5: forward proximity sensor ──────────────────────────────────────
    //
    // Predicts one physics step ahead at the current raw speed; a vehicle at
    // standstill therefore never trips its own sensor.  Only obstacles in
    // the front half-plane count.
    let heading = ego_node_pos.heading_to(next_pos);
    for other in others(fleet, ego.id) {
        let gap = ego.pos.distance(other.pos);
        if gap >= ego.config.safety_distance {
            continue;
        }
        let bearing = normalize_angle(ego.pos.heading_to(other.pos) - heading);
        if bearing.abs() >= FRAC_PI_2 {
            continue;
        }
        let future = ego.pos.advance(heading, ego.speed);
        if future.distance(other.pos) < gap {
            return Verdict::Wait {
                reason: WaitReason::FrontSensor,
                blocker: other.id,
            };
        }
    }

    Verdict::Move
}

#[inline]
fn others(fleet: &[AgvState], ego: AgvId) -> impl Iterator<Item = &AgvState> {
    fleet.iter().filter(move |o| o.id != ego)
}

/// First-come ordering: earlier `plan_stamp` wins, ties to the lower id.
#[inline]
fn planned_before(a: &AgvState, b: &AgvState) -> bool {
    (a.plan_stamp, a.id) < (b.plan_stamp, b.id)
}
