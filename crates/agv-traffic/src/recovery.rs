//! Deadlock recovery: timed retries, ranked detours, and step-back.
//!
//! A waiting vehicle climbs a ladder:
//!
//! 1. **Hold** — decelerate in place for `RETRY_INTERVAL` ticks.
//! 2. **Ranked detour** — replan around the blocked node, choosing the
//!    `path_rank`-th cheapest alternative.  The rank advances every
//!    `MAX_RETRIES_PER_RANK` retries, so repeated failures walk down the
//!    ranking instead of hammering the same route.
//! 3. **Step-back** — once retries pile up against a blocker that is itself
//!    stalled, retreat one node (or reverse on the current edge) to free
//!    the lane, then replan from the retreat node.
//!
//! Mid-edge path surgery uses the turn-on-edge construction: swap the edge's
//! end roles, prepend the old near node, invert `progress`.  The vehicle's
//! floor position is unchanged by the swap, so there is never a teleport —
//! it simply finishes the edge backwards.

use std::collections::VecDeque;

use agv_core::{AgvId, NodeId, MAX_RETRIES_PER_RANK, RETRY_INTERVAL};
use agv_fleet::kinematics::{self, ARRIVE_SNAP_DIST};
use agv_fleet::{AgvState, AgvStatus, WaitReason};
use agv_map::{find_path, find_ranked_paths, Avoid, Graph};
use agv_map::pathfind::DEFAULT_PATH_LIMIT;

use crate::arbiter::AT_NODE_PROGRESS;

/// Progress beyond which step-back reverses on the edge instead of
/// retreating from the node.
pub const STEP_BACK_MIN_PROGRESS: f64 = 0.1;

// ── WAIT handling ─────────────────────────────────────────────────────────────

/// Apply a WAIT verdict: decelerate, advance the retry ladder, and attempt
/// recovery when the timer expires.
///
/// `fleet` is the tick's read snapshot (used only to inspect the blocker's
/// status); all writes go to `agv`.
pub fn handle_wait(
    agv: &mut AgvState,
    reason: WaitReason,
    blocker: AgvId,
    fleet: &[AgvState],
    graph: &Graph,
) {
    kinematics::decelerate(agv);
    if !agv.status.is_waiting() {
        agv.status = AgvStatus::Waiting;
    }
    agv.wait_reason = Some(reason);
    agv.blocker = Some(blocker);
    agv.wait_timer += 1;

    if agv.wait_timer <= RETRY_INTERVAL {
        return;
    }
    agv.wait_timer = 0;
    agv.retry_count += 1;

    // Step-back: only once retries have piled up against a blocker that is
    // itself going nowhere (waiting, blocked, or parked without a target).
    let blocker_stalled = fleet
        .iter()
        .find(|o| o.id == blocker)
        .is_some_and(|o| o.status.is_stalled());
    if agv.retry_count >= MAX_RETRIES_PER_RANK && blocker_stalled && step_back(agv, graph) {
        agv.retry_count = 0;
        return;
    }

    if agv.retry_count >= MAX_RETRIES_PER_RANK {
        agv.path_rank += 1;
    }
    if !try_detour(agv, graph) {
        // No alternative this round; keep waiting, flagged as blocked.
        agv.status = AgvStatus::Blocked;
    }
}

// ── Head-on repath ────────────────────────────────────────────────────────────

/// Apply a REPATH_HEAD_ON verdict: replan immediately, avoiding the
/// offending edge.
///
/// At a node the path is simply replaced; mid-edge the vehicle reverses via
/// the turn-on-edge construction and detours from the near end.  Returns
/// `false` when no alternative route exists — the caller should fall back
/// to WAIT handling.
pub fn repath_head_on(agv: &mut AgvState, avoid_edge: (NodeId, NodeId), graph: &Graph) -> bool {
    let Some(target) = agv.target_node else {
        return false;
    };
    let avoid = Avoid::edge(avoid_edge.0, avoid_edge.1);
    let Ok(tail) = find_path(graph, agv.current_node, target, &avoid) else {
        return false;
    };

    if can_reanchor(agv) {
        if tail.is_empty() {
            // Already at the target; nothing left to cross.
            agv.clear_navigation(AgvStatus::Completed);
            return true;
        }
        agv.path = tail.into();
        snap_to_anchor(agv, graph);
    } else if !reverse_on_edge(agv, graph, tail) {
        return false;
    }
    agv.status = AgvStatus::Repathing;

    agv.path_rank = 0;
    agv.reset_wait();
    agv.refresh_reservations();
    true
}

// ── Ranked detour ─────────────────────────────────────────────────────────────

/// Replan around the blocked next node using the ranked-path enumeration,
/// choosing the `path_rank`-th cheapest alternative (clamped).
///
/// Returns `false` when no alternative exists; the vehicle's route is left
/// untouched in that case.
fn try_detour(agv: &mut AgvState, graph: &Graph) -> bool {
    let Some(target) = agv.target_node else {
        return false;
    };
    let Some(blocked) = agv.next_node() else {
        return false;
    };

    let avoid = Avoid::node(blocked);
    let ranked = find_ranked_paths(graph, agv.current_node, target, &avoid, DEFAULT_PATH_LIMIT);
    if ranked.is_empty() {
        return false;
    }
    let pick = &ranked[agv.path_rank.min(ranked.len() - 1)];

    if can_reanchor(agv) {
        agv.path = pick.nodes.clone().into();
        snap_to_anchor(agv, graph);
        agv.status = AgvStatus::Detour;
    } else {
        // Too far onto the edge: back off it first, then take the detour.
        if !reverse_on_edge(agv, graph, pick.nodes.clone()) {
            return false;
        }
        agv.status = AgvStatus::Repathing;
    }

    agv.wait_reason = None;
    agv.blocker = None;
    agv.refresh_reservations();
    true
}

// ── Step-back ─────────────────────────────────────────────────────────────────

/// Retreat one node to free the lane, then replan from the retreat node.
///
/// Mid-edge the retreat is a reversal on the current edge; at a node the
/// vehicle backs off to `previous_node` when still adjacent, otherwise to
/// any neighbor other than the blocked one.  Returns `false` if no retreat
/// or no replan is possible.
fn step_back(agv: &mut AgvState, graph: &Graph) -> bool {
    let Some(target) = agv.target_node else {
        return false;
    };
    let Some(next) = agv.next_node() else {
        return false;
    };

    if agv.progress > STEP_BACK_MIN_PROGRESS || agv.progress_distance > ARRIVE_SNAP_DIST {
        let Ok(tail) = find_path(graph, agv.current_node, target, &Avoid::none()) else {
            return false;
        };
        if !reverse_on_edge(agv, graph, tail) {
            return false;
        }
        agv.status = AgvStatus::Repathing;
    } else {
        let retreat = match agv
            .previous_node
            .filter(|&p| graph.are_adjacent(agv.current_node, p))
        {
            Some(p) => p,
            None => {
                match graph
                    .neighbors(agv.current_node)
                    .map(|(n, _)| n)
                    .find(|&n| n != next)
                {
                    Some(n) => n,
                    None => return false,
                }
            }
        };
        let Ok(tail) = find_path(graph, retreat, target, &Avoid::none()) else {
            return false;
        };

        let mut path = VecDeque::with_capacity(tail.len() + 1);
        path.push_back(retreat);
        path.extend(tail);
        agv.path = path;
        snap_to_anchor(agv, graph);
        agv.status = AgvStatus::Detour;
    }

    agv.wait_reason = None;
    agv.blocker = None;
    agv.refresh_reservations();
    true
}

// ── Path surgery helpers ──────────────────────────────────────────────────────

/// Turn-on-edge construction: swap the current edge's end roles so the
/// vehicle finishes it backwards, then continue with `tail` (a route planned
/// from the old near node).
///
/// `progress` inverts, `progress_distance` rescales, and the floor position
/// is untouched — no teleport.
fn reverse_on_edge(agv: &mut AgvState, graph: &Graph, tail: Vec<NodeId>) -> bool {
    let near = agv.current_node;
    let Some(far) = agv.next_node() else {
        return false;
    };
    let Some(edge_len) = graph.edge_length(near, far) else {
        return false;
    };

    agv.current_node = far;
    let mut path = VecDeque::with_capacity(tail.len() + 1);
    path.push_back(near);
    path.extend(tail);
    agv.path = path;

    agv.progress = (1.0 - agv.progress).clamp(0.0, 1.0);
    agv.progress_distance = edge_len * agv.progress;
    true
}

/// A replanned path may be swapped in at the current node only when the
/// positional correction stays inside the arrival-snap allowance.  Farther
/// onto the edge the vehicle must finish it backwards instead, no matter
/// how small the progress fraction looks on a long edge.
#[inline]
fn can_reanchor(agv: &AgvState) -> bool {
    agv.progress < AT_NODE_PROGRESS && agv.progress_distance <= ARRIVE_SNAP_DIST
}

/// Re-anchor a vehicle that replanned at its current node: zero the edge
/// progress and pull the position onto the node.  Callers gate on
/// [`can_reanchor`], which bounds the shift to the arrival-snap allowance.
fn snap_to_anchor(agv: &mut AgvState, graph: &Graph) {
    agv.progress = 0.0;
    agv.progress_distance = 0.0;
    if let Some(p) = graph.position(agv.current_node) {
        agv.pos = p;
    }
}
