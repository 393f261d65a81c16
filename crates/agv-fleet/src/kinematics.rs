//! Speed control and edge-progress advance.
//!
//! The model is a point mass with bounded acceleration: each tick the speed
//! converges toward a target (the speed cap, or zero when the remaining
//! distance on the final edge falls inside the braking envelope), then the
//! vehicle advances by the new speed along its current edge.  Two snap rules
//! keep arrivals crisp: the braking envelope carries a fixed margin, and a
//! slow vehicle within a few pixels of its goal is pulled onto the node
//! instead of creeping forever.
//!
//! All functions are infallible: a malformed node lookup degrades to a
//! no-op for the tick and the vehicle is left unchanged.

use agv_core::geom::to_degrees;
use agv_core::NodeId;
use agv_map::Graph;

use crate::state::{AgvState, AgvStatus};

/// Extra pixels added to the braking distance before braking starts.
pub const BRAKE_MARGIN: f64 = 5.0;

/// Within this many pixels of the goal node, a slow vehicle snaps to it.
pub const ARRIVE_SNAP_DIST: f64 = 10.0;

/// Speed below which the arrival snap may fire.
pub const ARRIVE_SNAP_SPEED: f64 = 0.5;

/// Advance `agv` one tick along its current edge (MOVE verdict).
///
/// Returns the node reached if this tick completed an edge, `None`
/// otherwise.  Also performs the arrival commit: path rotation, anchor
/// update, completion, and lease refresh.
pub fn advance(agv: &mut AgvState, graph: &Graph) -> Option<NodeId> {
    let next = agv.next_node()?;
    let from = graph.position(agv.current_node)?;
    let to = graph.position(next)?;

    let edge_len = from.distance(to);
    if edge_len <= f64::EPSILON {
        // Degenerate edge: treat as instantly crossed.
        return Some(commit_arrival(agv, graph, next));
    }

    // ── Target speed ──────────────────────────────────────────────────────
    let mut target_speed = agv.config.max_speed;
    let remaining = edge_len - agv.progress_distance;
    if agv.on_final_edge() {
        let braking_distance = agv.speed * agv.speed / (2.0 * agv.config.deceleration);
        if remaining <= braking_distance + BRAKE_MARGIN {
            target_speed = 0.0;
        }
    }

    // ── Converge speed toward the target ──────────────────────────────────
    let new_speed = if agv.speed < target_speed {
        (agv.speed + agv.config.acceleration).min(target_speed)
    } else {
        (agv.speed - agv.config.deceleration).max(target_speed)
    }
    .clamp(0.0, agv.config.max_speed);
    agv.speed = new_speed;

    // ── Advance along the edge ────────────────────────────────────────────
    agv.progress_distance += new_speed;
    agv.progress = (agv.progress_distance / edge_len).clamp(0.0, 1.0);

    // Snap-to-arrival: avoid creeping the last few pixels at near-zero speed.
    if agv.on_final_edge()
        && edge_len - agv.progress_distance < ARRIVE_SNAP_DIST
        && new_speed < ARRIVE_SNAP_SPEED
    {
        agv.progress = 1.0;
        agv.progress_distance = edge_len;
    }

    agv.pos = from.lerp(to, agv.progress);
    agv.orientation_deg = to_degrees(from.heading_to(to));

    if agv.progress >= 1.0 {
        return Some(commit_arrival(agv, graph, next));
    }
    None
}

/// Shed speed without advancing (WAIT verdict).
pub fn decelerate(agv: &mut AgvState) {
    agv.speed = (agv.speed - agv.config.deceleration).max(0.0);
}

/// Commit arrival at `node`: re-anchor, rotate the path, complete or keep
/// rolling.
fn commit_arrival(agv: &mut AgvState, graph: &Graph, node: NodeId) -> NodeId {
    if let Some(p) = graph.position(node) {
        agv.pos = p;
    }
    agv.path.pop_front();
    agv.previous_node = Some(agv.current_node);
    agv.current_node = node;

    if agv.path.is_empty() {
        // Keep progress = 1 as the arrival marker for observers.
        agv.progress = 1.0;
        agv.clear_navigation(AgvStatus::Completed);
    } else {
        agv.progress = 0.0;
        agv.progress_distance = 0.0;
        agv.status = AgvStatus::Moving;
        agv.refresh_reservations();
    }
    node
}
