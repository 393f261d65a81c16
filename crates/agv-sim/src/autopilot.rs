//! Auto-pilot: keeps an idle fleet busy with random deliveries.
//!
//! Every tick, each resting vehicle independently decides (one Bernoulli
//! draw from the engine PRNG) whether to request a new delivery.  Candidate
//! targets exclude the vehicle's own node and every node already claimed as
//! another vehicle's target, so the fleet spreads out instead of piling onto
//! one destination.  Draws happen in fleet order, which keeps the stream
//! identical across runs.

use agv_core::NodeId;

use crate::engine::Engine;

/// Per-tick dispatch probability for a resting vehicle.
pub const DISPATCH_PROBABILITY: f64 = 0.05;

/// A vehicle still rolling faster than this is not yet dispatchable.
pub const DISPATCH_MAX_SPEED: f64 = 0.1;

/// Maybe assign a random target to the resting vehicle at `idx`.
pub(crate) fn try_dispatch(engine: &mut Engine, idx: usize) {
    if engine.fleet[idx].speed >= DISPATCH_MAX_SPEED {
        return;
    }
    if !engine.rng.gen_bool(DISPATCH_PROBABILITY) {
        return;
    }

    let me = engine.fleet[idx].id;
    let at = engine.fleet[idx].current_node;
    let claimed: Vec<NodeId> = engine
        .fleet
        .iter()
        .filter(|o| o.id != me)
        .filter_map(|o| o.target_node)
        .collect();
    let candidates: Vec<NodeId> = engine
        .graph
        .node_ids()
        .filter(|&n| n != at && !claimed.contains(&n))
        .collect();
    if candidates.is_empty() {
        return;
    }

    let goal = candidates[engine.rng.gen_index(candidates.len())];
    // An unreachable pick leaves the vehicle idle with the advisory reason;
    // the draws above are already consumed either way.
    let _ = engine.plan_route(idx, goal);
}
