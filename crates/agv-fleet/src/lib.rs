//! `agv-fleet` — per-vehicle state and kinematics.
//!
//! # Crate layout
//!
//! | Module         | Contents                                             |
//! |----------------|------------------------------------------------------|
//! | [`state`]      | `AgvState`, `AgvStatus`, `WaitReason`, reservations  |
//! | [`kinematics`] | speed control, edge-progress advance, arrival commit |
//!
//! # Movement model
//!
//! A vehicle is anchored to the graph: `current_node` is the node it most
//! recently departed from (or rests at) and `path` holds the remaining node
//! sequence, front first.  `progress ∈ [0, 1]` and `progress_distance`
//! (pixels) locate it along the edge to `path[0]`; its floor position is the
//! interpolation of the two node positions.  Arrival rotates the path left
//! and re-anchors; an exhausted path completes the route.

pub mod kinematics;
pub mod state;


pub use state::{AgvState, AgvStatus, WaitReason};
