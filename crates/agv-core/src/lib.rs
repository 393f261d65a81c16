//! `agv-core` — foundational types for the `agv-sim` warehouse fleet
//! simulator.
//!
//! This crate is a dependency of every other `agv-*` crate.  It intentionally
//! has no `agv-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                           |
//! |------------|----------------------------------------------------|
//! | [`ids`]    | `AgvId`, `NodeId`                                  |
//! | [`geom`]   | `Point`, Euclidean distance, headings              |
//! | [`tick`]   | `Tick` counter                                     |
//! | [`rng`]    | `SimRng` — the seeded engine generator             |
//! | [`config`] | `VehicleConfig`, `ConfigKey`, fleet constants      |
//! | [`error`]  | `CoreError`, `CoreResult`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod config;
pub mod error;
pub mod geom;
pub mod ids;
pub mod rng;
pub mod tick;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ConfigKey, VehicleConfig, MAX_RETRIES_PER_RANK, RETRY_INTERVAL};
pub use error::{CoreError, CoreResult};
pub use geom::Point;
pub use ids::{AgvId, NodeId};
pub use rng::SimRng;
pub use tick::Tick;
