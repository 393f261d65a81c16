//! `agv-sim` — the fleet simulation engine.
//!
//! # Tick pipeline
//!
//! ```text
//! for each tick:
//!   ① Snapshot  — clone the fleet as this tick's frozen read state.
//!   ② Verdicts  — arbitrate each vehicle against the snapshot
//!                 (agv-traffic::arbitrate, pure).
//!   ③ Apply     — per vehicle, in fleet order, writes confined to the
//!                 owning record:
//!                   Move          → kinematic advance (agv-fleet)
//!                   Wait          → retry ladder / recovery (agv-traffic)
//!                   RepathHeadOn  → immediate constrained replan
//!   ④ Advance the clock.
//! ```
//!
//! Reads always come from the snapshot and writes only touch the vehicle
//! being stepped, so results are independent of iteration order and every
//! run is bit-exact reproducible for a fixed seed and command trace.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use agv_map::generate_map;
//! use agv_sim::{EngineBuilder, NoopObserver};
//!
//! let map = generate_map("warehouse-1", 50);
//! let mut engine = EngineBuilder::new(map).seed_str("warehouse-1").build();
//! let agv = engine.spawn()?;
//! engine.set_auto_pilot(true);
//! engine.run_ticks(10_000, &mut NoopObserver);
//! let snap = engine.snapshot();
//! ```

pub mod autopilot;
pub mod driver;
pub mod engine;
pub mod error;
pub mod observer;


pub use engine::{Engine, EngineBuilder, FleetSnapshot};
pub use error::{EngineError, EngineResult};
pub use observer::{NoopObserver, SimObserver};
