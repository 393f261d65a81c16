//! `agv-traffic` — traffic arbitration and deadlock recovery.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`arbiter`]  | `arbitrate` — pure verdict over a fleet snapshot        |
//! | [`recovery`] | WAIT bookkeeping, ranked detours, step-back, head-on    |
//!
//! # Division of labor
//!
//! The arbiter only *reads*: it classifies one vehicle's immediate intent
//! against the frozen fleet snapshot as MOVE / WAIT / REPATH and never
//! touches state.  Recovery only *writes*: given a verdict, it mutates the
//! single vehicle it was handed (speed decay, retry ladder, path surgery).
//! The simulation driver wires the two together, which keeps every tick
//! order-independent: all reads come from the snapshot, all writes stay
//! confined to the owning record.

pub mod arbiter;
pub mod recovery;


pub use arbiter::{arbitrate, Verdict};
pub use recovery::{handle_wait, repath_head_on};
