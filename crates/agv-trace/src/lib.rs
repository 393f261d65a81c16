//! `agv-trace` — run traces for fleet simulations.
//!
//! A [`TraceObserver`] plugs into `agv_sim::SimObserver` and streams two
//! tables through any [`TraceWriter`] backend:
//!
//! - per-vehicle state rows, sampled every `interval` ticks,
//! - one fleet summary row per tick (status counts).
//!
//! The bundled backend is CSV ([`CsvTraceWriter`]); traces are diagnostics,
//! not persistence — the simulation itself is always regenerated from its
//! seed.
//!
//! # Usage
//!
//! ```rust,ignore
//! use agv_trace::{CsvTraceWriter, TraceObserver};
//!
//! let writer = CsvTraceWriter::new(Path::new("./trace"))?;
//! let mut obs = TraceObserver::new(writer, 10);
//! engine.run_ticks(10_000, &mut obs);
//! obs.finish();
//! if let Some(e) = obs.take_error() { eprintln!("trace error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use self::csv::CsvTraceWriter;
pub use error::{TraceError, TraceResult};
pub use observer::TraceObserver;
pub use row::{AgvStateRow, TickSummaryRow};
pub use writer::TraceWriter;
