//! The `TraceWriter` trait implemented by all backend writers.

use crate::{AgvStateRow, TickSummaryRow, TraceResult};

/// Trait implemented by trace backends.
///
/// All methods are infallible from the observer's perspective — errors are
/// stored inside [`TraceObserver`][crate::TraceObserver] and retrieved with
/// `take_error` after the run.
pub trait TraceWriter {
    /// Write a batch of per-vehicle state rows.
    fn write_states(&mut self, rows: &[AgvStateRow]) -> TraceResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> TraceResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> TraceResult<()>;
}
