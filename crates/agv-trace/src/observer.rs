//! `TraceObserver<W>` — bridges `SimObserver` to a `TraceWriter`.

use agv_core::Tick;
use agv_fleet::AgvState;
use agv_sim::SimObserver;

use crate::row::{AgvStateRow, TickSummaryRow};
use crate::writer::TraceWriter;
use crate::TraceError;

/// A [`SimObserver`] that streams per-vehicle samples and tick summaries to
/// any [`TraceWriter`] backend.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After the run, flush with
/// [`finish`][Self::finish] and check [`take_error`][Self::take_error].
pub struct TraceObserver<W: TraceWriter> {
    writer: W,
    /// Sample per-vehicle rows every this many ticks (1 = every tick).
    interval: u64,
    last_error: Option<TraceError>,
}

impl<W: TraceWriter> TraceObserver<W> {
    /// Create an observer backed by `writer`, sampling vehicle rows every
    /// `interval` ticks.  An interval of 0 disables vehicle sampling and
    /// keeps only the per-tick summaries.
    pub fn new(writer: W, interval: u64) -> Self {
        Self {
            writer,
            interval,
            last_error: None,
        }
    }

    /// Flush the underlying writer.  Idempotent.
    pub fn finish(&mut self) {
        let result = self.writer.finish();
        self.store_err(result);
    }

    /// Take the stored write error (if any) after the run.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<TraceError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::TraceResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: TraceWriter> SimObserver for TraceObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, fleet: &[AgvState]) {
        let mut moving = 0u32;
        let mut waiting = 0u32;
        let mut resting = 0u32;
        for agv in fleet {
            if agv.status.at_rest() {
                resting += 1;
            } else if agv.status.is_waiting() {
                waiting += 1;
            } else {
                moving += 1;
            }
        }
        let summary = TickSummaryRow {
            tick: tick.0,
            moving,
            waiting,
            resting,
        };
        let result = self.writer.write_tick_summary(&summary);
        self.store_err(result);

        if self.interval == 0 || tick.0 % self.interval != 0 {
            return;
        }
        let rows: Vec<AgvStateRow> = fleet
            .iter()
            .map(|agv| AgvStateRow {
                agv_id: agv.id.0,
                tick: tick.0,
                current_node: agv.current_node.0,
                status: agv.status.as_str(),
                x: agv.pos.x,
                y: agv.pos.y,
                speed: agv.speed,
            })
            .collect();
        if !rows.is_empty() {
            let result = self.writer.write_states(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        self.finish();
    }
}
