//! CSV trace backend.
//!
//! Creates two files in the configured output directory:
//! - `agv_states.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::TraceWriter;
use crate::{AgvStateRow, TickSummaryRow, TraceResult};

/// Writes run traces to two CSV files.
pub struct CsvTraceWriter {
    states: Writer<File>,
    summaries: Writer<File>,
    finished: bool,
}

impl CsvTraceWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> TraceResult<Self> {
        let mut states = Writer::from_path(dir.join("agv_states.csv"))?;
        states.write_record(["agv_id", "tick", "current_node", "status", "x", "y", "speed"])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(["tick", "moving", "waiting", "resting"])?;

        Ok(Self {
            states,
            summaries,
            finished: false,
        })
    }
}

impl TraceWriter for CsvTraceWriter {
    fn write_states(&mut self, rows: &[AgvStateRow]) -> TraceResult<()> {
        for row in rows {
            self.states.write_record(&[
                row.agv_id.to_string(),
                row.tick.to_string(),
                row.current_node.to_string(),
                row.status.to_string(),
                format!("{:.2}", row.x),
                format!("{:.2}", row.y),
                format!("{:.3}", row.speed),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> TraceResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.moving.to_string(),
            row.waiting.to_string(),
            row.resting.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> TraceResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.states.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
