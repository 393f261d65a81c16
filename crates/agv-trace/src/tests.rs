//! Unit tests for agv-trace.

#[cfg(test)]
mod csv_backend {
    use std::fs;

    use tempfile::tempdir;

    use crate::writer::TraceWriter;
    use crate::{AgvStateRow, CsvTraceWriter, TickSummaryRow};

    fn sample_row(tick: u64) -> AgvStateRow {
        AgvStateRow {
            agv_id: 0,
            tick,
            current_node: 3,
            status: "moving",
            x: 120.5,
            y: 64.25,
            speed: 1.4,
        }
    }

    #[test]
    fn writes_headers_and_rows() {
        let dir = tempdir().unwrap();
        let mut w = CsvTraceWriter::new(dir.path()).unwrap();
        w.write_states(&[sample_row(1), sample_row(2)]).unwrap();
        w.write_tick_summary(&TickSummaryRow {
            tick: 1,
            moving: 1,
            waiting: 0,
            resting: 2,
        })
        .unwrap();
        w.finish().unwrap();

        let states = fs::read_to_string(dir.path().join("agv_states.csv")).unwrap();
        let mut lines = states.lines();
        assert_eq!(
            lines.next().unwrap(),
            "agv_id,tick,current_node,status,x,y,speed"
        );
        assert_eq!(lines.next().unwrap(), "0,1,3,moving,120.50,64.25,1.400");
        assert_eq!(lines.clone().count(), 1, "one more data row expected");

        let summaries = fs::read_to_string(dir.path().join("tick_summaries.csv")).unwrap();
        let mut lines = summaries.lines();
        assert_eq!(lines.next().unwrap(), "tick,moving,waiting,resting");
        assert_eq!(lines.next().unwrap(), "1,1,0,2");
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut w = CsvTraceWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

#[cfg(test)]
mod observer {
    use agv_core::{NodeId, VehicleConfig};
    use agv_map::{MapData, MapEdge, MapNode};
    use agv_sim::Engine;

    use crate::writer::TraceWriter;
    use crate::{AgvStateRow, TickSummaryRow, TraceObserver, TraceResult};

    /// In-memory writer for observer assertions.
    #[derive(Default)]
    struct MemWriter {
        states: Vec<AgvStateRow>,
        summaries: Vec<TickSummaryRow>,
        finished: u32,
    }

    impl TraceWriter for MemWriter {
        fn write_states(&mut self, rows: &[AgvStateRow]) -> TraceResult<()> {
            self.states.extend_from_slice(rows);
            Ok(())
        }
        fn write_tick_summary(&mut self, row: &TickSummaryRow) -> TraceResult<()> {
            self.summaries.push(*row);
            Ok(())
        }
        fn finish(&mut self) -> TraceResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    fn two_node_map() -> MapData {
        MapData {
            nodes: vec![
                MapNode { x: 0, y: 0, label: "A".into() },
                MapNode { x: 100, y: 0, label: "B".into() },
            ],
            edges: vec![MapEdge {
                source: NodeId(0),
                target: NodeId(1),
                weight: 100,
            }],
        }
    }

    #[test]
    fn summaries_every_tick_states_on_interval() {
        let mut engine = Engine::new(two_node_map(), VehicleConfig::default());
        let agv = engine.spawn_at(NodeId(0)).unwrap();
        engine.set_target(agv, NodeId(1)).unwrap();

        let mut obs = TraceObserver::new(MemWriter::default(), 5);
        engine.run_ticks(20, &mut obs);
        assert!(obs.take_error().is_none());

        let writer = obs.into_writer();
        assert_eq!(writer.summaries.len(), 20);
        // Ticks 0, 5, 10, 15 sample the single vehicle.
        assert_eq!(writer.states.len(), 4);
        assert!(writer.states.iter().all(|r| r.agv_id == 0));
        assert_eq!(writer.finished, 1, "the batch-end hook flushes the writer");
        // The vehicle spends the window moving toward B.
        assert!(writer.summaries.iter().skip(1).any(|s| s.moving == 1));
    }
}
