//! warehouse — headless demo for the agv-sim fleet engine.
//!
//! Generates a seeded warehouse floor, spawns a small fleet, turns on the
//! auto-pilot, and runs for a fixed number of ticks while printing periodic
//! fleet summaries and writing a CSV trace to `./trace/`.  Everything is
//! reproducible from `SEED`; re-running yields the same log byte for byte.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use agv_core::Tick;
use agv_fleet::AgvState;
use agv_map::generate_map;
use agv_sim::{EngineBuilder, SimObserver};
use agv_trace::{CsvTraceWriter, TraceObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED: &str = "warehouse-demo";
const NODE_COUNT: usize = 50;
const FLEET_SIZE: usize = 8;
const TOTAL_TICKS: u64 = 6_000; // ≈100 s of floor time at 60 ticks/s
const REPORT_INTERVAL: u64 = 500;
const TRACE_SAMPLE_INTERVAL: u64 = 60; // one vehicle sample per second
const TRACE_DIR: &str = "./trace";

// ── Progress reporting ────────────────────────────────────────────────────────

/// Prints a one-line fleet summary every `REPORT_INTERVAL` ticks, wrapping
/// the CSV trace observer so both see every tick.
struct Report<O: SimObserver> {
    inner: O,
    deliveries: u64,
    last_completed: Vec<bool>,
}

impl<O: SimObserver> Report<O> {
    fn new(inner: O, fleet_size: usize) -> Self {
        Self {
            inner,
            deliveries: 0,
            last_completed: vec![false; fleet_size],
        }
    }
}

impl<O: SimObserver> SimObserver for Report<O> {
    fn on_tick_start(&mut self, tick: Tick) {
        self.inner.on_tick_start(tick);
    }

    fn on_tick_end(&mut self, tick: Tick, fleet: &[AgvState]) {
        self.inner.on_tick_end(tick, fleet);

        for (i, agv) in fleet.iter().enumerate() {
            let completed = agv.status == agv_fleet::AgvStatus::Completed;
            if completed && !self.last_completed[i] {
                self.deliveries += 1;
            }
            self.last_completed[i] = completed;
        }

        if tick.0 % REPORT_INTERVAL != 0 {
            return;
        }
        let moving = fleet.iter().filter(|a| !a.status.is_stalled()).count();
        let waiting = fleet.iter().filter(|a| a.status.is_waiting()).count();
        println!(
            "{tick}: {moving} moving, {waiting} waiting, {} deliveries so far",
            self.deliveries
        );
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let map = generate_map(SEED, NODE_COUNT);
    println!(
        "floor '{SEED}': {} nodes, {} lanes",
        map.nodes.len(),
        map.edges.len()
    );

    let mut engine = EngineBuilder::new(map)
        .seed_str(SEED)
        .auto_pilot(true)
        .build();
    for _ in 0..FLEET_SIZE {
        let id = engine.spawn().context("spawning fleet")?;
        let agv = engine.agv(id).expect("just spawned");
        println!("  {id} at node {}", engine.graph().label(agv.current_node));
    }

    fs::create_dir_all(TRACE_DIR).context("creating trace directory")?;
    let writer = CsvTraceWriter::new(Path::new(TRACE_DIR)).context("opening trace files")?;
    let mut observer = Report::new(
        TraceObserver::new(writer, TRACE_SAMPLE_INTERVAL),
        FLEET_SIZE,
    );

    let started = Instant::now();
    // on_sim_end flushes the trace writer when the batch completes.
    engine.run_ticks(TOTAL_TICKS, &mut observer);
    let elapsed = started.elapsed();

    if let Some(e) = observer.inner.take_error() {
        eprintln!("trace error: {e}");
    }

    println!(
        "ran {TOTAL_TICKS} ticks in {:.2?} ({:.0} ticks/s), {} deliveries, trace in {TRACE_DIR}/",
        elapsed,
        TOTAL_TICKS as f64 / elapsed.as_secs_f64(),
        observer.deliveries
    );
    Ok(())
}
