//! Simulation observer trait for progress reporting and data collection.

use agv_core::Tick;
use agv_fleet::AgvState;

/// Callbacks invoked by [`Engine::run_ticks`][crate::Engine::run_ticks] at
/// tick boundaries.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, fleet: &[AgvState]) {
///         if tick.0 % self.interval == 0 {
///             let moving = fleet.iter().filter(|a| a.speed > 0.0).count();
///             println!("{tick}: {moving}/{} moving", fleet.len());
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before a tick is processed.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after a tick is processed, with read-only access to the
    /// committed fleet state.
    fn on_tick_end(&mut self, _tick: Tick, _fleet: &[AgvState]) {}

    /// Called once when a `run_ticks` batch finishes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call
/// `run_ticks` but don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
