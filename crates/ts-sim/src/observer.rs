//! Simulation observer trait for progress reporting and data collection.

use ts_core::{SimClock, Step};

use crate::{AgentSlot, RetiredAgent};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// step loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_step_end(&mut self, step: Step, active: usize) {
///         if step.0 % self.interval == 0 {
///             println!("{step}: {active} agents active");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each step, before any agent is ticked.
    fn on_step_start(&mut self, _step: Step) {}

    /// Called for every agent removed at the end of `step`, before
    /// [`on_step_end`][Self::on_step_end].
    fn on_retired(&mut self, _step: Step, _agent: &RetiredAgent) {}

    /// Called at the end of each step.  `active` counts agents still running
    /// after this step's retirements.
    fn on_step_end(&mut self, _step: Step, _active: usize) {}

    /// Called every `config.output_interval_steps` steps with the agents
    /// still active after `step`.
    fn on_snapshot(&mut self, _step: Step, _clock: &SimClock, _agents: &[AgentSlot]) {}

    /// Called once when [`Sim::run`][crate::Sim::run] stops.
    fn on_sim_end(&mut self, _final_step: Step) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
