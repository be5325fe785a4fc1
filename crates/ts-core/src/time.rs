//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Step` counter.  Each step advances the
//! simulated clock by a fixed `dt_secs`, held in `SimClock`:
//!
//!   elapsed_secs = step * dt_secs
//!
//! Using an integer step as the canonical time unit keeps comparisons exact;
//! the floating-point `dt_secs` is only used when behaviors integrate motion.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Step ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step(pub u64);

impl Step {
    pub const ZERO: Step = Step(0);
}

impl std::ops::Add<u64> for Step {
    type Output = Step;
    #[inline]
    fn add(self, rhs: u64) -> Step {
        Step(self.0 + rhs)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current step and maps it to simulated seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated seconds per step.
    pub dt_secs: f64,
    /// The current step, advanced by `SimClock::advance()`.
    pub current_step: Step,
}

impl SimClock {
    pub fn new(dt_secs: f64) -> Self {
        Self { dt_secs, current_step: Step::ZERO }
    }

    /// Advance the clock by one step.
    #[inline]
    pub fn advance(&mut self) {
        self.current_step = Step(self.current_step.0 + 1);
    }

    /// Elapsed simulated seconds since step 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.secs_at(self.current_step)
    }

    /// Simulated seconds at an arbitrary `step`.
    #[inline]
    pub fn secs_at(&self, step: Step) -> f64 {
        step.0 as f64 * self.dt_secs
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} s)", self.current_step, self.elapsed_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a TOML file by the application crate (with the
/// `serde` feature) and passed to the simulation builder.  Missing keys fall
/// back to [`SimConfig::default`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Simulated seconds per step.  Default: 0.1.
    pub dt_secs: f64,

    /// Upper bound on steps for `Sim::run`.  The run also stops early once
    /// every agent has retired.
    pub total_steps: u64,

    /// Emit a model snapshot every N steps.  0 disables snapshots.
    pub output_interval_steps: u64,

    /// Which of the building's navigation graphs (lane `graph_idx`) to plan on.
    pub nav_graph: u32,

    /// Master seed for applications that randomize spawn positions.
    pub seed: u64,

    /// Worker thread count for the `parallel` feature.  `None` uses all
    /// logical cores.
    pub num_threads: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt_secs:               0.1,
            total_steps:           10_000,
            output_interval_steps: 10,
            nav_graph:             0,
            seed:                  0,
            num_threads:           None,
        }
    }
}

impl SimConfig {
    /// The step at which `Sim::run` stops (exclusive upper bound).
    #[inline]
    pub fn end_step(&self) -> Step {
        Step(self.total_steps)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.dt_secs)
    }

    /// Reject configurations the step loop cannot run.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.dt_secs.is_finite() || self.dt_secs <= 0.0 {
            return Err(CoreError::Config(format!(
                "dt_secs must be a positive finite number, got {}",
                self.dt_secs
            )));
        }
        if self.num_threads == Some(0) {
            return Err(CoreError::Config("num_threads must be at least 1".into()));
        }
        Ok(())
    }
}
