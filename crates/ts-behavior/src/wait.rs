use std::fmt;

use serde_yaml::Value;
use ts_core::ModelState;

use crate::loader::fields;
use crate::node::indent;
use crate::{BehaviorNode, BehaviorResult, TickContext};

/// Stand still for a fixed number of simulated seconds.
///
/// ```yaml
/// { type: wait, seconds: 5 }
/// ```
#[derive(Debug)]
pub struct WaitBehavior {
    pub seconds: f64,
    elapsed:     f64,
}

impl WaitBehavior {
    pub fn new(seconds: f64) -> Self {
        Self { seconds, elapsed: 0.0 }
    }

    pub fn from_yaml(desc: &Value) -> BehaviorResult<Self> {
        let seconds = fields::require_f64(desc, "wait", "seconds")?;
        if seconds < 0.0 {
            return Err(fields::invalid("wait", "seconds", "must not be negative"));
        }
        Ok(Self::new(seconds))
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

impl BehaviorNode for WaitBehavior {
    fn type_tag(&self) -> &'static str {
        "wait"
    }

    fn tick(&mut self, dt: f64, state: &mut ModelState, _ctx: &TickContext<'_>) {
        if self.is_complete() {
            return;
        }
        self.elapsed += dt;
        state.velocity = None;
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.seconds
    }

    fn clone_node(&self) -> Box<dyn BehaviorNode> {
        Box::new(WaitBehavior::new(self.seconds))
    }

    fn print(&self, out: &mut dyn fmt::Write, depth: usize) -> fmt::Result {
        indent(out, depth)?;
        writeln!(out, "wait seconds={} elapsed={}", self.seconds, self.elapsed)
    }
}
