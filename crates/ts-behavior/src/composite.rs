//! Composite nodes: `sequence`, `parallel` and `repeat`.
//!
//! Composites own their children exclusively and forward every tick to them
//! with the same `ModelState`.

use std::fmt;

use serde_yaml::Value;
use ts_core::ModelState;

use crate::loader::{fields, NodeRegistry};
use crate::node::indent;
use crate::{BehaviorNode, BehaviorResult, TickContext};

fn build_children(
    desc:     &Value,
    tag:      &str,
    registry: &NodeRegistry,
) -> BehaviorResult<Vec<Box<dyn BehaviorNode>>> {
    fields::require_seq(desc, tag, "children")?
        .iter()
        .map(|child| registry.build(child))
        .collect()
}

// ── Sequence ──────────────────────────────────────────────────────────────────

/// Run children one after another.
///
/// The child at the cursor is ticked; once it reports complete the cursor
/// moves on and the next child starts on the following tick.
#[derive(Debug)]
pub struct Sequence {
    children: Vec<Box<dyn BehaviorNode>>,
    current:  usize,
}

impl Sequence {
    pub fn new(children: Vec<Box<dyn BehaviorNode>>) -> Self {
        Self { children, current: 0 }
    }

    pub fn from_yaml(desc: &Value, registry: &NodeRegistry) -> BehaviorResult<Self> {
        Ok(Self::new(build_children(desc, "sequence", registry)?))
    }

    pub fn children(&self) -> &[Box<dyn BehaviorNode>] {
        &self.children
    }

    /// Index of the child currently running (`children().len()` once done).
    pub fn current(&self) -> usize {
        self.current
    }

    fn skip_completed(&mut self) {
        while self.current < self.children.len() && self.children[self.current].is_complete() {
            self.current += 1;
        }
    }
}

impl BehaviorNode for Sequence {
    fn type_tag(&self) -> &'static str {
        "sequence"
    }

    fn tick(&mut self, dt: f64, state: &mut ModelState, ctx: &TickContext<'_>) {
        self.skip_completed();
        if let Some(child) = self.children.get_mut(self.current) {
            child.tick(dt, state, ctx);
        }
        self.skip_completed();
    }

    fn is_complete(&self) -> bool {
        self.children[self.current..].iter().all(|c| c.is_complete())
    }

    fn clone_node(&self) -> Box<dyn BehaviorNode> {
        Box::new(Sequence::new(self.children.iter().map(|c| c.clone_node()).collect()))
    }

    fn print(&self, out: &mut dyn fmt::Write, depth: usize) -> fmt::Result {
        indent(out, depth)?;
        writeln!(out, "sequence ({}/{})", self.current, self.children.len())?;
        self.children.iter().try_for_each(|c| c.print(out, depth + 1))
    }
}

// ── Parallel ──────────────────────────────────────────────────────────────────

/// Tick every unfinished child each tick, in declaration order.
#[derive(Debug)]
pub struct Parallel {
    children: Vec<Box<dyn BehaviorNode>>,
}

impl Parallel {
    pub fn new(children: Vec<Box<dyn BehaviorNode>>) -> Self {
        Self { children }
    }

    pub fn from_yaml(desc: &Value, registry: &NodeRegistry) -> BehaviorResult<Self> {
        Ok(Self::new(build_children(desc, "parallel", registry)?))
    }

    pub fn children(&self) -> &[Box<dyn BehaviorNode>] {
        &self.children
    }
}

impl BehaviorNode for Parallel {
    fn type_tag(&self) -> &'static str {
        "parallel"
    }

    fn tick(&mut self, dt: f64, state: &mut ModelState, ctx: &TickContext<'_>) {
        for child in self.children.iter_mut().filter(|c| !c.is_complete()) {
            child.tick(dt, state, ctx);
        }
    }

    fn is_complete(&self) -> bool {
        self.children.iter().all(|c| c.is_complete())
    }

    fn clone_node(&self) -> Box<dyn BehaviorNode> {
        Box::new(Parallel::new(self.children.iter().map(|c| c.clone_node()).collect()))
    }

    fn print(&self, out: &mut dyn fmt::Write, depth: usize) -> fmt::Result {
        indent(out, depth)?;
        writeln!(out, "parallel")?;
        self.children.iter().try_for_each(|c| c.print(out, depth + 1))
    }
}

// ── Repeat ────────────────────────────────────────────────────────────────────

/// Run a fresh clone of `template` `count` times in a row.
#[derive(Debug)]
pub struct Repeat {
    template:  Box<dyn BehaviorNode>,
    count:     u32,
    completed: u32,
    active:    Option<Box<dyn BehaviorNode>>,
}

impl Repeat {
    pub fn new(template: Box<dyn BehaviorNode>, count: u32) -> Self {
        Self { template, count, completed: 0, active: None }
    }

    pub fn from_yaml(desc: &Value, registry: &NodeRegistry) -> BehaviorResult<Self> {
        let count = fields::require_u32(desc, "repeat", "count")?;
        if count == 0 {
            return Err(fields::invalid("repeat", "count", "must be at least 1"));
        }
        let child = fields::require(desc, "repeat", "child")?;
        Ok(Self::new(registry.build(child)?, count))
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Iterations finished so far.
    pub fn completed(&self) -> u32 {
        self.completed
    }
}

impl BehaviorNode for Repeat {
    fn type_tag(&self) -> &'static str {
        "repeat"
    }

    fn tick(&mut self, dt: f64, state: &mut ModelState, ctx: &TickContext<'_>) {
        if self.is_complete() {
            return;
        }
        let active = self.active.get_or_insert_with(|| self.template.clone_node());
        active.tick(dt, state, ctx);
        if active.is_complete() {
            self.completed += 1;
            self.active = None;
        }
    }

    fn is_complete(&self) -> bool {
        self.completed >= self.count
    }

    fn clone_node(&self) -> Box<dyn BehaviorNode> {
        Box::new(Repeat::new(self.template.clone_node(), self.count))
    }

    fn print(&self, out: &mut dyn fmt::Write, depth: usize) -> fmt::Result {
        indent(out, depth)?;
        writeln!(out, "repeat ({}/{})", self.completed, self.count)?;
        match &self.active {
            Some(active) => active.print(out, depth + 1),
            None => self.template.print(out, depth + 1),
        }
    }
}
