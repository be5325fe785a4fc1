//! The `BehaviorNode` trait — the unit every behavior tree is made of.

use std::fmt;

use ts_core::ModelState;

use crate::TickContext;

/// A tick-able unit of scripted agent behavior.
///
/// Trees are built once from a script (the *template*) and then cloned for
/// every agent with [`clone_node`][Self::clone_node].  Nodes carry per-run
/// progress, so a clone must never share mutable state with its source.
///
/// # Thread safety
///
/// ts-sim may tick different agents on different Rayon workers, so nodes must
/// be `Send + Sync`.  A node only ever touches the `ModelState` it is handed
/// and its own fields.
pub trait BehaviorNode: fmt::Debug + Send + Sync {
    /// The script tag this node was built from (`"navigate"`, `"sequence"`, …).
    fn type_tag(&self) -> &'static str;

    /// Advance by `dt` simulated seconds, mutating `state` in place.
    ///
    /// Failures to make progress (unknown destination, no plan) are not
    /// errors: the node simply stays where it is and retries next tick.
    fn tick(&mut self, dt: f64, state: &mut ModelState, ctx: &TickContext<'_>);

    /// `true` once the node has finished.  Pure query.
    fn is_complete(&self) -> bool;

    /// A fresh copy with all progress reset to its just-constructed values.
    fn clone_node(&self) -> Box<dyn BehaviorNode>;

    /// Write a diagnostic description, indented by `depth` levels.
    fn print(&self, out: &mut dyn fmt::Write, depth: usize) -> fmt::Result;
}

impl Clone for Box<dyn BehaviorNode> {
    fn clone(&self) -> Self {
        self.clone_node()
    }
}

/// Render [`BehaviorNode::print`] into a `String`.
pub fn describe(node: &dyn BehaviorNode) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = node.print(&mut out, 0);
    out
}

pub(crate) fn indent(out: &mut dyn fmt::Write, depth: usize) -> fmt::Result {
    write!(out, "{:width$}", "", width = depth * 2)
}
