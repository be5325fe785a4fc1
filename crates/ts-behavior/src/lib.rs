//! `ts-behavior` — behavior node trait, built-in nodes, and the script loader.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`node`]      | `BehaviorNode` trait, `describe`                              |
//! | [`context`]   | `TickContext<'a>` — read-only world view for one step, `ActiveModel` |
//! | [`navigate`]  | `NavigateBehavior` state machine, `NavigatePhase`             |
//! | [`wait`]      | `WaitBehavior`                                                |
//! | [`composite`] | `Sequence`, `Parallel`, `Repeat`                              |
//! | [`loader`]    | `NodeRegistry`, `build_node`, `parse_node`, `BehaviorLibrary` |
//! | [`error`]     | `BehaviorError`, `BehaviorResult<T>`                          |
//!
//! # Design notes
//!
//! Scripts are parsed once into a *template* tree.  Every agent gets its own
//! clone via [`BehaviorNode::clone_node`], so per-run progress (resolved
//! destination, planned path, elapsed time) is never shared between agents.
//!
//! Ticks never fail.  An unknown destination or a failed plan leaves the
//! agent where it is and the node retries on the next tick; only script
//! construction reports errors.

pub mod composite;
pub mod context;
pub mod error;
pub mod loader;
pub mod navigate;
pub mod node;
pub mod wait;

#[cfg(test)]
mod tests;

pub use composite::{Parallel, Repeat, Sequence};
pub use context::{ActiveModel, TickContext};
pub use error::{BehaviorError, BehaviorResult};
pub use loader::{BehaviorLibrary, NodeConstructor, NodeRegistry, build_node, parse_node};
pub use navigate::{DEFAULT_MAX_SPEED, DEFAULT_TOLERANCE, NavigateBehavior, NavigatePhase};
pub use node::{BehaviorNode, describe};
pub use wait::WaitBehavior;
