//! `ts-core` — foundational types for the `traffic_sim` behavior engine.
//!
//! This crate is a dependency of every other `ts-*` crate.  It has no
//! `ts-*` dependencies and minimal external ones (only `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                             |
//! |------------|------------------------------------------------------|
//! | [`ids`]    | `ModelId`, `NodeId`, `EdgeId`                        |
//! | [`state`]  | `ModelState` — an agent's pose and velocity          |
//! | [`time`]   | `Step`, `SimClock`, `SimConfig`                      |
//! | [`error`]  | `CoreError`, `CoreResult`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod state;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{EdgeId, ModelId, NodeId};
pub use state::ModelState;
pub use time::{SimClock, SimConfig, Step};
