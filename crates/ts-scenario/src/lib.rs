//! `ts-scenario` — scenario records for the traffic_sim behavior engine.
//!
//! A [`Scenario`] is a passive data container: a name, the file it lives in,
//! an ordered list of vertices, and one region-of-interest polygon per level.
//! Behaviors consult its named vertices as a fallback when a destination is
//! not found in the building.
//!
//! # File format
//!
//! ```yaml
//! name: morning_shift
//! vertices:
//!   - [0.0, 0.0, ""]
//!   - [20.0, 0.0, "staging"]
//!   - [20.0, 20.0, ""]
//! roi:
//!   L1: [0, 1, 2]
//! ```

pub mod error;
pub mod polygon;
pub mod scenario;


pub use error::{ScenarioError, ScenarioResult};
pub use polygon::Polygon;
pub use scenario::Scenario;
