//! `ts-building` — building map, navigation graph, and path planning.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`building`] | `Building`, `Level`, `Vertex`, `Lane`, `StaticModel`           |
//! | [`loader`]   | `Building::load` / `Building::from_yaml_str` (editor YAML)     |
//! | [`graph`]    | `PlanningGraph` (CSR + R-tree), `PlanningGraphBuilder`         |
//! | [`planner`]  | `Planner` trait, `DijkstraPlanner`, `shortest_path`            |
//! | [`error`]    | `BuildingError`, `BuildingResult<T>`, `PlanResult<T>`          |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for the destination-name index.  |

pub mod building;
pub mod error;
pub mod graph;
pub mod loader;
pub mod planner;


pub use building::{Building, Lane, Level, StaticModel, Vertex};
pub use error::{BuildingError, BuildingResult, PlanResult};
pub use graph::{GraphNode, PlanningGraph, PlanningGraphBuilder};
pub use planner::{DijkstraPlanner, Planner, shortest_path};
