//! Building and planning error type.

use thiserror::Error;

use ts_core::NodeId;

/// Errors produced by `ts-building`.
#[derive(Debug, Error)]
pub enum BuildingError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in navigation graph")]
    NodeNotFound(NodeId),

    #[error("navigation graph is empty")]
    EmptyGraph,

    #[error("building parse error: {0}")]
    Parse(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BuildingResult<T> = Result<T, BuildingError>;

/// Result of a [`Planner`][crate::Planner] query.
pub type PlanResult<T> = Result<T, BuildingError>;
