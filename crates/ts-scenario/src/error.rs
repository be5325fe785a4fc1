use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario has no filename")]
    NoFilename,

    #[error("{}: {source}", path.display())]
    Io {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("scenario YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("region of interest on level {level:?} references vertex {index}, but the scenario has {count}")]
    VertexOutOfRange {
        level: String,
        index: usize,
        count: usize,
    },
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;
