use thiserror::Error;

/// Construction errors for behavior nodes and scripts.
///
/// Runtime problems (an unknown destination, a failed plan) are never
/// reported through this type; they only delay completion.
#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("behavior node is missing its `type` tag")]
    MissingType,

    #[error("unknown behavior node type {0:?}")]
    UnknownNodeType(String),

    #[error("{node} node: missing required field `{field}`")]
    MissingField {
        node:  String,
        field: &'static str,
    },

    #[error("{node} node: field `{field}` {reason}")]
    InvalidField {
        node:   String,
        field:  &'static str,
        reason: String,
    },

    #[error("behavior {name:?}: {source}")]
    InBehavior {
        name:   String,
        source: Box<BehaviorError>,
    },

    #[error("unknown behavior {0:?}")]
    UnknownBehavior(String),

    #[error("behavior script error: {0}")]
    Script(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BehaviorError {
    /// The node type tag a field error refers to, if any.
    pub fn node_type(&self) -> Option<&str> {
        match self {
            BehaviorError::MissingField { node, .. } | BehaviorError::InvalidField { node, .. } => {
                Some(node)
            }
            BehaviorError::UnknownNodeType(tag) => Some(tag),
            BehaviorError::InBehavior { source, .. } => source.node_type(),
            _ => None,
        }
    }
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
