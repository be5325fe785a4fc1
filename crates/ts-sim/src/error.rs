use thiserror::Error;
use ts_behavior::BehaviorError;
use ts_core::{CoreError, ModelId};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("behavior error: {0}")]
    Behavior(#[from] BehaviorError),

    #[error("{0} is not an active model")]
    UnknownModel(ModelId),

    #[cfg(feature = "parallel")]
    #[error("could not start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type SimResult<T> = Result<T, SimError>;
