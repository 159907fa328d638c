use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure body the engine attaches to 4xx/5xx responses: `{"detail": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineRejection {
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);
