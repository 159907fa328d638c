use thiserror::Error;

/// `Validation` and `Busy` are raised before any network dispatch;
/// `Transport` and `Decode` land in the controller's error slot instead
/// of being returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{0}")]
    Validation(String),
    #[error("another request is already in flight")]
    Busy,
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed snapshot payload: {0}")]
    Decode(String),
}
