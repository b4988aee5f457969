//! Error types for environment setup and I/O.
//!
//! Invalid agent actions are not errors; see the validator's `Rejection`.

use thiserror::Error;

/// Result alias used across the Trident crates.
pub type Result<T> = std::result::Result<T, TridentError>;

#[derive(Debug, Error)]
pub enum TridentError {
    /// Action or observation spaces queried before `set_agents`.
    #[error("agents not registered: call set_agents before querying spaces or resetting")]
    AgentsNotRegistered,

    /// Step called with no live simulation backend.
    #[error("simulation backend unavailable: call reset first")]
    BackendUnavailable,

    /// Scenario or force-composition content is unusable.
    #[error("scenario error: {0}")]
    Scenario(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Replay bundle could not be recorded or decoded.
    #[error("replay error: {0}")]
    Replay(String),
}
