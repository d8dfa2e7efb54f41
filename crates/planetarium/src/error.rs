//! Session errors

use thiserror::Error;

/// Session result type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or navigating the scene.
#[derive(Debug, Error)]
pub enum Error {
    #[error("node not found: {0}")]
    MissingNode(String),

    #[error("node {node} has no {expected} geometry")]
    MissingGeometry { node: String, expected: &'static str },

    #[error("unknown body: {0}")]
    UnknownBody(String),

    #[error("invalid system scale: {0}")]
    InvalidScale(f32),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
