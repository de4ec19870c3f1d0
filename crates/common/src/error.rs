//! Error types for Lander

use thiserror::Error;

/// Result type alias using Lander Error
pub type Result<T> = std::result::Result<T, Error>;

/// Lander error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid viewport '{label}': {width}x{height}")]
    InvalidViewport { label: String, width: u32, height: u32 },

    #[error("Unknown mode: {0} (expected pre-deploy or post-deploy)")]
    UnknownMode(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}
