//! Error types for the QA harness

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QaError {
    #[error("Playwright not found. Install with: npm install playwright && npx playwright install chromium")]
    PlaywrightNotFound,

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Probe failed: {0}")]
    Probe(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Common(#[from] lander_common::Error),
}

pub type QaResult<T> = Result<T, QaError>;
