//! Application-level error type.

use crate::client::ClientError;
use crate::config::ConfigError;
use terrarium_core::CoreError;
use thiserror::Error;

/// Errors surfaced by CLI commands and the server entry point.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("I/O error: {0}")]
    Io(String),
}
