//! CLI-specific error types

use crate::config::ConfigError;
use crate::step::StepError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI-specific error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Step(#[from] StepError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
