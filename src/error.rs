//! Error types for a validation run
//!
//! Every variant here is fatal: the run stops at the first one and no partial
//! aggregate is returned. Recoverable conditions (missing named files, a
//! ruleset that cannot be found) are logged and never surface as errors.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Fatal failure of a validation run
#[derive(Error, Debug)]
pub enum LintError {
    #[error("Could not find linter executable resource: {path}")]
    ResourceNotFound { path: String },

    #[error("Failed to extract linter executable to {path}: {reason}")]
    ExtractionFailed { path: PathBuf, reason: String },

    #[error("Linter execution timed out after {} seconds", .timeout.as_secs())]
    ExecutionTimeout { timeout: Duration },

    #[error("Failed to execute linter: {0}")]
    ExecutionFailed(String),

    #[error("Failed to write linter output to {path}: {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for validation operations
pub type LintResult<T> = Result<T, LintError>;
