//! OpenAPI Lint SDK - runs a bundled OpenAPI linter as a build step
//!
//! Provides:
//! - Platform detection and extraction of the matching linter binary
//! - Selection of OpenAPI documents (explicit list or recursive scan)
//! - Per-file linter invocation with a bounded wait
//! - Violation counting and aggregation of the linter's output
//! - Build-step configuration and pass/fail decisions

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod invocation;
pub mod platform;
pub mod process;
pub mod resources;
pub mod runner;
pub mod select;
pub mod step;
pub mod violations;

// Re-export commonly used types
pub use config::{ConfigError, LintConfig};
pub use error::{LintError, LintResult};
pub use extract::{ExecutableResolver, ResolvedExecutable};
pub use invocation::{Invocation, LintOptions};
pub use platform::{HostInfo, Platform};
pub use process::{ProcessOutput, ProcessRunner};
pub use resources::{BinarySource, DirectoryBinaries, EmbeddedBinaries, MemoryBinaries};
pub use runner::{ValidationRequest, ValidationResult, ValidationRunner};
pub use select::{FileSelection, select_files};
pub use step::{BuildStep, StepError, StepOutcome};
pub use violations::{ViolationCounter, count_violations};
