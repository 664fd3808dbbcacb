//! Build-step integration
//!
//! Wraps a validation run with the decisions a build makes around it:
//! whether to run at all, and whether violations fail the step.

use crate::config::LintConfig;
use crate::error::LintError;
use crate::extract::ExecutableResolver;
use crate::platform::{HostInfo, Platform};
use crate::process::ProcessRunner;
use crate::resources::{BinarySource, DirectoryBinaries, EmbeddedBinaries};
use crate::runner::{ValidationResult, ValidationRunner};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Build-step failure
#[derive(Error, Debug)]
pub enum StepError {
    #[error("Failed to execute OpenAPI validation: {0}")]
    Execution(#[from] LintError),

    #[error("OpenAPI validation failed with {0} violations. See output above for details.")]
    ViolationsFound(usize),
}

/// How a build step that did not fail ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Validation was switched off
    Skipped,
    /// No violations detected
    Passed(ValidationResult),
    /// Violations found, but the step is configured not to fail on them
    PassedWithViolations(ValidationResult),
}

/// One OpenAPI validation step of a build
pub struct BuildStep {
    config: LintConfig,
    project_dir: PathBuf,
    host: HostInfo,
}

impl BuildStep {
    pub fn new(config: LintConfig, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            project_dir: project_dir.into(),
            host: HostInfo::current(),
        }
    }

    /// Pretend to run on another host when picking the linter build.
    pub fn with_host(mut self, host: HostInfo) -> Self {
        self.host = host;
        self
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Platform variant the step will extract
    pub fn platform(&self) -> Platform {
        self.config
            .linter
            .platform
            .unwrap_or_else(|| Platform::detect(&self.host))
    }

    /// Run the step with the configured binary source.
    ///
    /// # Errors
    ///
    /// * [`StepError::Execution`] when the linter could not be run
    /// * [`StepError::ViolationsFound`] when violations were found and
    ///   `fail_on_violations` is set
    pub fn execute(&self) -> Result<StepOutcome, StepError> {
        match self.config.resources_dir(&self.project_dir) {
            Some(dir) => self.execute_with(DirectoryBinaries::new(dir)),
            None => self.execute_with(EmbeddedBinaries),
        }
    }

    /// Run the step with binaries from `source`.
    pub fn execute_with<S: BinarySource>(&self, source: S) -> Result<StepOutcome, StepError> {
        if self.config.build.skip {
            info!("OpenAPI validation is skipped.");
            return Ok(StepOutcome::Skipped);
        }

        info!("Starting OpenAPI validation...");

        let runner = ValidationRunner::new(
            ExecutableResolver::new(source, self.platform()),
            ProcessRunner::new(self.config.timeout()),
        );
        let result = runner.validate(&self.config.to_request(&self.project_dir))?;

        if result.has_violations() {
            if self.config.build.fail_on_violations {
                return Err(StepError::ViolationsFound(result.violation_count));
            }
            warn!(
                "OpenAPI validation completed with {} violations.",
                result.violation_count
            );
            return Ok(StepOutcome::PassedWithViolations(result));
        }

        info!("OpenAPI validation completed successfully with no violations.");
        Ok(StepOutcome::Passed(result))
    }
}
