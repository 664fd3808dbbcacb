//! Validation orchestration
//!
//! Ties the pieces together for one run: extract the linter once, select
//! the documents, lint them strictly in order, and aggregate the results.
//!
//! The aggregated output is written to the configured output file once, at
//! the end of the run, so the file holds the same text the result carries.

use crate::error::{LintError, LintResult};
use crate::extract::ExecutableResolver;
use crate::invocation::{Invocation, LintOptions};
use crate::platform::{HostInfo, Platform};
use crate::process::ProcessRunner;
use crate::resources::{BinarySource, EmbeddedBinaries};
use crate::select::select_files;
use crate::violations::ViolationCounter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Inputs of one validation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRequest {
    /// Directory scanned when `files` is empty; base for relative `files`
    pub input_dir: Option<PathBuf>,
    /// Explicit documents to lint, overriding the scan
    pub files: Vec<String>,
    /// Ruleset file path or URL
    pub ruleset: Option<String>,
    /// Linter output format
    pub format: Option<String>,
    /// Where to write the aggregated linter output
    pub output_file: Option<PathBuf>,
    pub verbose: bool,
    /// Directory the linter is extracted into
    pub target_dir: PathBuf,
}

impl ValidationRequest {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = Some(dir.into());
        self
    }

    pub fn with_files<I, F>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ruleset(mut self, ruleset: impl Into<String>) -> Self {
        self.ruleset = Some(ruleset.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Options forwarded to every linter invocation
    pub fn lint_options(&self) -> LintOptions {
        LintOptions {
            ruleset: self.ruleset.clone(),
            format: self.format.clone(),
            verbose: self.verbose,
        }
    }
}

/// Outcome of a completed validation run.
///
/// `violation_count` may be an estimate: zero means no violations were
/// detected, not that the linter produced no output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[must_use = "validation results should be checked for violations"]
pub struct ValidationResult {
    /// Violations summed over all files
    pub violation_count: usize,
    /// Linter output of every file, each followed by a newline
    pub output: String,
    /// Number of documents the linter ran on
    pub files_validated: usize,
}

impl ValidationResult {
    pub fn has_violations(&self) -> bool {
        self.violation_count > 0
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ValidationResult{{violation_count={}, files_validated={}, has_output={}}}",
            self.violation_count,
            self.files_validated,
            !self.output.trim().is_empty()
        )
    }
}

/// Runs the linter over a set of OpenAPI documents
pub struct ValidationRunner<S: BinarySource> {
    resolver: ExecutableResolver<S>,
    process: ProcessRunner,
}

impl ValidationRunner<EmbeddedBinaries> {
    /// Runner using the bundled binaries for this host
    pub fn embedded() -> Self {
        let platform = Platform::detect(&HostInfo::current());
        Self::new(
            ExecutableResolver::new(EmbeddedBinaries, platform),
            ProcessRunner::default(),
        )
    }
}

impl<S: BinarySource> ValidationRunner<S> {
    pub fn new(resolver: ExecutableResolver<S>, process: ProcessRunner) -> Self {
        Self { resolver, process }
    }

    /// Lint every selected document and aggregate the results.
    ///
    /// The linter is extracted before files are selected, so a missing
    /// binary fails the run even when there is nothing to lint. Any fatal
    /// error stops the run at the file it occurred on.
    ///
    /// # Errors
    ///
    /// Returns the first [`LintError`] raised by extraction, execution or
    /// writing the output file.
    pub fn validate(&self, request: &ValidationRequest) -> LintResult<ValidationResult> {
        let executable = self.resolver.extract(&request.target_dir)?;

        let selection = select_files(request.input_dir.as_deref(), &request.files);
        if selection.is_empty() {
            warn!("No OpenAPI files found to validate");
            return Ok(ValidationResult::default());
        }

        info!("Validating {} OpenAPI file(s)", selection.len());

        let options = request.lint_options();
        let counter = ViolationCounter::for_format(options.format.as_deref());
        let mut result = ValidationResult::default();

        for file in &selection.files {
            info!("Validating: {}", file.display());

            let invocation = Invocation::lint(&executable, file, &options);
            let run = self.process.run(&invocation)?;

            if !run.output.trim().is_empty() {
                info!("Linter output:\n{}", run.output);
            }

            result.violation_count += counter.count(&run.output, run.exit_code);
            result.output.push_str(&run.output);
            result.output.push('\n');
            result.files_validated += 1;
        }

        if let Some(path) = &request.output_file {
            write_output(path, &result.output)?;
        }

        Ok(result)
    }
}

fn write_output(path: &Path, output: &str) -> LintResult<()> {
    let failed = |source: std::io::Error| LintError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(failed)?;
    }
    std::fs::write(path, output).map_err(failed)?;

    info!("Linter output written to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::MemoryBinaries;
    use tempfile::tempdir;

    fn runner_without_binary() -> ValidationRunner<MemoryBinaries> {
        ValidationRunner::new(
            ExecutableResolver::new(MemoryBinaries::new(), Platform::LinuxX64),
            ProcessRunner::default(),
        )
    }

    #[test]
    fn test_request_builder() {
        let request = ValidationRequest::new("target")
            .with_input_dir("openapi")
            .with_files(["a.yaml", "b.json"])
            .with_ruleset("https://example.com/ruleset.yaml")
            .with_format("json")
            .with_output_file("target/lint.txt")
            .with_verbose(true);

        assert_eq!(request.files, vec!["a.yaml", "b.json"]);
        assert_eq!(
            request.lint_options(),
            LintOptions {
                ruleset: Some("https://example.com/ruleset.yaml".to_string()),
                format: Some("json".to_string()),
                verbose: true,
            }
        );
    }

    #[test]
    fn test_result_display() {
        let result = ValidationResult {
            violation_count: 5,
            output: "some output".to_string(),
            files_validated: 2,
        };
        assert!(result.has_violations());
        assert_eq!(
            result.to_string(),
            "ValidationResult{violation_count=5, files_validated=2, has_output=true}"
        );
        assert!(!ValidationResult::default().has_violations());
    }

    #[test]
    fn test_missing_binary_fails_before_selection() {
        let dir = tempdir().unwrap();
        let request = ValidationRequest::new(dir.path().join("target"));
        let result = runner_without_binary().validate(&request);
        assert!(matches!(result, Err(LintError::ResourceNotFound { .. })));
    }

    #[test]
    fn test_write_output_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports/lint/output.txt");
        write_output(&path, "first\n").unwrap();
        write_output(&path, "second\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");
    }
}
