//! Validate command implementation

use crate::cli::error::CliError;
use crate::config::{CONFIG_FILENAME, LintConfig};
use crate::step::{BuildStep, StepOutcome};
use std::path::PathBuf;

/// Arguments for the validate command.
///
/// Every `Option` left as `None` keeps the value from the config file (or
/// its default).
#[derive(Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Project directory relative paths are resolved against
    pub project_dir: PathBuf,
    /// Explicit config file; `<project_dir>/.openapi-lint.toml` otherwise
    pub config: Option<PathBuf>,
    pub input_dir: Option<String>,
    pub files: Vec<String>,
    pub ruleset: Option<String>,
    pub format: Option<String>,
    pub output_file: Option<String>,
    pub verbose: bool,
    pub skip: bool,
    pub no_fail_on_violations: bool,
    pub target_dir: Option<String>,
    pub timeout_secs: Option<u64>,
    pub platform: Option<String>,
    pub resources_dir: Option<String>,
}

/// Load the config and layer the command-line flags on top
pub fn resolve_config(args: &ValidateArgs) -> Result<LintConfig, CliError> {
    let mut config = match &args.config {
        Some(path) if !path.exists() => return Err(CliError::ConfigNotFound(path.clone())),
        Some(path) => LintConfig::load_file(path)?,
        None => LintConfig::load_file(&args.project_dir.join(CONFIG_FILENAME))?,
    };

    if let Some(dir) = &args.input_dir {
        config.input.dir = dir.clone();
    }
    if !args.files.is_empty() {
        config.input.files = args.files.clone();
    }
    if let Some(ruleset) = &args.ruleset {
        config.linter.ruleset = Some(ruleset.clone());
    }
    if let Some(format) = &args.format {
        config.linter.format = format.clone();
    }
    if let Some(file) = &args.output_file {
        config.output.file = Some(file.clone());
    }
    if args.verbose {
        config.linter.verbose = true;
    }
    if args.skip {
        config.build.skip = true;
    }
    if args.no_fail_on_violations {
        config.build.fail_on_violations = false;
    }
    if let Some(dir) = &args.target_dir {
        config.build.target_dir = dir.clone();
    }
    if let Some(secs) = args.timeout_secs {
        config.linter.timeout_secs = secs;
    }
    if let Some(platform) = &args.platform {
        config.linter.platform = Some(platform.parse().map_err(CliError::InvalidArgument)?);
    }
    if let Some(dir) = &args.resources_dir {
        config.linter.resources_dir = Some(dir.clone());
    }

    Ok(config)
}

/// Handle the validate command
pub fn handle_validate(args: &ValidateArgs) -> Result<StepOutcome, CliError> {
    let config = resolve_config(args)?;
    let outcome = BuildStep::new(config, &args.project_dir).execute()?;

    match &outcome {
        StepOutcome::Skipped => println!("Validation skipped"),
        StepOutcome::Passed(result) => {
            println!("Validation successful ({} file(s))", result.files_validated)
        }
        StepOutcome::PassedWithViolations(result) => println!(
            "Validation finished with {} violation(s) in {} file(s)",
            result.violation_count, result.files_validated
        ),
    }

    Ok(outcome)
}
