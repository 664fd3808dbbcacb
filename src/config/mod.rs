//! Build-step configuration
//!
//! Handles parsing of `.openapi-lint.toml` configuration files and
//! environment variable overrides, and turns the result into a
//! [`ValidationRequest`].

use crate::platform::Platform;
use crate::process::DEFAULT_TIMEOUT;
use crate::runner::ValidationRequest;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Default configuration filename
pub const CONFIG_FILENAME: &str = ".openapi-lint.toml";

/// Default directory scanned for OpenAPI documents
pub const DEFAULT_INPUT_DIR: &str = "openapi";

/// Default ruleset file, used only if it exists
pub const DEFAULT_RULESET: &str = ".openapi-lint.yaml";

/// Default linter output format
pub const DEFAULT_FORMAT: &str = "text";

/// Default directory the linter is extracted into
pub const DEFAULT_TARGET_DIR: &str = "target";

/// Environment variable for the input directory
pub const ENV_INPUT_DIR: &str = "OPENAPI_LINT_INPUT_DIR";

/// Environment variable for the explicit file list (comma-separated)
pub const ENV_FILES: &str = "OPENAPI_LINT_FILES";

/// Environment variable for the ruleset path or URL
pub const ENV_RULESET: &str = "OPENAPI_LINT_RULESET";

/// Environment variable for the output format
pub const ENV_FORMAT: &str = "OPENAPI_LINT_FORMAT";

/// Environment variable for the output file
pub const ENV_OUTPUT_FILE: &str = "OPENAPI_LINT_OUTPUT_FILE";

/// Environment variable for verbose linter output
pub const ENV_VERBOSE: &str = "OPENAPI_LINT_VERBOSE";

/// Environment variable to skip validation
pub const ENV_SKIP: &str = "OPENAPI_LINT_SKIP";

/// Environment variable to fail the build on violations
pub const ENV_FAIL_ON_VIOLATIONS: &str = "OPENAPI_LINT_FAIL_ON_VIOLATIONS";

/// Environment variable for the extraction directory
pub const ENV_TARGET_DIR: &str = "OPENAPI_LINT_TARGET_DIR";

/// Environment variable for the per-file timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "OPENAPI_LINT_TIMEOUT_SECS";

/// Environment variable forcing a platform variant
pub const ENV_PLATFORM: &str = "OPENAPI_LINT_PLATFORM";

/// Environment variable for a directory of linter binaries
pub const ENV_RESOURCES_DIR: &str = "OPENAPI_LINT_RESOURCES_DIR";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {0}: {1}")]
    Read(PathBuf, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to serialize config: {0}")]
    Serialize(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which documents to lint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSection {
    /// Directory scanned for `.yaml`, `.yml` and `.json` files
    #[serde(default = "default_input_dir")]
    pub dir: String,

    /// Explicit files, overriding the scan (relative to `dir`)
    #[serde(default)]
    pub files: Vec<String>,
}

fn default_input_dir() -> String {
    DEFAULT_INPUT_DIR.to_string()
}

impl Default for InputSection {
    fn default() -> Self {
        Self {
            dir: default_input_dir(),
            files: Vec::new(),
        }
    }
}

/// How the linter is run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinterSection {
    /// Ruleset file (relative to the project) or `http(s)://` URL
    #[serde(default = "default_ruleset")]
    pub ruleset: Option<String>,

    /// Output format passed to the linter
    #[serde(default = "default_format")]
    pub format: String,

    /// Pass `--verbose` to the linter
    #[serde(default)]
    pub verbose: bool,

    /// Seconds one file may take before the linter is killed
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Force a platform variant instead of detecting it
    #[serde(default)]
    pub platform: Option<Platform>,

    /// Load binaries from this directory instead of the bundled ones
    #[serde(default)]
    pub resources_dir: Option<String>,
}

fn default_ruleset() -> Option<String> {
    Some(DEFAULT_RULESET.to_string())
}

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for LinterSection {
    fn default() -> Self {
        Self {
            ruleset: default_ruleset(),
            format: default_format(),
            verbose: false,
            timeout_secs: default_timeout_secs(),
            platform: None,
            resources_dir: None,
        }
    }
}

/// Where results go
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSection {
    /// File receiving the aggregated linter output
    #[serde(default)]
    pub file: Option<String>,
}

/// Build integration behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSection {
    /// Skip validation entirely
    #[serde(default)]
    pub skip: bool,

    /// Fail the build step when violations are found
    #[serde(default = "default_fail_on_violations")]
    pub fail_on_violations: bool,

    /// Scratch directory the linter is extracted into
    #[serde(default = "default_target_dir")]
    pub target_dir: String,
}

fn default_fail_on_violations() -> bool {
    true
}

fn default_target_dir() -> String {
    DEFAULT_TARGET_DIR.to_string()
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            skip: false,
            fail_on_violations: default_fail_on_violations(),
            target_dir: default_target_dir(),
        }
    }
}

/// Main configuration structure
///
/// Represents the `.openapi-lint.toml` configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LintConfig {
    #[serde(default)]
    pub input: InputSection,

    #[serde(default)]
    pub linter: LinterSection,

    #[serde(default)]
    pub output: OutputSection,

    #[serde(default)]
    pub build: BuildSection,
}

impl LintConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a project directory
    ///
    /// Looks for `.openapi-lint.toml` in the project directory, falls back
    /// to defaults if not found, then applies environment overrides.
    pub fn load(project_dir: &Path) -> ConfigResult<Self> {
        Self::load_file(&project_dir.join(CONFIG_FILENAME))
    }

    /// Load configuration from an explicit file (defaults if it is missing)
    pub fn load_file(config_path: &Path) -> ConfigResult<Self> {
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .map_err(|e| ConfigError::Read(config_path.to_path_buf(), e.to_string()))?;
            Self::parse(&content)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup (the process environment in
    /// [`apply_env_overrides`](Self::apply_env_overrides)).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_INPUT_DIR) {
            self.input.dir = dir;
        }

        if let Some(files) = lookup(ENV_FILES) {
            self.input.files = files
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(ruleset) = lookup(ENV_RULESET) {
            self.linter.ruleset = Some(ruleset).filter(|r| !r.trim().is_empty());
        }

        if let Some(format) = lookup(ENV_FORMAT) {
            self.linter.format = format;
        }

        if let Some(verbose) = lookup(ENV_VERBOSE).and_then(|v| parse_bool(&v)) {
            self.linter.verbose = verbose;
        }

        if let Some(value) = lookup(ENV_TIMEOUT_SECS) {
            match value.trim().parse() {
                Ok(secs) => self.linter.timeout_secs = secs,
                Err(e) => warn!("Ignoring {}={}: {}", ENV_TIMEOUT_SECS, value, e),
            }
        }

        if let Some(value) = lookup(ENV_PLATFORM) {
            match value.parse::<Platform>() {
                Ok(platform) => self.linter.platform = Some(platform),
                Err(e) => warn!("Ignoring {}={}: {}", ENV_PLATFORM, value, e),
            }
        }

        if let Some(dir) = lookup(ENV_RESOURCES_DIR) {
            self.linter.resources_dir = Some(dir);
        }

        if let Some(file) = lookup(ENV_OUTPUT_FILE) {
            self.output.file = Some(file);
        }

        if let Some(skip) = lookup(ENV_SKIP).and_then(|v| parse_bool(&v)) {
            self.build.skip = skip;
        }

        if let Some(fail) = lookup(ENV_FAIL_ON_VIOLATIONS).and_then(|v| parse_bool(&v)) {
            self.build.fail_on_violations = fail;
        }

        if let Some(dir) = lookup(ENV_TARGET_DIR) {
            self.build.target_dir = dir;
        }
    }

    /// Per-file linter timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.linter.timeout_secs.max(1))
    }

    /// Directory of on-disk binaries, resolved against the project
    pub fn resources_dir(&self, project_dir: &Path) -> Option<PathBuf> {
        self.linter
            .resources_dir
            .as_deref()
            .map(|dir| resolve(project_dir, dir))
    }

    /// Build the validation request, resolving relative paths against
    /// `project_dir`. A relative ruleset is resolved too; URLs are kept.
    pub fn to_request(&self, project_dir: &Path) -> ValidationRequest {
        let ruleset = self.linter.ruleset.as_deref().map(|r| {
            if crate::invocation::is_ruleset_url(r) {
                r.to_string()
            } else {
                resolve(project_dir, r).to_string_lossy().into_owned()
            }
        });

        ValidationRequest {
            input_dir: Some(resolve(project_dir, &self.input.dir)),
            files: self.input.files.clone(),
            ruleset,
            format: Some(self.linter.format.clone()).filter(|f| !f.trim().is_empty()),
            output_file: self.output.file.as_deref().map(|f| resolve(project_dir, f)),
            verbose: self.linter.verbose,
            target_dir: resolve(project_dir, &self.build.target_dir),
        }
    }
}

fn resolve(base: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Generate a sample configuration file content
pub fn sample_config() -> &'static str {
    r#"# OpenAPI lint configuration

[input]
# Directory scanned for .yaml, .yml and .json files
dir = "openapi"

# Explicit files to lint instead of scanning (relative to dir)
# files = ["petstore.yaml", "orders/orders-api.yaml"]

[linter]
# Ruleset file or http(s):// URL; ignored when the file does not exist
ruleset = ".openapi-lint.yaml"

# Output format: text, json, yaml, junit, html, teamcity, ...
format = "text"

verbose = false

# Seconds one file may take before the linter is killed
timeout_secs = 60

# Force a platform variant (windows, macos-x64, macos-arm64, linux-x64,
# linux-arm64, alpine-x64, alpine-arm64)
# platform = "linux-x64"

# Use linter binaries from a directory instead of the bundled ones
# resources_dir = "tools/linter"

[output]
# file = "target/openapi-lint.txt"

[build]
skip = false
fail_on_violations = true
target_dir = "target"
"#
}
