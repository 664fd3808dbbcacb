//! Linter command construction
//!
//! Builds `<linter> lint [--ruleset R] [--format F] [--verbose] <file>`. The
//! order of the options is fixed; the linter's CLI is sensitive to it.

use crate::extract::ResolvedExecutable;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Settings passed through to every linter invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintOptions {
    /// Ruleset file path or `http(s)://` URL
    pub ruleset: Option<String>,
    /// Output format understood by the linter (text, json, junit, ...)
    pub format: Option<String>,
    pub verbose: bool,
}

/// Whether a ruleset reference is a remote URL
pub fn is_ruleset_url(ruleset: &str) -> bool {
    ruleset.starts_with("http://") || ruleset.starts_with("https://")
}

/// Turn a configured ruleset into the value passed to `--ruleset`.
///
/// URLs are kept verbatim and existing local files become absolute paths.
/// Anything else is dropped so the linter falls back to its built-in rules.
///
/// # Example
///
/// ```rust
/// use openapi_lint_sdk::invocation::resolve_ruleset;
///
/// assert_eq!(
///     resolve_ruleset("https://example.com/ruleset.yaml").as_deref(),
///     Some("https://example.com/ruleset.yaml")
/// );
/// assert_eq!(resolve_ruleset("does/not/exist.yaml"), None);
/// ```
pub fn resolve_ruleset(ruleset: &str) -> Option<String> {
    if is_ruleset_url(ruleset) {
        debug!("Using custom ruleset URL: {}", ruleset);
        return Some(ruleset.to_string());
    }

    let path = Path::new(ruleset);
    if path.is_file() {
        let absolute = absolute(path);
        debug!("Using custom ruleset file: {}", absolute.display());
        return Some(absolute.to_string_lossy().into_owned());
    }

    warn!(
        "Specified ruleset file does not exist: {}, using the linter's default rules",
        ruleset
    );
    None
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// One linter command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
}

impl Invocation {
    /// Build the `lint` invocation for a single document.
    pub fn lint(executable: &ResolvedExecutable, file: &Path, options: &LintOptions) -> Self {
        Self::lint_with_program(executable.path(), file, options)
    }

    pub(crate) fn lint_with_program(program: &Path, file: &Path, options: &LintOptions) -> Self {
        let mut args: Vec<OsString> = vec!["lint".into()];

        match options.ruleset.as_deref() {
            Some(ruleset) => {
                info!("Using ruleset: {}", ruleset);
                if let Some(value) = resolve_ruleset(ruleset) {
                    args.push("--ruleset".into());
                    args.push(value.into());
                }
            }
            None => info!("No ruleset specified, using the linter's default rules"),
        }

        if let Some(format) = options.format.as_deref().filter(|f| !f.trim().is_empty()) {
            args.push("--format".into());
            args.push(format.into());
        }

        if options.verbose {
            args.push("--verbose".into());
        }

        args.push(absolute(file).into_os_string());

        Self {
            program: program.to_path_buf(),
            args,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Arguments as lossy UTF-8, mostly for assertions and logs
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Command line joined with spaces
    pub fn display_command(&self) -> String {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub(crate) fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}
