//! Violation counting
//!
//! A zero exit code always means zero violations. For non-zero exits the
//! count is read from the linter's JSON report when one was requested, and
//! otherwise estimated from its text output.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde::de::IgnoredAny;

/// A `line:column` locator anywhere in a line
static LOCATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+:\d+").expect("Invalid regex"));

const SEVERITY_WORDS: [&str; 3] = ["error", "warning", "info"];

/// Estimate the number of violations from free-text output.
///
/// A trimmed line counts when it mentions `error`, `warning` or `info` and
/// carries a `line:column` locator. A failing run with no such lines still
/// counts as one violation.
///
/// # Example
///
/// ```rust
/// use openapi_lint_sdk::violations::count_violations;
///
/// let output = " 12:5  error  oas3-schema  `info` property must have required property `version`.";
/// assert_eq!(count_violations(output, 1), 1);
/// assert_eq!(count_violations(output, 0), 0);
/// assert_eq!(count_violations("segmentation fault", 139), 1);
/// ```
pub fn count_violations(output: &str, exit_code: i32) -> usize {
    if exit_code == 0 {
        return 0;
    }

    let count = output
        .lines()
        .map(str::trim)
        .filter(|line| is_violation_line(line))
        .count();

    count.max(1)
}

fn is_violation_line(line: &str) -> bool {
    SEVERITY_WORDS.iter().any(|word| line.contains(word)) && LOCATION_PATTERN.is_match(line)
}

/// One entry of the linter's JSON report. Only the shape is checked.
#[derive(Debug, Deserialize)]
struct Finding {
    #[serde(rename = "code")]
    _code: IgnoredAny,
    #[serde(rename = "message")]
    _message: IgnoredAny,
}

/// Count findings in a JSON report, or `None` if the output is not one.
///
/// Text printed around the report (banners, progress lines) is ignored: the
/// report is taken to run from the first `[` to the last `]`.
pub fn count_structured(output: &str) -> Option<usize> {
    let start = output.find('[')?;
    let end = output.rfind(']')?;
    if end < start {
        return None;
    }
    serde_json::from_str::<Vec<Finding>>(&output[start..=end])
        .ok()
        .map(|findings| findings.len())
}

/// Picks the counting strategy for an output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViolationCounter {
    /// Line heuristic over free text
    #[default]
    Heuristic,
    /// JSON report, falling back to the heuristic when it does not parse
    Structured,
}

impl ViolationCounter {
    pub fn for_format(format: Option<&str>) -> Self {
        match format {
            Some(f) if f.trim().eq_ignore_ascii_case("json") => ViolationCounter::Structured,
            _ => ViolationCounter::Heuristic,
        }
    }

    pub fn count(self, output: &str, exit_code: i32) -> usize {
        if exit_code == 0 {
            return 0;
        }
        match self {
            ViolationCounter::Heuristic => count_violations(output, exit_code),
            ViolationCounter::Structured => match count_structured(output) {
                Some(n) => n.max(1),
                None => count_violations(output, exit_code),
            },
        }
    }
}
