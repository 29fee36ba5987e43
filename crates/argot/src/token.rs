//! Token classification.
//!
//! A token is a parameter when, trimmed, it starts with one of the prefix
//! markers `--`, `-` or `/` followed by at least one more character.
//! Anything else is a plain value.

use crate::error::{ArgumentError, Result};

/// Long-form prefix marker.
pub const LONG_PREFIX: &str = "--";
/// Short-form prefix marker.
pub const SHORT_PREFIX: &str = "-";
/// Alternate prefix marker.
pub const ALTERNATE_PREFIX: &str = "/";

/// Returns the text after the prefix marker, or `None` for plain values.
///
/// ```
/// use argot::strip_prefix;
///
/// assert_eq!(strip_prefix("--verbose"), Some("verbose"));
/// assert_eq!(strip_prefix(" -v "), Some("v"));
/// assert_eq!(strip_prefix("/v"), Some("v"));
/// assert_eq!(strip_prefix("--"), None);
/// assert_eq!(strip_prefix("value"), None);
/// ```
pub fn strip_prefix(token: &str) -> Option<&str> {
    let trimmed = token.trim();
    let rest = trimmed
        .strip_prefix(LONG_PREFIX)
        .or_else(|| trimmed.strip_prefix(SHORT_PREFIX))
        .or_else(|| trimmed.strip_prefix(ALTERNATE_PREFIX))?;
    (!rest.is_empty()).then_some(rest)
}

/// Returns `true` if `token` looks like a parameter.
pub fn looks_like_parameter(token: &str) -> bool {
    strip_prefix(token).is_some()
}

/// Normalizes a declared label: trims it and removes one prefix marker.
///
/// Returns `None` when nothing is left.
pub(crate) fn normalize_label(label: &str) -> Option<String> {
    let trimmed = label.trim();
    let stripped = strip_prefix(trimmed).unwrap_or(trimmed).trim();
    let unmarked = stripped != LONG_PREFIX
        && stripped != SHORT_PREFIX
        && stripped != ALTERNATE_PREFIX;
    (!stripped.is_empty() && unmarked).then(|| stripped.to_string())
}

/// Splits a command line string into tokens, honoring shell quoting.
///
/// ```
/// use argot::split_command_line;
///
/// let tokens = split_command_line(r#"--name "John Doe" -v"#).unwrap();
/// assert_eq!(tokens, vec!["--name", "John Doe", "-v"]);
/// ```
pub fn split_command_line(line: &str) -> Result<Vec<String>> {
    shell_words::split(line).map_err(|e| ArgumentError::CommandLine(e.to_string()))
}
