//! Help text rendering from argument metadata.
//!
//! The help processor reads the same bindings the argument processor uses,
//! so labels, defaults and constraints shown to the user always match what
//! parsing accepts.
//!
//! ```text
//! Usage: backup [options] <files...>
//!
//! Copies files to the backup location.
//!
//! Options:
//!   --verbose, -v     Print every copied file.
//!   --target <path>   Destination directory. [required]
//! ```

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::binding::FieldBinding;
use crate::error::Result;
use crate::field::{ArgKind, Arguments};
use crate::processor::discover;
use crate::token::{LONG_PREFIX, SHORT_PREFIX};

/// Fallback width when the terminal size is unknown.
pub const DEFAULT_WIDTH: usize = 80;

/// Narrowest width help text is wrapped to.
pub const MIN_WIDTH: usize = 40;

/// Layout settings for help output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpSettings {
    /// Total line width.
    pub width: usize,
    /// Indentation of option rows.
    pub indent: usize,
    /// Spaces between the label column and the help column.
    pub gap: usize,
}

impl Default for HelpSettings {
    fn default() -> Self {
        let width = terminal_size::terminal_size()
            .map(|(terminal_size::Width(w), _)| w as usize)
            .unwrap_or(DEFAULT_WIDTH);
        HelpSettings {
            width: width.max(MIN_WIDTH),
            indent: 2,
            gap: 2,
        }
    }
}

impl HelpSettings {
    /// Settings with a fixed width, ignoring the terminal.
    pub fn with_width(width: usize) -> Self {
        HelpSettings {
            width: width.max(MIN_WIDTH),
            ..HelpSettings::default()
        }
    }
}

/// Renders help text for `T`.
///
/// Fails with the same errors discovery reports for malformed metadata.
pub fn render_help<T: Arguments>(settings: &HelpSettings) -> Result<String> {
    let bindings = discover::<T>()?;
    let info = T::usage_info();
    let mut out = String::new();

    let program = info.program.as_deref().unwrap_or("program");
    out.push_str(&usage_line(program, &bindings));
    out.push('\n');

    if let Some(about) = info.about.as_deref() {
        out.push('\n');
        for line in wrap_text(about, settings.width) {
            out.push_str(&line);
            out.push('\n');
        }
    }

    let rows: Vec<(String, String)> = bindings
        .iter()
        .filter(|b| b.kind() != ArgKind::Verbal || b.help().is_some())
        .map(|b| (label_cell(b), help_cell(b)))
        .collect();

    if !rows.is_empty() {
        out.push_str("\nOptions:\n");
        let label_width = rows.iter().map(|(label, _)| label.width()).max().unwrap_or(0);
        let help_column = settings.indent + label_width + settings.gap;
        let help_width = settings.width.saturating_sub(help_column).max(MIN_WIDTH / 2);

        for (label, help) in rows {
            let mut lines = wrap_text(&help, help_width).into_iter();
            let first = lines.next().unwrap_or_default();
            let row = format!(
                "{}{}{}{}",
                " ".repeat(settings.indent),
                label,
                " ".repeat(label_width - label.width() + settings.gap),
                first
            );
            out.push_str(row.trim_end());
            out.push('\n');
            for line in lines {
                out.push_str(&" ".repeat(help_column));
                out.push_str(&line);
                out.push('\n');
            }
        }
    }

    if let Some(footer) = info.footer.as_deref() {
        out.push('\n');
        for line in wrap_text(footer, settings.width) {
            out.push_str(&line);
            out.push('\n');
        }
    }

    Ok(out)
}

fn usage_line(program: &str, bindings: &[FieldBinding]) -> String {
    let mut usage = format!("Usage: {program}");
    if bindings.iter().any(|b| b.kind() != ArgKind::Verbal) {
        usage.push_str(" [options]");
    }
    if let Some(verbal) = bindings.iter().find(|b| b.kind() == ArgKind::Verbal) {
        let name = verbal.value_name().unwrap_or(verbal.name());
        usage.push_str(&format!(" <{name}...>"));
    }
    usage
}

fn label_cell(binding: &FieldBinding) -> String {
    if binding.kind() == ArgKind::Verbal {
        return format!("<{}...>", binding.value_name().unwrap_or(binding.name()));
    }

    let mut labels = Vec::new();
    if let Some(solid) = binding.solid_label() {
        labels.push(format!("{LONG_PREFIX}{solid}"));
    }
    if let Some(brief) = binding.brief_label() {
        labels.push(format!("{SHORT_PREFIX}{brief}"));
    }
    let mut cell = labels.join(", ");

    if binding.kind() == ArgKind::Option {
        let value = binding.value_name().unwrap_or("value");
        let separator = binding.separator();
        if separator == ' ' {
            cell.push_str(&format!(" <{value}>"));
        } else {
            cell.push_str(&format!("{separator}<{value}>"));
        }
    }
    cell
}

fn help_cell(binding: &FieldBinding) -> String {
    let mut text = binding.help().unwrap_or_default().to_string();
    let mut notes = Vec::new();
    if binding.is_required() {
        notes.push("required".to_string());
    }
    if binding.is_exclusive() {
        notes.push("exclusive".to_string());
    }
    if let Some(default) = binding.default_value() {
        notes.push(format!("default: {default}"));
    }
    if !binding.dependencies().is_empty() {
        notes.push(format!("needs: {}", binding.dependencies().join(", ")));
    }
    if !notes.is_empty() {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&format!("[{}]", notes.join("; ")));
    }
    text
}

/// Wraps `text` into lines of at most `width` display columns.
///
/// Words longer than `width` are broken by character.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            if line_width > 0 && line_width + 1 + word_width > width {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            if word_width > width {
                for c in word.chars() {
                    let char_width = c.width().unwrap_or(0);
                    if line_width + char_width > width {
                        lines.push(std::mem::take(&mut line));
                        line_width = 0;
                    }
                    line.push(c);
                    line_width += char_width;
                }
                continue;
            }
            if line_width > 0 {
                line.push(' ');
                line_width += 1;
            }
            line.push_str(word);
            line_width += word_width;
        }
        lines.push(line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_width() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 10);
        assert!(lines.iter().all(|l| l.width() <= 10), "{lines:?}");
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn wrap_breaks_long_words() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_keeps_paragraphs() {
        let lines = wrap_text("one\n\ntwo", 20);
        assert_eq!(lines, vec!["one", "", "two"]);
    }

    #[test]
    fn wrap_counts_display_width() {
        let lines = wrap_text("日本語 日本語", 6);
        assert_eq!(lines, vec!["日本語", "日本語"]);
    }

    #[test]
    fn settings_never_below_minimum() {
        assert_eq!(HelpSettings::with_width(10).width, MIN_WIDTH);
        assert_eq!(HelpSettings::with_width(100).width, 100);
    }
}
