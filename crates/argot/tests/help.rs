//! Help rendering from derived metadata.

use argot::{render_help, ErrorKind, HelpSettings};
use argot_macros::Arguments;

/// Copies files to the backup location.
#[derive(Arguments, Default)]
#[args(program = "backup", footer = "Exit status is 0 on success.")]
struct Backup {
    /// Print every copied file.
    #[args(switch, solid = "verbose", brief = "v")]
    verbose: bool,

    #[args(option, solid = "target", required, value_name = "path", help = "Destination directory.")]
    target: String,

    #[args(option, solid = "level", separator = ':', default = 6, depends = "target")]
    level: u8,

    #[args(verbal, value_name = "files")]
    files: Vec<String>,
}

#[derive(Arguments, Default)]
struct Broken {
    #[args(switch)]
    flag: bool,
}

fn settings() -> HelpSettings {
    HelpSettings::with_width(80)
}

#[test]
fn usage_line_names_program_and_verbal() {
    let help = render_help::<Backup>(&settings()).unwrap();
    assert!(help.starts_with("Usage: backup [options] <files...>\n"), "{help}");
}

#[test]
fn about_falls_back_to_doc_comment() {
    let help = render_help::<Backup>(&settings()).unwrap();
    assert!(help.contains("\nCopies files to the backup location.\n"), "{help}");
}

#[test]
fn option_rows_show_labels_and_notes() {
    let help = render_help::<Backup>(&settings()).unwrap();
    assert!(help.contains("--verbose, -v"), "{help}");
    assert!(help.contains("Print every copied file."), "{help}");
    assert!(help.contains("--target <path>"), "{help}");
    assert!(help.contains("Destination directory. [required]"), "{help}");
    assert!(help.contains("--level:<value>"), "{help}");
    assert!(help.contains("[default: 6; needs: target]"), "{help}");
}

#[test]
fn help_column_is_aligned() {
    let help = render_help::<Backup>(&settings()).unwrap();
    let columns: Vec<usize> = help
        .lines()
        .filter(|line| line.starts_with("  --"))
        .map(|line| {
            let label_end = line[2..].find("  ").map(|i| i + 2).unwrap_or(line.len());
            label_end + line[label_end..].len() - line[label_end..].trim_start().len()
        })
        .collect();
    assert_eq!(columns.len(), 3, "{help}");
    assert!(columns.windows(2).all(|w| w[0] == w[1]), "{help}");
}

#[test]
fn footer_closes_the_output() {
    let help = render_help::<Backup>(&settings()).unwrap();
    assert!(help.ends_with("\nExit status is 0 on success.\n"), "{help}");
}

#[test]
fn rows_wrap_within_width() {
    let help = render_help::<Backup>(&HelpSettings::with_width(40)).unwrap();
    assert!(help.lines().all(|line| line.chars().count() <= 40), "{help}");
}

#[test]
fn malformed_metadata_fails_like_discovery() {
    let err = render_help::<Broken>(&settings()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Utilize);
}
