//! Human-readable run summaries written to standard output.
//!
//! Diagnostics go through `log` to standard error; these lines are the
//! command's actual output, so release workflows can capture them.

use std::io::{self, Write};

use crate::pipeline::{Report, RunOutcome};

/// Summary lines for an appcast run.
///
/// # Examples
///
/// ```
/// use tapcast_publisher::output::appcast_summary;
/// use tapcast_publisher::pipeline::RunOutcome;
///
/// assert_eq!(
///     appcast_summary(&RunOutcome::NoReleases),
///     ["No releases found; skipping appcast generation."]
/// );
/// ```
#[must_use]
pub fn appcast_summary(outcome: &RunOutcome) -> Vec<String> {
    let RunOutcome::Completed { reports } = outcome else {
        return vec!["No releases found; skipping appcast generation.".to_owned()];
    };

    let mut lines: Vec<String> = reports
        .iter()
        .map(|report| match report {
            Report::File { path, outcome, .. } => {
                format!("{}: {outcome}", path.file_name().unwrap_or(path.as_str()))
            }
            Report::Skipped { channel } => format!(
                "{} appcasts unchanged (no {channel} releases yet)",
                channel.display_name()
            ),
        })
        .collect();
    lines.push(format!(
        "Appcast generation complete ({} files changed)",
        outcome.updated_count()
    ));
    lines
}

/// Summary lines for a cask run.
#[must_use]
pub fn cask_summary(outcome: &RunOutcome) -> Vec<String> {
    let RunOutcome::Completed { reports } = outcome else {
        return vec!["No releases found; skipping Homebrew cask update.".to_owned()];
    };

    reports
        .iter()
        .map(|report| match report {
            Report::File {
                channel,
                version,
                outcome,
                ..
            } => format!("{} cask -> {version} ({outcome})", channel.display_name()),
            Report::Skipped { channel } => format!(
                "{} cask unchanged (no {channel} releases yet)",
                channel.display_name()
            ),
        })
        .collect()
}

/// Write each line to `out`.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_lines(out: &mut dyn Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
