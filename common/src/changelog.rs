//! Release notes extraction from a Keep-a-Changelog style document.
//!
//! Sections are introduced by `## [<tag>]` headings. The notes for a tag
//! are the lines between its heading and the next `## [` heading.

use crate::error::ChangelogError;

/// Text substituted when a release's section is empty.
pub const PLACEHOLDER_NOTES: &str = "Maintenance release.";

/// Prefix shared by every release heading.
const HEADING_PREFIX: &str = "## [";

/// Extract the notes recorded for `tag`.
///
/// The heading must equal `## [<tag>]` once surrounding whitespace is
/// trimmed. Leading and trailing blank lines are dropped; an empty section
/// yields [`PLACEHOLDER_NOTES`].
///
/// # Errors
///
/// Returns [`ChangelogError::HeadingNotFound`] when no heading matches.
///
/// # Examples
///
/// ```
/// use tapcast_common::changelog::notes_for;
///
/// let doc = "## [v1.0.0]\n- A\n- B\n## [v0.9.0]\n- C";
/// assert_eq!(notes_for(doc, "v1.0.0").expect("heading present"), "- A\n- B");
/// assert_eq!(notes_for(doc, "v0.9.0").expect("heading present"), "- C");
/// ```
pub fn notes_for(document: &str, tag: &str) -> Result<String, ChangelogError> {
    let heading = format!("{HEADING_PREFIX}{tag}]");
    let mut lines = document.lines();

    if !lines.by_ref().any(|line| line.trim() == heading) {
        return Err(ChangelogError::HeadingNotFound {
            tag: tag.to_owned(),
        });
    }

    let section: Vec<&str> = lines
        .take_while(|line| !line.starts_with(HEADING_PREFIX))
        .collect();

    let notes = trim_blank_lines(&section).join("\n");
    if notes.is_empty() {
        Ok(PLACEHOLDER_NOTES.to_owned())
    } else {
        Ok(notes)
    }
}

fn trim_blank_lines<'a, 'b>(lines: &'b [&'a str]) -> &'b [&'a str] {
    let is_blank = |line: &&str| line.trim().is_empty();
    let start = lines.iter().position(|line| !is_blank(line)).unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|line| !is_blank(line))
        .map_or(start, |last| last + 1);
    lines.get(start..end).unwrap_or_default()
}
