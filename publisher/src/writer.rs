//! Idempotent file writes.
//!
//! Generated files are only rewritten when their content changes, so a run
//! with unchanged inputs leaves the tap and feed checkouts untouched.

use camino::Utf8Path;
use std::fmt;
use std::io;

/// Whether a write changed the file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was created or its content replaced.
    Updated,
    /// The file already held exactly this content.
    Unchanged,
}

impl WriteOutcome {
    /// Whether the file changed.
    #[must_use]
    pub fn is_updated(self) -> bool {
        self == Self::Updated
    }
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
        })
    }
}

/// Write `content` to `path` unless the file already holds it.
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns any I/O error other than the file not existing yet.
pub fn write_if_changed(path: &Utf8Path, content: &str) -> io::Result<WriteOutcome> {
    match std::fs::read(path) {
        Ok(existing) if existing == content.as_bytes() => return Ok(WriteOutcome::Unchanged),
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }

    if let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(WriteOutcome::Updated)
}
