//! Release tag parsing and ordering.
//!
//! Tags come in two shapes: `v<major>.<minor>.<patch>` for stable releases
//! and `v<major>.<minor>.<patch>-<identifier>` for prereleases. Anything
//! else is not a release tag and is rejected without being treated as an
//! error, since release hosts routinely carry unrelated tags.
//!
//! Ordering is defined through [`VersionKey`], a composite sort key of the
//! numeric triple, a stability flag, and the segmented prerelease
//! identifier. Deriving the order from a tuple keeps it transitive.

use std::cmp::Ordering;
use std::fmt;

use crate::error::VersionError;

/// A structured release version parsed from a tag.
///
/// # Examples
///
/// ```
/// use tapcast_common::version::ParsedVersion;
///
/// let beta_2 = ParsedVersion::parse("v1.2.0-beta.2").expect("prerelease tag");
/// let beta_10 = ParsedVersion::parse("v1.2.0-beta.10").expect("prerelease tag");
/// let stable = ParsedVersion::parse("v1.2.0").expect("stable tag");
///
/// assert!(beta_2 < beta_10);
/// assert!(beta_10 < stable);
/// assert_eq!(stable.tag(), "v1.2.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedVersion {
    major: u64,
    minor: u64,
    patch: u64,
    prerelease: Option<String>,
}

impl ParsedVersion {
    /// Parse a release tag, returning `None` for tags that match neither the
    /// stable nor the prerelease form.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let rest = tag.strip_prefix('v')?;
        let (core, prerelease) = match rest.split_once('-') {
            Some((core, identifier)) => {
                if !is_prerelease_identifier(identifier) {
                    return None;
                }
                (core, Some(identifier.to_owned()))
            }
            None => (rest, None),
        };

        let mut parts = core.split('.');
        let major = parse_component(parts.next()?)?;
        let minor = parse_component(parts.next()?)?;
        let patch = parse_component(parts.next()?)?;
        if parts.next().is_some() {
            return None;
        }

        Some(Self {
            major,
            minor,
            patch,
            prerelease,
        })
    }

    /// Major component.
    #[must_use]
    pub fn major(&self) -> u64 {
        self.major
    }

    /// Minor component.
    #[must_use]
    pub fn minor(&self) -> u64 {
        self.minor
    }

    /// Patch component.
    #[must_use]
    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// The prerelease identifier, present only for prerelease tags.
    #[must_use]
    pub fn prerelease(&self) -> Option<&str> {
        self.prerelease.as_deref()
    }

    /// Whether this version has no prerelease component.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.prerelease.is_none()
    }

    /// Render the canonical tag form, e.g. `v1.2.3` or `v1.2.3-rc.1`.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("v{self}")
    }

    /// Build the composite key this version sorts by.
    #[must_use]
    pub fn sort_key(&self) -> VersionKey<'_> {
        VersionKey {
            triple: (self.major, self.minor, self.patch),
            stable: self.is_stable(),
            segments: self
                .prerelease
                .as_deref()
                .map(segments_of)
                .unwrap_or_default(),
            identifier: self.prerelease.as_deref().unwrap_or_default(),
        }
    }
}

impl TryFrom<&str> for ParsedVersion {
    type Error = VersionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value).ok_or_else(|| VersionError::UnrecognisedTag {
            tag: value.to_owned(),
        })
    }
}

impl fmt::Display for ParsedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(prerelease) = &self.prerelease {
            write!(f, "-{prerelease}")?;
        }
        Ok(())
    }
}

impl Ord for ParsedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for ParsedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Composite sort key for a [`ParsedVersion`].
///
/// Fields compare in declaration order. `stable` sorts `false` before
/// `true`, so every prerelease precedes the stable release with the same
/// triple. `identifier` is a final byte-wise tie-break for identifiers that
/// are equal segment by segment but differ in spelling (`RC.1` and `rc.1`),
/// which keeps the order consistent with field-wise equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct VersionKey<'a> {
    triple: (u64, u64, u64),
    stable: bool,
    segments: Vec<Segment<'a>>,
    identifier: &'a str,
}

/// One dot- or hyphen-separated piece of a prerelease identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    /// All-digit segment with leading zeros stripped.
    Numeric(&'a str),
    /// Any other segment, lowercased for comparison.
    Alpha(String),
}

impl Ord for Segment<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // Digit strings without leading zeros order by length first,
            // which is numeric order for arbitrarily long values.
            (Self::Numeric(a), Self::Numeric(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Self::Numeric(_), Self::Alpha(_)) => Ordering::Less,
            (Self::Alpha(_), Self::Numeric(_)) => Ordering::Greater,
            (Self::Alpha(a), Self::Alpha(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Segment<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn segments_of(identifier: &str) -> Vec<Segment<'_>> {
    identifier
        .split(['.', '-'])
        .map(|part| {
            if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
                Segment::Numeric(part.trim_start_matches('0'))
            } else {
                Segment::Alpha(part.to_ascii_lowercase())
            }
        })
        .collect()
}

fn parse_component(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn is_prerelease_identifier(identifier: &str) -> bool {
    !identifier.is_empty()
        && identifier
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-')
}
