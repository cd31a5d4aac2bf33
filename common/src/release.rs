//! Immutable release and asset records.
//!
//! A [`ReleaseRecord`] is what the release host reported; a [`Release`] is
//! the same record once its tag has been parsed. [`ReleaseSet`] drops
//! non-release tags and drafts at construction, so nothing downstream ever
//! sees them.

use chrono::{DateTime, FixedOffset};
use log::{debug, warn};
use std::collections::HashSet;

use crate::digest::Sha256Digest;
use crate::version::ParsedVersion;

/// A binary attached to a release.
///
/// # Examples
///
/// ```
/// use tapcast_common::release::Asset;
///
/// let asset = Asset::new(
///     "Dockter-v1.0.0-macos-arm64.zip",
///     "https://example.test/Dockter-v1.0.0-macos-arm64.zip",
///     1024,
///     None,
/// );
/// assert_eq!(asset.size_bytes(), 1024);
/// assert!(asset.digest().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    name: String,
    download_location: String,
    size_bytes: u64,
    digest: Option<Sha256Digest>,
}

impl Asset {
    /// Create an asset record.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        download_location: impl Into<String>,
        size_bytes: u64,
        digest: Option<Sha256Digest>,
    ) -> Self {
        Self {
            name: name.into(),
            download_location: download_location.into(),
            size_bytes,
            digest,
        }
    }

    /// Asset file name, unique within its release.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// URL the asset is downloaded from.
    #[must_use]
    pub fn download_location(&self) -> &str {
        &self.download_location
    }

    /// Size in bytes as reported by the host.
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Digest published by the host, when it supplied a usable one.
    #[must_use]
    pub fn digest(&self) -> Option<&Sha256Digest> {
        self.digest.as_ref()
    }
}

/// A release as reported by the host, before tag parsing.
#[derive(Debug, Clone, Default)]
pub struct ReleaseRecord {
    /// Tag the release was published under.
    pub tag: String,
    /// Web page for the release, if the host reported one.
    pub page_url: Option<String>,
    /// Whether the release is an unpublished draft.
    pub is_draft: bool,
    /// The host's own prerelease flag, independent of the tag.
    pub is_prerelease_flag: bool,
    /// Publication time, if published.
    pub published_at: Option<DateTime<FixedOffset>>,
    /// Attached assets in host order.
    pub assets: Vec<Asset>,
}

/// A published release whose tag parsed as a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    tag: String,
    page_url: Option<String>,
    is_draft: bool,
    is_prerelease_flag: bool,
    published_at: Option<DateTime<FixedOffset>>,
    assets: Vec<Asset>,
    version: ParsedVersion,
}

impl Release {
    /// Build a release from a host record, returning `None` when the tag is
    /// not a release tag.
    ///
    /// Asset names must be unique within a release; later duplicates are
    /// dropped with a warning.
    #[must_use]
    pub fn from_record(record: ReleaseRecord) -> Option<Self> {
        let version = ParsedVersion::parse(&record.tag)?;
        let assets = dedupe_assets(&record.tag, record.assets);
        Some(Self {
            tag: record.tag,
            page_url: record.page_url,
            is_draft: record.is_draft,
            is_prerelease_flag: record.is_prerelease_flag,
            published_at: record.published_at,
            assets,
            version,
        })
    }

    /// The tag string as published.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Web page for the release.
    #[must_use]
    pub fn page_url(&self) -> Option<&str> {
        self.page_url.as_deref()
    }

    /// Whether the host marks this release as a draft.
    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.is_draft
    }

    /// The host's prerelease flag. Channel resolution ignores this and
    /// looks at the version's prerelease component instead.
    #[must_use]
    pub fn is_prerelease_flag(&self) -> bool {
        self.is_prerelease_flag
    }

    /// Publication time, if known.
    #[must_use]
    pub fn published_at(&self) -> Option<&DateTime<FixedOffset>> {
        self.published_at.as_ref()
    }

    /// Attached assets in host order.
    #[must_use]
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Version parsed from the tag.
    #[must_use]
    pub fn version(&self) -> &ParsedVersion {
        &self.version
    }
}

fn dedupe_assets(tag: &str, assets: Vec<Asset>) -> Vec<Asset> {
    let mut seen = HashSet::new();
    assets
        .into_iter()
        .filter(|asset| {
            let first = seen.insert(asset.name.clone());
            if !first {
                warn!("release {tag} lists asset '{}' more than once; keeping the first", asset.name);
            }
            first
        })
        .collect()
}

/// The non-draft releases known to one run.
///
/// # Examples
///
/// ```
/// use tapcast_common::release::{ReleaseRecord, ReleaseSet};
///
/// let set = ReleaseSet::from_records([
///     ReleaseRecord { tag: "v1.0.0".to_owned(), ..ReleaseRecord::default() },
///     ReleaseRecord { tag: "v2.0.0".to_owned(), is_draft: true, ..ReleaseRecord::default() },
///     ReleaseRecord { tag: "nightly".to_owned(), ..ReleaseRecord::default() },
/// ]);
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReleaseSet {
    releases: Vec<Release>,
}

impl ReleaseSet {
    /// Parse host records, silently dropping non-release tags and drafts.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = ReleaseRecord>) -> Self {
        let releases = records
            .into_iter()
            .filter_map(|record| {
                let tag = record.tag.clone();
                let Some(release) = Release::from_record(record) else {
                    debug!("ignoring non-release tag '{tag}'");
                    return None;
                };
                if release.is_draft() {
                    debug!("ignoring draft release {tag}");
                    return None;
                }
                Some(release)
            })
            .collect();
        Self { releases }
    }

    /// The retained releases in host order.
    #[must_use]
    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    /// Number of retained releases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.releases.len()
    }

    /// Whether no release survived filtering.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}
