//! Release listing from the GitHub REST API.
//!
//! Only the fields the publisher consumes are decoded. Missing fields take
//! their defaults so that partially populated releases still reach the core,
//! which decides what to keep.

use chrono::{DateTime, FixedOffset};
use log::{info, warn};
use serde::Deserialize;
use tapcast::HttpConfig;
use tapcast_common::{Asset, ReleaseRecord, Sha256Digest};

/// Base URL of the GitHub REST API.
const API_BASE: &str = "https://api.github.com";

/// Media type requested from the API.
const API_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Releases requested per listing call.
const PER_PAGE: u32 = 100;

/// Source of release records for a repository.
///
/// Abstractions allow tests to supply releases without network access.
#[cfg_attr(test, mockall::automock)]
pub trait ReleaseSource {
    /// List the releases of `repo` (`owner/name`), newest first as the host
    /// reports them.
    ///
    /// # Errors
    ///
    /// Returns a [`ListingError`] when the request or decoding fails.
    fn list_releases(&self, repo: &str) -> Result<Vec<ReleaseRecord>, ListingError>;
}

/// Errors arising from release listing.
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    /// The HTTP request failed.
    #[error("failed to fetch releases from {url}: {reason}")]
    Request {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The response body was not the expected JSON.
    #[error("unexpected release listing from {url}: {reason}")]
    Decode {
        /// The URL that was requested.
        url: String,
        /// Decoder diagnostic.
        reason: String,
    },
}

/// Release listing over HTTPS using `ureq`.
pub struct GitHubReleases {
    agent: ureq::Agent,
    user_agent: String,
    token: Option<String>,
}

impl GitHubReleases {
    /// Create a client using the timeout and user agent from `http`.
    ///
    /// A blank token is treated as absent.
    #[must_use]
    pub fn new(http: &HttpConfig, token: Option<String>) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(http.api_timeout()))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            user_agent: http.user_agent.clone(),
            token: token.filter(|token| !token.trim().is_empty()),
        }
    }

    /// The listing URL for `repo`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tapcast_publisher::github::GitHubReleases;
    ///
    /// assert_eq!(
    ///     GitHubReleases::releases_url("apotenza92/dockter"),
    ///     "https://api.github.com/repos/apotenza92/dockter/releases?per_page=100"
    /// );
    /// ```
    #[must_use]
    pub fn releases_url(repo: &str) -> String {
        format!("{API_BASE}/repos/{repo}/releases?per_page={PER_PAGE}")
    }
}

impl ReleaseSource for GitHubReleases {
    fn list_releases(&self, repo: &str) -> Result<Vec<ReleaseRecord>, ListingError> {
        let url = Self::releases_url(repo);
        info!("listing releases from {url}");

        let mut request = self
            .agent
            .get(&url)
            .header("Accept", API_MEDIA_TYPE)
            .header("User-Agent", self.user_agent.as_str());
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request.call().map_err(|err| ListingError::Request {
            url: url.clone(),
            reason: err.to_string(),
        })?;
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|err| ListingError::Request {
                url: url.clone(),
                reason: err.to_string(),
            })?;

        parse_releases(&body).map_err(|err| ListingError::Decode {
            url,
            reason: err.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawRelease {
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    draft: Option<bool>,
    #[serde(default)]
    prerelease: Option<bool>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    assets: Vec<RawAsset>,
}

#[derive(Debug, Deserialize)]
struct RawAsset {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    browser_download_url: Option<String>,
    #[serde(default)]
    digest: Option<String>,
}

/// Decode a release listing body into host records.
///
/// # Errors
///
/// Returns the decoder error when `body` is not a JSON array of objects.
pub fn parse_releases(body: &str) -> Result<Vec<ReleaseRecord>, serde_json::Error> {
    let raw: Vec<RawRelease> = serde_json::from_str(body)?;
    Ok(raw.into_iter().map(into_record).collect())
}

fn into_record(raw: RawRelease) -> ReleaseRecord {
    let tag = raw.tag_name.unwrap_or_default();
    let published_at = raw
        .published_at
        .as_deref()
        .and_then(|value| parse_timestamp(&tag, value));
    ReleaseRecord {
        published_at,
        page_url: raw.html_url.filter(|url| !url.is_empty()),
        is_draft: raw.draft.unwrap_or(false),
        is_prerelease_flag: raw.prerelease.unwrap_or(false),
        assets: raw.assets.into_iter().map(into_asset).collect(),
        tag,
    }
}

fn into_asset(raw: RawAsset) -> Asset {
    Asset::new(
        raw.name.unwrap_or_default(),
        raw.browser_download_url.unwrap_or_default(),
        raw.size.unwrap_or(0),
        raw.digest.as_deref().and_then(Sha256Digest::parse_host),
    )
}

fn parse_timestamp(tag: &str, value: &str) -> Option<DateTime<FixedOffset>> {
    if value.trim().is_empty() {
        return None;
    }
    match DateTime::parse_from_rfc3339(value) {
        Ok(timestamp) => Some(timestamp),
        Err(err) => {
            warn!("ignoring unparseable published_at '{value}' on {tag}: {err}");
            None
        }
    }
}
