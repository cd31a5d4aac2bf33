//! Sparkle appcast rendering.
//!
//! Each channel and architecture gets its own single-item feed, e.g.
//! `beta-arm64.xml`. Sparkle compares `sparkle:version` numerically, so the
//! build number packs the version triple and a release stage into one
//! integer that sorts prereleases before the stable release they precede.

use chrono::{DateTime, Utc};
use tapcast_common::{Asset, Channel, ParsedVersion, Release};

use crate::naming::Arch;

/// Sparkle XML namespace.
const SPARKLE_NAMESPACE: &str = "http://www.andymatuschak.org/xml-namespaces/sparkle";

/// Build-number stage of a stable release.
const STABLE_STAGE: u64 = 90_000;

/// Build-number stage of a prerelease without a beta number.
const OTHER_PRERELEASE_STAGE: u64 = 50_000;

/// Largest stage a numbered beta may occupy.
const MAX_BETA_STAGE: u64 = 89_999;

/// Everything needed to render one feed.
#[derive(Debug, Clone, Copy)]
pub struct FeedEntry<'a> {
    /// App display name, e.g. `Dockter`.
    pub app_name: &'a str,
    /// Channel the feed serves.
    pub channel: Channel,
    /// Release advertised by the feed.
    pub release: &'a Release,
    /// Web page linked from the item.
    pub link: &'a str,
    /// Enclosure asset for the feed's architecture.
    pub asset: &'a Asset,
    /// Release notes text.
    pub notes: &'a str,
    /// Base64 Ed25519 signature of the enclosure, when signing is enabled.
    pub signature: Option<&'a str>,
    /// `sparkle:minimumSystemVersion` value.
    pub minimum_system_version: &'a str,
    /// `sparkle:fullReleaseNotesLink` value.
    pub release_notes_url: &'a str,
}

/// File name of the feed for `channel` on `arch`, e.g. `stable-x64.xml`.
#[must_use]
pub fn feed_file_name(channel: Channel, arch: Arch) -> String {
    format!("{channel}-{arch}.xml")
}

/// Sparkle build number for `version`.
///
/// `(major * 1_000_000 + minor * 1_000 + patch) * 100_000 + stage`, where
/// the stage is 90 000 for stable releases, the beta number (clamped to
/// 1..=89 999) for identifiers ending in `beta<N>` or `b<N>`, and 50 000 for
/// any other prerelease.
///
/// # Examples
///
/// ```
/// use tapcast_common::ParsedVersion;
/// use tapcast_publisher::appcast::build_number;
///
/// let stable = ParsedVersion::parse("v1.2.3").expect("release tag");
/// let beta = ParsedVersion::parse("v1.2.3-beta.4").expect("release tag");
/// assert_eq!(build_number(&stable), 100_200_390_000);
/// assert_eq!(build_number(&beta), 100_200_300_004);
/// ```
#[must_use]
pub fn build_number(version: &ParsedVersion) -> u128 {
    let core = u128::from(version.major()) * 1_000_000
        + u128::from(version.minor()) * 1_000
        + u128::from(version.patch());
    let stage = version.prerelease().map_or(STABLE_STAGE, prerelease_stage);
    core * 100_000 + u128::from(stage)
}

fn prerelease_stage(identifier: &str) -> u64 {
    let stem = identifier.trim_end_matches(|c: char| c.is_ascii_digit());
    let Some(digits) = identifier.strip_prefix(stem) else {
        return OTHER_PRERELEASE_STAGE;
    };
    if digits.is_empty() {
        return OTHER_PRERELEASE_STAGE;
    }

    let marker = stem
        .strip_suffix(['.', '-'])
        .unwrap_or(stem)
        .to_ascii_lowercase();
    if !(marker.ends_with("beta") || marker.ends_with('b')) {
        return OTHER_PRERELEASE_STAGE;
    }

    // Digits too long for u64 are far beyond the cap anyway.
    digits
        .parse::<u64>()
        .map_or(MAX_BETA_STAGE, |number| number.clamp(1, MAX_BETA_STAGE))
}

/// Render the appcast XML for `entry`.
///
/// `now` stands in for the publication time of releases the host has not
/// timestamped.
#[must_use]
pub fn render_appcast(entry: &FeedEntry<'_>, now: DateTime<Utc>) -> String {
    let version = entry.release.version().to_string();
    let channel_name = entry.channel.display_name();
    let published = entry
        .release
        .published_at()
        .map_or_else(|| now.to_rfc2822(), DateTime::to_rfc2822);
    let signature = entry
        .signature
        .map(|signature| {
            format!(
                "\n                 sparkle:edSignature=\"{}\"",
                escape_xml(signature)
            )
        })
        .unwrap_or_default();

    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
            "<rss version=\"2.0\" xmlns:sparkle=\"{namespace}\">\n",
            "  <channel>\n",
            "    <title>{app} {channel_name} Updates</title>\n",
            "    <description>{app} update feed ({channel} channel)</description>\n",
            "    <language>en</language>\n",
            "    <item>\n",
            "      <title>Version {version}</title>\n",
            "      <link>{link}</link>\n",
            "      <sparkle:version>{build}</sparkle:version>\n",
            "      <sparkle:shortVersionString>{version}</sparkle:shortVersionString>\n",
            "      <sparkle:minimumSystemVersion>{minimum}</sparkle:minimumSystemVersion>\n",
            "      <sparkle:fullReleaseNotesLink>{notes_url}</sparkle:fullReleaseNotesLink>\n",
            "      <description sparkle:format=\"plain-text\"><![CDATA[{notes}]]></description>\n",
            "      <pubDate>{published}</pubDate>\n",
            "      <enclosure url=\"{url}\"{signature}\n",
            "                 length=\"{length}\"\n",
            "                 type=\"application/octet-stream\" />\n",
            "    </item>\n",
            "  </channel>\n",
            "</rss>\n",
        ),
        namespace = SPARKLE_NAMESPACE,
        app = escape_xml(entry.app_name),
        channel_name = channel_name,
        channel = entry.channel,
        version = escape_xml(&version),
        link = escape_xml(entry.link),
        build = build_number(entry.release.version()),
        minimum = escape_xml(entry.minimum_system_version),
        notes_url = escape_xml(entry.release_notes_url),
        notes = escape_cdata(entry.notes),
        published = published,
        url = escape_xml(entry.asset.download_location()),
        signature = signature,
        length = entry.asset.size_bytes(),
    )
}

/// Split any `]]>` so the text can sit inside a CDATA section.
fn escape_cdata(text: &str) -> String {
    text.replace("]]>", "]]]]><![CDATA[>")
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
