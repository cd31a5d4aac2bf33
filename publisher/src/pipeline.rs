//! Orchestration of a publishing run.
//!
//! A run lists releases, resolves both channels, and renders every output
//! file in memory before writing any of them. Any fatal error therefore
//! leaves the output directory exactly as it was. A channel without a
//! release (typically stable, before the first stable release) is skipped
//! and reported rather than treated as an error.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use log::{debug, info};
use tapcast::ProjectConfig;
use tapcast_common::{
    ArtifactCache, Channel, ChannelSelection, PayloadFetcher, Release, ReleaseSet,
    Sha256Digest, Signer, SigningKey, digest_for, find_asset, notes_for,
};

use crate::appcast::{FeedEntry, feed_file_name, render_appcast};
use crate::cask::{ArchChecksums, CaskEntry, cask_file_name, render_cask};
use crate::error::{PublisherError, Result};
use crate::github::ReleaseSource;
use crate::naming::{Arch, AssetName};
use crate::writer::{WriteOutcome, write_if_changed};

/// Directory inside a tap checkout that holds casks.
pub const CASKS_DIR: &str = "Casks";

/// External collaborators used by a run.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    /// Release listing.
    pub releases: &'a dyn ReleaseSource,
    /// Artefact downloads for signing and checksums.
    pub fetcher: &'a dyn PayloadFetcher,
}

/// Options for [`generate_appcasts`].
#[derive(Debug, Clone, Copy)]
pub struct AppcastOptions<'a> {
    /// Directory receiving the feed files.
    pub output_dir: &'a Utf8Path,
    /// Changelog holding the release notes.
    pub changelog: &'a Utf8Path,
    /// Signer for enclosures; feeds are unsigned when absent.
    pub signer: Option<&'a Signer>,
    /// Publication time used for releases without one.
    pub now: DateTime<Utc>,
}

/// Options for [`update_casks`].
#[derive(Debug, Clone, Copy)]
pub struct CaskOptions<'a> {
    /// Root of the Homebrew tap checkout.
    pub tap_path: &'a Utf8Path,
    /// Pin per-architecture checksums instead of `sha256 :no_check`.
    pub pin_checksums: bool,
}

/// What happened to one output of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// A file was written or found up to date.
    File {
        /// Channel the file serves.
        channel: Channel,
        /// Short version the file advertises.
        version: String,
        /// Path of the file.
        path: Utf8PathBuf,
        /// Whether the content changed.
        outcome: WriteOutcome,
    },
    /// A channel had no release, so its outputs were left alone.
    Skipped {
        /// The channel without a release.
        channel: Channel,
    },
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The repository has no release tags; nothing was written.
    NoReleases,
    /// Outputs were generated.
    Completed {
        /// One report per output file or skipped channel, in order.
        reports: Vec<Report>,
    },
}

impl RunOutcome {
    /// Number of files whose content changed.
    #[must_use]
    pub fn updated_count(&self) -> usize {
        match self {
            Self::NoReleases => 0,
            Self::Completed { reports } => reports
                .iter()
                .filter(|report| {
                    matches!(
                        report,
                        Report::File {
                            outcome: WriteOutcome::Updated,
                            ..
                        }
                    )
                })
                .count(),
        }
    }
}

/// Decode the signing secret and enforce `--require-signatures`.
///
/// Runs before any network activity so that misconfiguration fails fast.
///
/// # Errors
///
/// Returns [`PublisherError::Key`] for a malformed secret and
/// [`PublisherError::SigningKeyRequired`] when signatures are required but
/// no secret was supplied.
///
/// # Examples
///
/// ```
/// use tapcast_publisher::pipeline::load_signer;
///
/// assert!(load_signer(None, false).expect("signing is optional").is_none());
/// assert!(load_signer(Some("  "), true).is_err());
/// ```
pub fn load_signer(secret: Option<&str>, require: bool) -> Result<Option<Signer>> {
    let key = match secret {
        Some(secret) => SigningKey::from_secret(secret)?,
        None => None,
    };
    match key {
        Some(key) => Ok(Some(Signer::new(key))),
        None if require => Err(PublisherError::SigningKeyRequired),
        None => Ok(None),
    }
}

/// A file rendered in memory, waiting to be written.
struct PlannedFile {
    channel: Channel,
    version: String,
    path: Utf8PathBuf,
    content: String,
}

enum Planned {
    Write(PlannedFile),
    Skip(Channel),
}

/// Generate the four Sparkle feeds for `config`.
///
/// # Errors
///
/// Returns the first fatal error: listing failure, missing asset, missing
/// changelog section, unreadable changelog, download or signing failure,
/// or write failure. Nothing is written unless every feed rendered.
pub fn generate_appcasts(
    config: &ProjectConfig,
    collaborators: Collaborators<'_>,
    options: AppcastOptions<'_>,
) -> Result<RunOutcome> {
    let set = list_release_set(config, collaborators.releases)?;
    let selection = ChannelSelection::resolve(&set);
    if selection.is_empty() {
        info!("no releases found for {}; skipping appcast generation", config.repo);
        return Ok(RunOutcome::NoReleases);
    }

    let changelog = std::fs::read_to_string(options.changelog).map_err(|source| {
        PublisherError::ChangelogRead {
            path: options.changelog.to_owned(),
            source,
        }
    })?;

    let mut cache = ArtifactCache::new();
    let mut plan = Vec::new();
    for (channel, release) in selection.iter() {
        let Some(release) = release else {
            plan.push(Planned::Skip(channel));
            continue;
        };
        let notes = notes_for(&changelog, release.tag())?;
        for arch in Arch::ALL {
            let file = plan_feed(
                config,
                collaborators.fetcher,
                options,
                &mut cache,
                FeedTarget {
                    channel,
                    arch,
                    release,
                    notes: &notes,
                },
            )?;
            plan.push(Planned::Write(file));
        }
    }

    commit(plan)
}

#[derive(Clone, Copy)]
struct FeedTarget<'a> {
    channel: Channel,
    arch: Arch,
    release: &'a Release,
    notes: &'a str,
}

fn plan_feed(
    config: &ProjectConfig,
    fetcher: &dyn PayloadFetcher,
    options: AppcastOptions<'_>,
    cache: &mut ArtifactCache,
    target: FeedTarget<'_>,
) -> Result<PlannedFile> {
    let version = target.release.version().to_string();
    let expected = AssetName::new(&config.app_name, target.channel, &version, target.arch);
    let asset = find_asset(target.release, expected.as_str())?;
    let signature = match options.signer {
        Some(signer) => Some(signer.signature_for(asset, fetcher, cache)?),
        None => None,
    };

    let link = target.release.page_url().map_or_else(
        || format!("https://github.com/{}/releases/tag/{}", config.repo, target.release.tag()),
        str::to_owned,
    );
    let release_notes_url = config.release_notes_url();
    let entry = FeedEntry {
        app_name: &config.app_name,
        channel: target.channel,
        release: target.release,
        link: &link,
        asset,
        notes: target.notes,
        signature: signature.as_deref(),
        minimum_system_version: config.minimum_system_version(),
        release_notes_url: &release_notes_url,
    };

    Ok(PlannedFile {
        channel: target.channel,
        path: options
            .output_dir
            .join(feed_file_name(target.channel, target.arch)),
        content: render_appcast(&entry, options.now),
        version,
    })
}

/// Regenerate the stable and beta casks in a tap checkout.
///
/// # Errors
///
/// Returns the first fatal error: listing failure, missing asset or
/// download failure while pinning checksums, or write failure. Nothing is
/// written unless both casks rendered.
pub fn update_casks(
    config: &ProjectConfig,
    collaborators: Collaborators<'_>,
    options: CaskOptions<'_>,
) -> Result<RunOutcome> {
    let set = list_release_set(config, collaborators.releases)?;
    let selection = ChannelSelection::resolve(&set);
    if selection.is_empty() {
        info!("no releases found for {}; skipping cask update", config.repo);
        return Ok(RunOutcome::NoReleases);
    }

    let token = config.cask_token();
    let casks_dir = options.tap_path.join(CASKS_DIR);
    let mut cache = ArtifactCache::new();
    let mut plan = Vec::new();
    for (channel, release) in selection.iter() {
        let Some(release) = release else {
            plan.push(Planned::Skip(channel));
            continue;
        };
        let version = release.version().to_string();
        let checksums = if options.pin_checksums {
            Some(pinned_checksums(
                config,
                collaborators.fetcher,
                &mut cache,
                channel,
                release,
            )?)
        } else {
            None
        };
        let entry = CaskEntry {
            token: &token,
            app_name: &config.app_name,
            description: config.cask_description(),
            repo: &config.repo,
            bundle_id: config.bundle_id(),
            channel,
            version: &version,
            checksums: checksums.as_ref(),
        };
        plan.push(Planned::Write(PlannedFile {
            channel,
            path: casks_dir.join(cask_file_name(&token, channel)),
            content: render_cask(&entry),
            version,
        }));
    }

    commit(plan)
}

fn pinned_checksums(
    config: &ProjectConfig,
    fetcher: &dyn PayloadFetcher,
    cache: &mut ArtifactCache,
    channel: Channel,
    release: &Release,
) -> Result<ArchChecksums> {
    let version = release.version().to_string();
    let mut digest = |arch: Arch| -> Result<Sha256Digest> {
        let name = AssetName::new(&config.app_name, channel, &version, arch);
        let asset = find_asset(release, name.as_str())?;
        digest_for(asset, fetcher, cache).map_err(PublisherError::from)
    };
    Ok(ArchChecksums {
        arm64: digest(Arch::Arm64)?,
        x64: digest(Arch::X64)?,
    })
}

fn list_release_set(config: &ProjectConfig, source: &dyn ReleaseSource) -> Result<ReleaseSet> {
    let records = source.list_releases(&config.repo)?;
    debug!("host reported {} releases for {}", records.len(), config.repo);
    Ok(ReleaseSet::from_records(records))
}

fn commit(plan: Vec<Planned>) -> Result<RunOutcome> {
    let mut reports = Vec::with_capacity(plan.len());
    for planned in plan {
        let report = match planned {
            Planned::Skip(channel) => Report::Skipped { channel },
            Planned::Write(file) => {
                let outcome = write_if_changed(&file.path, &file.content).map_err(|source| {
                    PublisherError::Write {
                        path: file.path.clone(),
                        source,
                    }
                })?;
                Report::File {
                    channel: file.channel,
                    version: file.version,
                    path: file.path,
                    outcome,
                }
            }
        };
        reports.push(report);
    }
    Ok(RunOutcome::Completed { reports })
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
