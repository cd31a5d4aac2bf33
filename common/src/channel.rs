//! Channel resolution: which release each update track advertises.
//!
//! The stable channel follows the newest stable release. The beta channel
//! follows whichever is newer of the newest stable release and the newest
//! prerelease, with ties going to stable, so beta users never fall behind
//! a stable release that has superseded the latest prerelease.

use std::fmt;

use crate::release::{Release, ReleaseSet};

/// A named update track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    /// Stable releases only.
    Stable,
    /// Stable releases and prereleases, whichever is newer.
    Beta,
}

impl Channel {
    /// Both channels in publication order.
    pub const ALL: [Self; 2] = [Self::Stable, Self::Beta];

    /// Lowercase identifier, e.g. `stable`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Beta => "beta",
        }
    }

    /// Capitalised name for user-facing text, e.g. `Beta`.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Stable => "Stable",
            Self::Beta => "Beta",
        }
    }

    /// Qualifier inserted into artefact and app names for this channel.
    #[must_use]
    pub fn qualifier(self) -> Option<&'static str> {
        match self {
            Self::Stable => None,
            Self::Beta => Some("Beta"),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The release each channel points to for one run.
///
/// # Examples
///
/// ```
/// use tapcast_common::channel::{Channel, ChannelSelection};
/// use tapcast_common::release::{ReleaseRecord, ReleaseSet};
///
/// let set = ReleaseSet::from_records(["v1.0.0", "v1.1.0-beta.1"].map(|tag| ReleaseRecord {
///     tag: tag.to_owned(),
///     ..ReleaseRecord::default()
/// }));
/// let selection = ChannelSelection::resolve(&set);
///
/// assert_eq!(selection.get(Channel::Stable).map(|r| r.tag()), Some("v1.0.0"));
/// assert_eq!(selection.get(Channel::Beta).map(|r| r.tag()), Some("v1.1.0-beta.1"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSelection<'a> {
    stable: Option<&'a Release>,
    beta: Option<&'a Release>,
}

impl<'a> ChannelSelection<'a> {
    /// Select the release for each channel.
    #[must_use]
    pub fn resolve(set: &'a ReleaseSet) -> Self {
        let stable = latest_stable(set.releases());
        let prerelease = latest_prerelease(set.releases());
        let beta = match (stable, prerelease) {
            (Some(stable), Some(prerelease)) => {
                if stable.version() >= prerelease.version() {
                    Some(stable)
                } else {
                    Some(prerelease)
                }
            }
            (stable, prerelease) => stable.or(prerelease),
        };
        Self { stable, beta }
    }

    /// The release selected for `channel`, if any.
    #[must_use]
    pub fn get(&self, channel: Channel) -> Option<&'a Release> {
        match channel {
            Channel::Stable => self.stable,
            Channel::Beta => self.beta,
        }
    }

    /// Whether neither channel has a release.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stable.is_none() && self.beta.is_none()
    }

    /// Channels paired with their selection, in publication order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, Option<&'a Release>)> + '_ {
        Channel::ALL
            .into_iter()
            .map(move |channel| (channel, self.get(channel)))
    }
}

/// The newest release without a prerelease component.
#[must_use]
pub fn latest_stable(releases: &[Release]) -> Option<&Release> {
    releases
        .iter()
        .filter(|release| release.version().is_stable())
        .max_by(|a, b| a.version().cmp(b.version()))
}

/// The newest release with a prerelease component.
#[must_use]
pub fn latest_prerelease(releases: &[Release]) -> Option<&Release> {
    releases
        .iter()
        .filter(|release| !release.version().is_stable())
        .max_by(|a, b| a.version().cmp(b.version()))
}
