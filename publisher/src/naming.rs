//! Release asset naming policy.
//!
//! Builds publish one zip per channel and architecture:
//! `<App>-v<version>-macos-<arch>.zip` for stable builds and
//! `<App>-Beta-v<version>-macos-<arch>.zip` for beta builds, which install
//! side by side as `<App> Beta.app`.

use std::fmt;
use tapcast_common::Channel;

/// Platform segment shared by every asset name.
const PLATFORM: &str = "macos";

/// File extension for release archives.
const ARCHIVE_EXTENSION: &str = ".zip";

/// A macOS CPU architecture with its own build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    /// Apple silicon.
    Arm64,
    /// Intel.
    X64,
}

impl Arch {
    /// Every published architecture, in feed order.
    pub const ALL: [Self; 2] = [Self::Arm64, Self::X64];

    /// Token used in asset and feed file names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Arm64 => "arm64",
            Self::X64 => "x64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The expected file name of a release asset.
///
/// The version is inserted verbatim, so casks can pass a Ruby interpolation
/// such as `#{version}` in place of a concrete version.
///
/// # Examples
///
/// ```
/// use tapcast_common::Channel;
/// use tapcast_publisher::naming::{Arch, AssetName};
///
/// let name = AssetName::new("Dockter", Channel::Beta, "1.1.0-beta.1", Arch::Arm64);
/// assert_eq!(name.to_string(), "Dockter-Beta-v1.1.0-beta.1-macos-arm64.zip");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetName(String);

impl AssetName {
    /// Build the asset name for `app_name` on `channel` and `arch`.
    #[must_use]
    pub fn new(app_name: &str, channel: Channel, version: &str, arch: Arch) -> Self {
        let qualifier = channel
            .qualifier()
            .map(|qualifier| format!("-{qualifier}"))
            .unwrap_or_default();
        Self(format!(
            "{app_name}{qualifier}-v{version}-{PLATFORM}-{arch}{ARCHIVE_EXTENSION}"
        ))
    }

    /// Return the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The app bundle name users see for `channel`, e.g. `Dockter Beta`.
#[must_use]
pub fn app_display_name(app_name: &str, channel: Channel) -> String {
    match channel.qualifier() {
        Some(qualifier) => format!("{app_name} {qualifier}"),
        None => app_name.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::stable_arm(Channel::Stable, "1.2.0", Arch::Arm64, "Dockter-v1.2.0-macos-arm64.zip")]
    #[case::stable_intel(Channel::Stable, "1.2.0", Arch::X64, "Dockter-v1.2.0-macos-x64.zip")]
    #[case::beta_arm(
        Channel::Beta,
        "1.3.0-beta.2",
        Arch::Arm64,
        "Dockter-Beta-v1.3.0-beta.2-macos-arm64.zip"
    )]
    #[case::beta_tracking_stable(
        Channel::Beta,
        "1.2.0",
        Arch::X64,
        "Dockter-Beta-v1.2.0-macos-x64.zip"
    )]
    #[case::ruby_interpolation(
        Channel::Stable,
        "#{version}",
        Arch::X64,
        "Dockter-v#{version}-macos-x64.zip"
    )]
    fn builds_expected_names(
        #[case] channel: Channel,
        #[case] version: &str,
        #[case] arch: Arch,
        #[case] expected: &str,
    ) {
        assert_eq!(AssetName::new("Dockter", channel, version, arch).as_str(), expected);
    }

    #[test]
    fn display_names_follow_channel() {
        assert_eq!(app_display_name("Dockter", Channel::Stable), "Dockter");
        assert_eq!(app_display_name("Dockter", Channel::Beta), "Dockter Beta");
    }

    #[test]
    fn arch_tokens() {
        assert_eq!(Arch::ALL.map(Arch::as_str), ["arm64", "x64"]);
    }
}
