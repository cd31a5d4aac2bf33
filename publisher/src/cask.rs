//! Homebrew cask rendering.
//!
//! The stable cask installs `<App>.app`; the beta cask (`<token>@beta`)
//! installs `<App> Beta.app` alongside it. Download URLs interpolate the
//! cask's own `version`, so only the `version` line changes between
//! releases unless checksums are pinned.

use tapcast_common::{Channel, Sha256Digest};

use crate::naming::{Arch, AssetName, app_display_name};

/// Ruby interpolation of the cask version.
const VERSION_INTERPOLATION: &str = "#{version}";

/// Pinned archive checksums for both architectures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchChecksums {
    /// Apple silicon archive digest.
    pub arm64: Sha256Digest,
    /// Intel archive digest.
    pub x64: Sha256Digest,
}

/// Everything needed to render one cask.
#[derive(Debug, Clone, Copy)]
pub struct CaskEntry<'a> {
    /// Stable cask token, e.g. `dockter`.
    pub token: &'a str,
    /// App display name, e.g. `Dockter`.
    pub app_name: &'a str,
    /// Stable cask description.
    pub description: &'a str,
    /// GitHub repository in `owner/name` form.
    pub repo: &'a str,
    /// macOS bundle identifier, if known.
    pub bundle_id: Option<&'a str>,
    /// Channel the cask serves.
    pub channel: Channel,
    /// Short version, e.g. `1.2.0` or `1.3.0-beta.1`.
    pub version: &'a str,
    /// Pinned checksums; `sha256 :no_check` when absent.
    pub checksums: Option<&'a ArchChecksums>,
}

/// Token of the cask serving `channel`.
///
/// # Examples
///
/// ```
/// use tapcast_common::Channel;
/// use tapcast_publisher::cask::cask_token;
///
/// assert_eq!(cask_token("dockter", Channel::Stable), "dockter");
/// assert_eq!(cask_token("dockter", Channel::Beta), "dockter@beta");
/// ```
#[must_use]
pub fn cask_token(token: &str, channel: Channel) -> String {
    match channel {
        Channel::Stable => token.to_owned(),
        Channel::Beta => format!("{token}@{channel}"),
    }
}

/// File name of the cask serving `channel`, relative to `Casks/`.
#[must_use]
pub fn cask_file_name(token: &str, channel: Channel) -> String {
    format!("{}.rb", cask_token(token, channel))
}

/// Render the cask Ruby source for `entry`.
#[must_use]
pub fn render_cask(entry: &CaskEntry<'_>) -> String {
    let display_name = app_display_name(entry.app_name, entry.channel);
    let description = match entry.channel {
        Channel::Stable => entry.description.to_owned(),
        Channel::Beta => format!("Beta channel for {}", entry.app_name),
    };

    let mut cask = format!(
        "cask \"{}\" do\n  version \"{}\"\n{}\n",
        cask_token(entry.token, entry.channel),
        entry.version,
        sha256_stanza(entry.checksums),
    );
    for (block, arch) in [("on_arm", Arch::Arm64), ("on_intel", Arch::X64)] {
        cask.push_str(&format!(
            "  {block} do\n    url \"{}\"\n  end\n\n",
            download_url(entry, arch)
        ));
    }
    cask.push_str(&format!(
        concat!(
            "  name \"{name}\"\n",
            "  desc \"{desc}\"\n",
            "  homepage \"https://github.com/{repo}\"\n",
            "\n",
            "{livecheck}",
            "\n",
            "  app \"{name}.app\"\n",
            "\n",
            "{zap}",
            "end\n",
        ),
        name = ruby_escape(&display_name),
        desc = ruby_escape(&description),
        repo = entry.repo,
        livecheck = livecheck_stanza(entry),
        zap = zap_stanza(&display_name, entry),
    ));
    cask
}

fn sha256_stanza(checksums: Option<&ArchChecksums>) -> String {
    match checksums {
        Some(sums) => format!(
            "  sha256 arm:   \"{}\",\n         intel: \"{}\"\n",
            sums.arm64, sums.x64
        ),
        None => "  sha256 :no_check\n".to_owned(),
    }
}

fn download_url(entry: &CaskEntry<'_>, arch: Arch) -> String {
    let asset = AssetName::new(entry.app_name, entry.channel, VERSION_INTERPOLATION, arch);
    format!(
        "https://github.com/{}/releases/download/v{VERSION_INTERPOLATION}/{asset}",
        entry.repo
    )
}

fn livecheck_stanza(entry: &CaskEntry<'_>) -> String {
    match entry.channel {
        Channel::Stable => {
            "  livecheck do\n    url :url\n    strategy :github_latest\n  end\n".to_owned()
        }
        Channel::Beta => format!(
            concat!(
                "  livecheck do\n",
                "    url \"https://api.github.com/repos/{repo}/releases\"\n",
                "    strategy :json do |json|\n",
                "      json\n",
                "        .reject {{ |release| release[\"draft\"] }}\n",
                "        .map {{ |release| release[\"tag_name\"] }}\n",
                "    end\n",
                "  end\n",
            ),
            repo = entry.repo
        ),
    }
}

fn zap_stanza(display_name: &str, entry: &CaskEntry<'_>) -> String {
    let mut paths = vec![format!("~/Library/Application Support/{display_name}")];
    if let Some(bundle_id) = entry.bundle_id {
        let bundle = match entry.channel {
            Channel::Stable => bundle_id.to_owned(),
            Channel::Beta => format!("{bundle_id}.{}", Channel::Beta),
        };
        paths.push(format!("~/Library/Caches/{bundle}"));
        paths.push(format!("~/Library/Preferences/{bundle}.plist"));
        paths.push(format!("~/Library/Saved Application State/{bundle}.savedState"));
    }

    let entries: String = paths
        .iter()
        .map(|path| format!("    \"{}\",\n", ruby_escape(path)))
        .collect();
    format!("  zap trash: [\n{entries}  ]\n")
}

/// Escape a value for a double-quoted Ruby string literal.
fn ruby_escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("#{", "\\#{")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    const REPO: &str = "apotenza92/dockter";

    #[fixture]
    fn stable() -> CaskEntry<'static> {
        CaskEntry {
            token: "dockter",
            app_name: "Dockter",
            description: "Dock management for macOS",
            repo: REPO,
            bundle_id: Some("pzc.Dockter"),
            channel: Channel::Stable,
            version: "1.2.0",
            checksums: None,
        }
    }

    #[rstest]
    fn renders_stable_cask(stable: CaskEntry<'static>) {
        let expected = concat!(
            "cask \"dockter\" do\n",
            "  version \"1.2.0\"\n",
            "  sha256 :no_check\n",
            "\n",
            "  on_arm do\n",
            "    url \"https://github.com/apotenza92/dockter/releases/download/v#{version}/Dockter-v#{version}-macos-arm64.zip\"\n",
            "  end\n",
            "\n",
            "  on_intel do\n",
            "    url \"https://github.com/apotenza92/dockter/releases/download/v#{version}/Dockter-v#{version}-macos-x64.zip\"\n",
            "  end\n",
            "\n",
            "  name \"Dockter\"\n",
            "  desc \"Dock management for macOS\"\n",
            "  homepage \"https://github.com/apotenza92/dockter\"\n",
            "\n",
            "  livecheck do\n",
            "    url :url\n",
            "    strategy :github_latest\n",
            "  end\n",
            "\n",
            "  app \"Dockter.app\"\n",
            "\n",
            "  zap trash: [\n",
            "    \"~/Library/Application Support/Dockter\",\n",
            "    \"~/Library/Caches/pzc.Dockter\",\n",
            "    \"~/Library/Preferences/pzc.Dockter.plist\",\n",
            "    \"~/Library/Saved Application State/pzc.Dockter.savedState\",\n",
            "  ]\n",
            "end\n",
        );
        assert_eq!(render_cask(&stable), expected);
    }

    #[rstest]
    fn renders_beta_cask(stable: CaskEntry<'static>) {
        let beta = CaskEntry {
            channel: Channel::Beta,
            version: "1.3.0-beta.1",
            ..stable
        };
        let cask = render_cask(&beta);

        assert!(cask.starts_with("cask \"dockter@beta\" do\n  version \"1.3.0-beta.1\"\n"));
        assert!(cask.contains("/Dockter-Beta-v#{version}-macos-arm64.zip\""));
        assert!(cask.contains("/Dockter-Beta-v#{version}-macos-x64.zip\""));
        assert!(cask.contains("  name \"Dockter Beta\"\n"));
        assert!(cask.contains("  desc \"Beta channel for Dockter\"\n"));
        assert!(cask.contains("    url \"https://api.github.com/repos/apotenza92/dockter/releases\"\n"));
        assert!(cask.contains("        .reject { |release| release[\"draft\"] }\n"));
        assert!(cask.contains("  app \"Dockter Beta.app\"\n"));
        assert!(cask.contains("\"~/Library/Application Support/Dockter Beta\""));
        assert!(cask.contains("\"~/Library/Caches/pzc.Dockter.beta\""));
        assert!(cask.contains("\"~/Library/Preferences/pzc.Dockter.beta.plist\""));
        assert!(cask.contains("\"~/Library/Saved Application State/pzc.Dockter.beta.savedState\""));
    }

    #[rstest]
    fn zap_without_bundle_id_only_removes_support_directory(stable: CaskEntry<'static>) {
        let entry = CaskEntry {
            bundle_id: None,
            ..stable
        };
        let cask = render_cask(&entry);
        assert!(cask.contains("  zap trash: [\n    \"~/Library/Application Support/Dockter\",\n  ]\n"));
        assert!(!cask.contains("Caches"));
    }

    #[rstest]
    fn pinned_checksums_replace_no_check(stable: CaskEntry<'static>) {
        let checksums = ArchChecksums {
            arm64: Sha256Digest::of(b"arm"),
            x64: Sha256Digest::of(b"intel"),
        };
        let entry = CaskEntry {
            checksums: Some(&checksums),
            ..stable
        };
        let cask = render_cask(&entry);

        assert!(!cask.contains(":no_check"));
        assert!(cask.contains(&format!(
            "  sha256 arm:   \"{}\",\n         intel: \"{}\"\n",
            checksums.arm64, checksums.x64
        )));
    }

    #[test]
    fn file_names_follow_tokens() {
        assert_eq!(cask_file_name("dockter", Channel::Stable), "dockter.rb");
        assert_eq!(cask_file_name("dockter", Channel::Beta), "dockter@beta.rb");
    }

    #[test]
    fn ruby_strings_are_escaped() {
        assert_eq!(ruby_escape(r#"Say "hi" #{x}"#), r#"Say \"hi\" \#{x}"#);
    }
}
