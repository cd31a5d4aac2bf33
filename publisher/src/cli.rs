//! CLI argument definitions for the `tapcast` binary.
//!
//! Kept apart from the entrypoint so parsing can be tested without running
//! any command.

use camino::Utf8PathBuf;
use clap::{ArgAction, Args, Parser, Subcommand};
use log::LevelFilter;
use tapcast::DEFAULT_CONFIG_FILE;

/// Default changelog location, relative to the working directory.
pub const DEFAULT_CHANGELOG: &str = "CHANGELOG.md";

/// Default appcast output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "appcasts";

/// Publish macOS app releases to a Homebrew tap and Sparkle appcasts.
#[derive(Parser, Debug)]
#[command(name = "tapcast")]
#[command(version, about)]
#[command(long_about = concat!(
    "Publish macOS app releases to a Homebrew tap and Sparkle appcasts.\n\n",
    "Releases are read from GitHub. The newest stable release feeds the stable ",
    "channel; the beta channel advertises whichever is newer of the latest ",
    "prerelease and the latest stable release.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Regenerate the four appcasts into docs/appcasts:\n",
    "    $ tapcast appcast --output-dir docs/appcasts --require-signatures\n\n",
    "  Update the casks in a tap checkout, pinning checksums:\n",
    "    $ tapcast cask --tap-path ../homebrew-tap --pin-checksums\n\n",
    "  Print the release notes for a tag:\n",
    "    $ tapcast notes --tag v1.2.0",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Only report errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Log filter requested by `--quiet` and `--verbose`.
    ///
    /// `RUST_LOG` still overrides this when the logger is initialised.
    #[must_use]
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Regenerate the stable and beta Sparkle appcasts.
    Appcast(AppcastArgs),

    /// Regenerate the stable and beta Homebrew casks in a tap checkout.
    Cask(CaskArgs),

    /// Print the changelog section for a release tag.
    Notes(NotesArgs),
}

/// Settings shared by commands that read the release listing.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project configuration file.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: Utf8PathBuf,

    /// Repository to publish, overriding the configuration file.
    #[arg(long, value_name = "OWNER/NAME")]
    pub repo: Option<String>,

    /// Token for the GitHub API; raises rate limits and reaches private repos.
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,
}

/// Arguments for the appcast command.
#[derive(Args, Debug, Clone)]
pub struct AppcastArgs {
    /// Configuration and listing settings.
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Directory receiving the feed files.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: Utf8PathBuf,

    /// Changelog holding the release notes.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CHANGELOG)]
    pub changelog: Utf8PathBuf,

    /// Base64 Ed25519 private key used to sign enclosures.
    #[arg(
        long,
        value_name = "KEY",
        env = "SPARKLE_PRIVATE_ED_KEY",
        hide_env_values = true
    )]
    pub sparkle_private_key: Option<String>,

    /// Fail instead of publishing unsigned feeds when no key is supplied.
    #[arg(long)]
    pub require_signatures: bool,
}

/// Arguments for the cask command.
#[derive(Args, Debug, Clone)]
pub struct CaskArgs {
    /// Configuration and listing settings.
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Root of the Homebrew tap checkout.
    #[arg(long, value_name = "DIR")]
    pub tap_path: Utf8PathBuf,

    /// Pin per-architecture SHA-256 checksums instead of `:no_check`.
    #[arg(long)]
    pub pin_checksums: bool,
}

/// Arguments for the notes command.
#[derive(Args, Debug, Clone)]
pub struct NotesArgs {
    /// Release tag whose section to print, e.g. `v1.2.0`.
    #[arg(long, value_name = "TAG")]
    pub tag: String,

    /// Changelog holding the release notes.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CHANGELOG)]
    pub changelog: Utf8PathBuf,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
