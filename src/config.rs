//! Project configuration loaded from `tapcast.toml`.
//!
//! The file names the GitHub repository and the app being published, and
//! optionally tunes cask metadata, appcast attributes, and HTTP behaviour.
//! Secrets never live here; the publisher reads tokens and signing keys from
//! the command line or the environment.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Default configuration file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tapcast.toml";

/// Minimum macOS version advertised when the appcast table omits it.
pub const DEFAULT_MINIMUM_SYSTEM_VERSION: &str = "13.0";

/// Errors raised while loading or validating project configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        /// The file that was requested.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse configuration {path}: {source}")]
    Parse {
        /// The file that was parsed.
        path: Utf8PathBuf,
        /// Parser diagnostic.
        source: Box<toml::de::Error>,
    },

    /// The repository is not in `owner/name` form.
    #[error("repository \"{value}\" must be in owner/name form")]
    InvalidRepo {
        /// The rejected value.
        value: String,
    },

    /// The app name is blank.
    #[error("app_name must not be empty")]
    EmptyAppName,
}

/// Result alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level contents of `tapcast.toml`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// GitHub repository in `owner/name` form.
    pub repo: String,
    /// Display name of the app, as used in asset names and `.app` bundles.
    pub app_name: String,
    /// Homebrew cask settings.
    #[serde(default)]
    pub cask: CaskConfig,
    /// Sparkle appcast settings.
    #[serde(default)]
    pub appcast: AppcastConfig,
    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,
}

/// Settings for the generated Homebrew casks.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CaskConfig {
    /// Cask token; derived from the app name when absent.
    pub token: Option<String>,
    /// Cask `desc` stanza; the app name when absent.
    pub description: Option<String>,
    /// macOS bundle identifier, used for `zap` paths.
    pub bundle_id: Option<String>,
}

/// Settings for the generated Sparkle appcasts.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppcastConfig {
    /// `sparkle:minimumSystemVersion` for every item.
    pub minimum_system_version: Option<String>,
    /// `sparkle:fullReleaseNotesLink` for every item.
    pub release_notes_url: Option<String>,
}

/// HTTP client settings shared by the release listing and downloads.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Timeout for release listing requests, in seconds.
    pub api_timeout_secs: u64,
    /// Timeout for artefact downloads, in seconds.
    pub download_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "tapcast".to_owned(),
            api_timeout_secs: 30,
            download_timeout_secs: 60,
        }
    }
}

impl HttpConfig {
    /// Timeout for release listing requests.
    #[must_use]
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    /// Timeout for artefact downloads.
    #[must_use]
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

impl ProjectConfig {
    /// Load and validate configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read,
    /// [`ConfigError::Parse`] for malformed TOML or unknown keys, and a
    /// validation error for a bad repository or app name.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config: Self = toml::from_str(&source).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source: Box::new(source),
        })?;
        config.validate()
    }

    /// Parse and validate configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// As for [`Self::load`], minus the read failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use tapcast::ProjectConfig;
    ///
    /// let config = ProjectConfig::from_toml_str(
    ///     "repo = \"apotenza92/dockter\"\napp_name = \"Dockter\"\n",
    /// )
    /// .expect("valid configuration");
    /// assert_eq!(config.cask_token(), "dockter");
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: Utf8PathBuf::from("<inline>"),
            source: Box::new(source),
        })?;
        config.validate()
    }

    /// Replace the repository, as requested on the command line.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRepo`] when `repo` is not `owner/name`.
    pub fn with_repo_override(mut self, repo: Option<String>) -> Result<Self> {
        if let Some(repo) = repo {
            self.repo = repo;
        }
        self.validate()
    }

    fn validate(mut self) -> Result<Self> {
        self.repo = self.repo.trim().to_owned();
        if !is_owner_name(&self.repo) {
            return Err(ConfigError::InvalidRepo {
                value: self.repo,
            });
        }
        self.app_name = self.app_name.trim().to_owned();
        if self.app_name.is_empty() {
            return Err(ConfigError::EmptyAppName);
        }
        Ok(self)
    }

    /// Cask token: the configured one, or the app name lowercased with
    /// spaces replaced by hyphens.
    #[must_use]
    pub fn cask_token(&self) -> String {
        match non_blank(self.cask.token.as_deref()) {
            Some(token) => token.to_owned(),
            None => self.app_name.to_lowercase().replace(' ', "-"),
        }
    }

    /// Cask description, defaulting to the app name.
    #[must_use]
    pub fn cask_description(&self) -> &str {
        non_blank(self.cask.description.as_deref()).unwrap_or(&self.app_name)
    }

    /// Bundle identifier, if configured.
    #[must_use]
    pub fn bundle_id(&self) -> Option<&str> {
        non_blank(self.cask.bundle_id.as_deref())
    }

    /// Minimum macOS version advertised in appcasts.
    #[must_use]
    pub fn minimum_system_version(&self) -> &str {
        non_blank(self.appcast.minimum_system_version.as_deref())
            .unwrap_or(DEFAULT_MINIMUM_SYSTEM_VERSION)
    }

    /// Full release notes link advertised in appcasts.
    #[must_use]
    pub fn release_notes_url(&self) -> String {
        match non_blank(self.appcast.release_notes_url.as_deref()) {
            Some(url) => url.to_owned(),
            None => format!("https://github.com/{}/blob/main/CHANGELOG.md", self.repo),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn is_owner_name(repo: &str) -> bool {
    let is_part = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    };
    match repo.split_once('/') {
        Some((owner, name)) => is_part(owner) && is_part(name),
        None => false,
    }
}
