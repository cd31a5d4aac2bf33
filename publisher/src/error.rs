//! Error types for the tapcast publisher.
//!
//! Every fatal condition of a run surfaces as a [`PublisherError`]. Core
//! errors convert with `?`; file errors carry the path involved.

use camino::Utf8PathBuf;
use tapcast::ConfigError;
use tapcast_common::{ArtifactError, ChangelogError, KeyError, SigningError};
use thiserror::Error;

use crate::github::ListingError;

/// Errors that abort a publishing run.
#[derive(Debug, Error)]
pub enum PublisherError {
    /// The project configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The Sparkle private key is malformed.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Signatures were required but no private key was supplied.
    #[error(
        "missing Sparkle private key; set SPARKLE_PRIVATE_ED_KEY or pass --sparkle-private-key"
    )]
    SigningKeyRequired,

    /// The release listing could not be fetched or decoded.
    #[error(transparent)]
    Listing(#[from] ListingError),

    /// A release lacks an expected asset.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// The changelog has no section for a release.
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// The changelog file could not be read.
    #[error("failed to read changelog {path}: {source}")]
    ChangelogRead {
        /// The changelog path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An artefact could not be downloaded, hashed, or signed.
    #[error(transparent)]
    Signing(#[from] SigningError),

    /// A generated file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The file being written.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Writing command output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`PublisherError`].
pub type Result<T> = std::result::Result<T, PublisherError>;
