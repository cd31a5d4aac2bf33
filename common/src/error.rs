//! Error types for release resolution, changelog lookup, and signing.
//!
//! Each variant names the input that failed (tag, asset name, download
//! location) so the publisher can report it without extra context.

use thiserror::Error;

/// A tag that is not a release tag.
///
/// Callers normally drop such tags silently; the error form exists for
/// [`TryFrom`] conversions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// The tag matches neither `vX.Y.Z` nor `vX.Y.Z-<identifier>`.
    #[error("\"{tag}\" is not a release tag; expected vX.Y.Z or vX.Y.Z-<identifier>")]
    UnrecognisedTag {
        /// The rejected tag.
        tag: String,
    },
}

/// Errors arising from asset lookup within a release.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtifactError {
    /// No asset in the release carries the expected name.
    #[error("asset '{name}' not found in release {tag}")]
    NotFound {
        /// The asset name that was looked up.
        name: String,
        /// Tag of the release that was searched.
        tag: String,
    },
}

/// Errors arising from changelog extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangelogError {
    /// The changelog has no `## [<tag>]` heading.
    #[error("no changelog heading found for {tag}")]
    HeadingNotFound {
        /// The tag whose heading was missing.
        tag: String,
    },
}

/// Errors arising from decoding the update-feed signing key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The secret is not valid base64.
    #[error("signing key is not valid base64: {reason}")]
    InvalidEncoding {
        /// Decoder diagnostic.
        reason: String,
    },

    /// The decoded key has an unsupported length.
    #[error(
        "unsupported signing key length {len}; expected a base64-encoded 32-byte seed or 64-byte keypair"
    )]
    UnsupportedLength {
        /// Number of decoded bytes.
        len: usize,
    },
}

/// Errors arising from fetching an artefact payload.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request failed at the transport or HTTP level.
    #[error("download failed for {location}: {reason}")]
    Transport {
        /// The URL that was requested.
        location: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The host answered 404.
    #[error("artefact not found: {location}")]
    NotFound {
        /// The URL that returned 404.
        location: String,
    },

    /// Reading the response body failed.
    #[error("I/O error reading download: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors arising from signing or hashing an artefact.
#[derive(Debug, Error)]
pub enum SigningError {
    /// The payload could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The downloaded bytes do not match the digest published by the host.
    #[error("digest mismatch for {name}: host published {expected}, downloaded {actual}")]
    DigestMismatch {
        /// Asset name.
        name: String,
        /// Digest advertised by the release host.
        expected: String,
        /// Digest of the bytes actually downloaded.
        actual: String,
    },
}
