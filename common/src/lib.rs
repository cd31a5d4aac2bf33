//! Release channel resolution and artefact signing for tapcast.
//!
//! This crate holds the logic with real invariants: it parses and orders
//! release tags, decides which release each update channel advertises,
//! looks up the assets a release carries, signs them for Sparkle feeds, and
//! extracts release notes from a changelog. It performs no file I/O and no
//! network access of its own; payloads arrive through [`PayloadFetcher`].
//!
//! # Modules
//!
//! - [`version`] - Tag parsing and total ordering
//! - [`digest`] - SHA-256 digest newtype
//! - [`release`] - Release and asset records
//! - [`channel`] - Stable and beta channel resolution
//! - [`artifact`] - Exact-name asset lookup
//! - [`signing`] - Ed25519 signing with a run-scoped cache
//! - [`changelog`] - Release notes extraction
//! - [`error`] - Error types

pub mod artifact;
pub mod changelog;
pub mod channel;
pub mod digest;
pub mod error;
pub mod release;
pub mod signing;
pub mod version;

pub use artifact::find_asset;
pub use changelog::{PLACEHOLDER_NOTES, notes_for};
pub use channel::{Channel, ChannelSelection};
pub use digest::Sha256Digest;
pub use error::{
    ArtifactError, ChangelogError, FetchError, KeyError, SigningError, VersionError,
};
pub use release::{Asset, Release, ReleaseRecord, ReleaseSet};
#[cfg(any(test, feature = "test-support"))]
pub use signing::MockPayloadFetcher;
pub use signing::{ArtifactCache, PayloadFetcher, Signer, SigningKey, digest_for};
pub use version::{ParsedVersion, VersionKey};
