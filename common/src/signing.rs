//! Ed25519 signing of release artefacts for Sparkle update feeds.
//!
//! Signing needs the raw artefact bytes, so every signature costs one
//! download. [`ArtifactCache`] remembers signatures and computed digests by
//! download location for the lifetime of a run, so an artefact advertised by
//! both channels is fetched once.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use ed25519_dalek::Signer as _;
use log::{debug, info};
use std::collections::HashMap;
use std::fmt;

use crate::digest::Sha256Digest;
use crate::error::{FetchError, KeyError, SigningError};
use crate::release::Asset;

/// Length of an Ed25519 seed.
const SEED_LEN: usize = 32;

/// Length of a seed followed by its public key.
const KEYPAIR_LEN: usize = 64;

/// Source of artefact bytes.
///
/// The publisher implements this over HTTP; tests substitute a mock.
#[cfg_attr(any(test, feature = "test-support"), mockall::automock)]
pub trait PayloadFetcher {
    /// Fetch the full payload stored at `location`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the payload cannot be retrieved.
    fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError>;
}

/// Private key used to sign update-feed enclosures.
pub struct SigningKey {
    inner: ed25519_dalek::SigningKey,
}

impl SigningKey {
    /// Decode a base64 secret as exported by Sparkle's key tooling.
    ///
    /// A blank secret means signing is not configured and yields `Ok(None)`.
    /// Both the 32-byte seed and the 64-byte seed-plus-public-key forms are
    /// accepted; only the seed is used.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidEncoding`] for malformed base64 and
    /// [`KeyError::UnsupportedLength`] for any other decoded length.
    ///
    /// # Examples
    ///
    /// ```
    /// use tapcast_common::signing::SigningKey;
    ///
    /// assert!(SigningKey::from_secret("   ").expect("blank is valid").is_none());
    /// let seed = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";
    /// assert!(SigningKey::from_secret(seed).expect("32-byte seed").is_some());
    /// ```
    pub fn from_secret(secret: &str) -> Result<Option<Self>, KeyError> {
        let compact: String = secret.split_whitespace().collect();
        if compact.is_empty() {
            return Ok(None);
        }

        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|err| KeyError::InvalidEncoding {
                reason: err.to_string(),
            })?;

        let seed_bytes = match bytes.len() {
            SEED_LEN | KEYPAIR_LEN => bytes.get(..SEED_LEN),
            len => return Err(KeyError::UnsupportedLength { len }),
        };
        let seed: [u8; SEED_LEN] = seed_bytes
            .and_then(|slice| slice.try_into().ok())
            .ok_or(KeyError::UnsupportedLength { len: bytes.len() })?;

        Ok(Some(Self {
            inner: ed25519_dalek::SigningKey::from_bytes(&seed),
        }))
    }

    /// Base64 encoding of the matching public key, as embedded in an app's
    /// `SUPublicEDKey`.
    #[must_use]
    pub fn public_key_base64(&self) -> String {
        STANDARD.encode(self.inner.verifying_key().as_bytes())
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("public_key", &self.public_key_base64())
            .finish_non_exhaustive()
    }
}

/// Signatures and digests computed during one run, keyed by download
/// location.
#[derive(Debug, Default)]
pub struct ArtifactCache {
    signatures: HashMap<String, String>,
    digests: HashMap<String, Sha256Digest>,
}

impl ArtifactCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached signature for `location`.
    #[must_use]
    pub fn signature(&self, location: &str) -> Option<&str> {
        self.signatures.get(location).map(String::as_str)
    }

    /// Cached computed digest for `location`.
    #[must_use]
    pub fn digest(&self, location: &str) -> Option<&Sha256Digest> {
        self.digests.get(location)
    }
}

/// Produces base64 Ed25519 signatures over artefact payloads.
#[derive(Debug)]
pub struct Signer {
    key: SigningKey,
}

impl Signer {
    /// Wrap a decoded key.
    #[must_use]
    pub fn new(key: SigningKey) -> Self {
        Self { key }
    }

    /// Public key for the configured private key.
    #[must_use]
    pub fn public_key_base64(&self) -> String {
        self.key.public_key_base64()
    }

    /// Sign `asset`, fetching its bytes unless `cache` already holds a
    /// signature for its download location.
    ///
    /// Fetched bytes are checked against the host-published digest when the
    /// asset carries one.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::Fetch`] when the download fails and
    /// [`SigningError::DigestMismatch`] when the bytes disagree with the
    /// published digest.
    pub fn signature_for(
        &self,
        asset: &Asset,
        fetcher: &dyn PayloadFetcher,
        cache: &mut ArtifactCache,
    ) -> Result<String, SigningError> {
        let location = asset.download_location();
        if let Some(signature) = cache.signature(location) {
            debug!("reusing signature for {location}");
            return Ok(signature.to_owned());
        }

        info!("downloading {} for signing", asset.name());
        let payload = fetcher.fetch(location)?;
        let actual = Sha256Digest::of(&payload);
        verify_host_digest(asset, &actual)?;

        let signature = STANDARD.encode(self.key.inner.sign(&payload).to_bytes());
        cache.digests.insert(location.to_owned(), actual);
        cache
            .signatures
            .insert(location.to_owned(), signature.clone());
        Ok(signature)
    }
}

/// SHA-256 digest of `asset`'s payload.
///
/// Prefers the host-published digest, then a digest computed earlier in the
/// run, and only then downloads the payload.
///
/// # Errors
///
/// Returns [`SigningError::Fetch`] when a download is needed and fails.
pub fn digest_for(
    asset: &Asset,
    fetcher: &dyn PayloadFetcher,
    cache: &mut ArtifactCache,
) -> Result<Sha256Digest, SigningError> {
    if let Some(digest) = asset.digest() {
        return Ok(digest.clone());
    }

    let location = asset.download_location();
    if let Some(digest) = cache.digest(location) {
        debug!("reusing digest for {location}");
        return Ok(digest.clone());
    }

    info!("downloading {} to compute its checksum", asset.name());
    let digest = Sha256Digest::of(&fetcher.fetch(location)?);
    cache.digests.insert(location.to_owned(), digest.clone());
    Ok(digest)
}

fn verify_host_digest(asset: &Asset, actual: &Sha256Digest) -> Result<(), SigningError> {
    match asset.digest() {
        Some(expected) if expected != actual => Err(SigningError::DigestMismatch {
            name: asset.name().to_owned(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }),
        _ => Ok(()),
    }
}
