//! SHA-256 digest newtype for release assets.
//!
//! Release hosts may publish a digest alongside each asset, either as
//! `sha256:<hex>` or as bare hex. Anything else is treated as "no digest
//! available", and the digest has to be computed from the downloaded bytes.

use sha2::{Digest, Sha256};
use std::fmt;

/// Expected length of a hex-encoded SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// Digest scheme name used by release hosts.
const SCHEME: &str = "sha256";

/// A validated, lowercase, hex-encoded SHA-256 digest.
///
/// # Examples
///
/// ```
/// use tapcast_common::digest::Sha256Digest;
///
/// let digest = Sha256Digest::of(b"hello");
/// assert_eq!(digest.as_str().len(), 64);
/// assert_eq!(Sha256Digest::parse_host(&format!("sha256:{digest}")), Some(digest));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Compute the digest of `bytes`.
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        // sha2 always renders 64 lowercase hex characters.
        Self(format!("{:x}", Sha256::digest(bytes)))
    }

    /// Interpret a digest string supplied by the release host.
    ///
    /// Accepts `sha256:<hex>` or bare hex in either case; returns `None` for
    /// any other scheme or malformed value.
    #[must_use]
    pub fn parse_host(value: &str) -> Option<Self> {
        let value = value.trim();
        let hex = match value.split_once(':') {
            Some((scheme, hex)) if scheme.eq_ignore_ascii_case(SCHEME) => hex,
            Some(_) => return None,
            None => value,
        };
        if hex.len() != DIGEST_HEX_LEN || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(hex.to_ascii_lowercase()))
    }

    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Sha256Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    #[test]
    fn computes_known_digest() {
        assert_eq!(Sha256Digest::of(b"hello").as_str(), HELLO_SHA256);
    }

    #[rstest]
    #[case::prefixed(format!("sha256:{HELLO_SHA256}"))]
    #[case::bare(HELLO_SHA256.to_owned())]
    #[case::uppercase(HELLO_SHA256.to_ascii_uppercase())]
    #[case::uppercase_scheme(format!("SHA256:{HELLO_SHA256}"))]
    #[case::padded(format!("  sha256:{HELLO_SHA256}\n"))]
    fn accepts_host_forms(#[case] value: String) {
        let digest = Sha256Digest::parse_host(&value).expect("digest should parse");
        assert_eq!(digest.as_str(), HELLO_SHA256);
    }

    #[rstest]
    #[case::other_scheme(format!("sha512:{HELLO_SHA256}"))]
    #[case::too_short("abcdef".to_owned())]
    #[case::too_long(format!("{HELLO_SHA256}0"))]
    #[case::non_hex("g".repeat(64))]
    #[case::empty(String::new())]
    #[case::scheme_only("sha256:".to_owned())]
    fn rejects_unusable_forms(#[case] value: String) {
        assert!(Sha256Digest::parse_host(&value).is_none());
    }

    #[test]
    fn display_shows_full_digest() {
        let digest = Sha256Digest::of(b"hello");
        assert_eq!(format!("{digest}"), HELLO_SHA256);
    }
}
