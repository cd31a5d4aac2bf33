//! Exact-name asset lookup within a release.
//!
//! Naming conventions belong to the caller; this module never guesses.

use crate::error::ArtifactError;
use crate::release::{Asset, Release};

/// Find the asset named exactly `expected_name` in `release`.
///
/// # Errors
///
/// Returns [`ArtifactError::NotFound`] when no asset carries that name.
///
/// # Examples
///
/// ```
/// use tapcast_common::artifact::find_asset;
/// use tapcast_common::release::{Asset, Release, ReleaseRecord};
///
/// let release = Release::from_record(ReleaseRecord {
///     tag: "v1.0.0".to_owned(),
///     assets: vec![Asset::new("app.zip", "https://example.test/app.zip", 3, None)],
///     ..ReleaseRecord::default()
/// })
/// .expect("release tag");
///
/// assert!(find_asset(&release, "app.zip").is_ok());
/// assert!(find_asset(&release, "App.zip").is_err());
/// ```
pub fn find_asset<'a>(release: &'a Release, expected_name: &str) -> Result<&'a Asset, ArtifactError> {
    release
        .assets()
        .iter()
        .find(|asset| asset.name() == expected_name)
        .ok_or_else(|| ArtifactError::NotFound {
            name: expected_name.to_owned(),
            tag: release.tag().to_owned(),
        })
}
