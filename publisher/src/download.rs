//! Artefact payload downloads for signing and checksum pinning.

use log::debug;
use tapcast::HttpConfig;
use tapcast_common::{FetchError, PayloadFetcher};

/// Media type requested for release assets.
const OCTET_STREAM: &str = "application/octet-stream";

/// HTTP-based fetcher using `ureq`.
///
/// Bodies are streamed into memory without ureq's default size cap, since
/// app archives routinely exceed it.
pub struct HttpFetcher {
    agent: ureq::Agent,
    user_agent: String,
}

impl HttpFetcher {
    /// Create a fetcher using the download timeout and user agent from
    /// `http`.
    #[must_use]
    pub fn new(http: &HttpConfig) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(http.download_timeout()))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            user_agent: http.user_agent.clone(),
        }
    }
}

impl PayloadFetcher for HttpFetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .agent
            .get(location)
            .header("Accept", OCTET_STREAM)
            .header("User-Agent", self.user_agent.as_str())
            .call()
            .map_err(|e| map_ureq_error(location, &e))?;

        let mut payload = Vec::new();
        std::io::copy(&mut response.into_body().as_reader(), &mut payload)?;
        debug!("downloaded {} bytes from {location}", payload.len());
        Ok(payload)
    }
}

/// Map a ureq error to a [`FetchError`].
fn map_ureq_error(location: &str, err: &ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(404) => FetchError::NotFound {
            location: location.to_owned(),
        },
        other => FetchError::Transport {
            location: location.to_owned(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const LOCATION: &str = "https://example.test/Dockter-v1.0.0-macos-arm64.zip";

    #[test]
    fn map_ureq_error_maps_404_to_not_found() {
        let mapped = map_ureq_error(LOCATION, &ureq::Error::StatusCode(404));
        assert!(matches!(mapped, FetchError::NotFound { location } if location == LOCATION));
    }

    #[rstest]
    #[case::forbidden(ureq::Error::StatusCode(403))]
    #[case::server_error(ureq::Error::StatusCode(502))]
    fn map_ureq_error_maps_other_failures_to_transport(#[case] err: ureq::Error) {
        let mapped = map_ureq_error(LOCATION, &err);
        assert!(matches!(mapped, FetchError::Transport { .. }));
        assert!(mapped.to_string().contains(LOCATION));
    }

    #[test]
    fn fetcher_keeps_configured_user_agent() {
        let fetcher = HttpFetcher::new(&HttpConfig::default());
        assert_eq!(fetcher.user_agent, "tapcast");
    }
}
