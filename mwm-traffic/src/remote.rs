//! Remote traffic service interface.
//!
//! The HTTP transport itself lives outside this crate; consumers inject a
//! [`RemoteBlobSource`]. This module only builds blob URLs and defines the
//! shapes the overlay layer interprets.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use thiserror::Error;

/// File extension of the values blob; the keys blob appends `.keys` to it.
const TRAFFIC_FILE_EXTENSION: &str = ".traffic";

/// External configuration for the remote traffic service.
///
/// Injected into the overlay rather than read from process-wide state.
#[derive(Clone, Debug)]
pub struct RemoteContext {
    /// Base URL of the traffic service, with a trailing slash.
    /// An empty base disables remote fetching entirely.
    pub base_url: String,
    /// The newest map data version this client understands. Used to tell
    /// "the tile is stale" apart from "the app is stale".
    pub current_data_version: u64,
}

/// A transport-level failure reported by the injected blob source.
///
/// HTTP error statuses are not transport failures; they come back in the
/// [`RemoteResponse`].
#[derive(Debug, Error)]
#[error("network transport error: {0}")]
pub struct NetworkError(pub String);

/// Response to a blob fetch.
///
/// The body is carried for non-200 statuses too: a 404 body holds the
/// server's latest data version for the tile, which the overlay turns into
/// an availability hint.
#[derive(Clone, Debug)]
pub struct RemoteResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Synchronous transport for remote blobs.
///
/// Implementations may block; cancellation is the caller's concern and must
/// happen before the overlay is asked to reconcile.
pub trait RemoteBlobSource {
    /// Performs a GET of `url`.
    ///
    /// # Errors
    ///
    /// Only transport failures (connection, TLS, timeouts) are errors.
    fn fetch(&self, url: &str) -> Result<RemoteResponse, NetworkError>;
}

/// URL of the values blob for tile `name` at `version`, or `None` when
/// remote fetching is disabled.
#[must_use]
pub fn traffic_values_url(context: &RemoteContext, name: &str, version: u64) -> Option<String> {
    if context.base_url.is_empty() {
        return None;
    }
    let encoded = utf8_percent_encode(name, NON_ALPHANUMERIC);
    if version != 0 {
        Some(format!(
            "{}{}/{}{}",
            context.base_url, version, encoded, TRAFFIC_FILE_EXTENSION
        ))
    } else {
        Some(format!("{}{}{}", context.base_url, encoded, TRAFFIC_FILE_EXTENSION))
    }
}

/// URL of the keys blob for tile `name` at `version`, or `None` when remote
/// fetching is disabled.
#[must_use]
pub fn traffic_keys_url(context: &RemoteContext, name: &str, version: u64) -> Option<String> {
    traffic_values_url(context, name, version).map(|url| url + ".keys")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(base_url: &str) -> RemoteContext {
        RemoteContext {
            base_url: base_url.to_string(),
            current_data_version: 0,
        }
    }

    #[test]
    fn test_url_building() {
        let context = context("https://traffic.example.com/");
        assert_eq!(
            traffic_values_url(&context, "North Holland", 170131).as_deref(),
            Some("https://traffic.example.com/170131/North%20Holland.traffic")
        );
        assert_eq!(
            traffic_keys_url(&context, "North Holland", 170131).as_deref(),
            Some("https://traffic.example.com/170131/North%20Holland.traffic.keys")
        );
    }

    #[test]
    fn test_zero_version_omits_the_path_segment() {
        let context = context("https://traffic.example.com/");
        assert_eq!(
            traffic_values_url(&context, "Andorra", 0).as_deref(),
            Some("https://traffic.example.com/Andorra.traffic")
        );
    }

    #[test]
    fn test_empty_base_disables_fetching() {
        assert_eq!(traffic_values_url(&context(""), "Andorra", 1), None);
    }
}
