//! Client configuration.

use std::time::Duration;

/// Flickr's REST endpoint.
pub const REST_ENDPOINT: &str = "https://api.flickr.com/services/rest/";

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default read timeout. Bulk operations can take minutes to answer.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(600);

/// Tunables for [`FlickrClient`](crate::FlickrClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    /// Turn non-success envelopes into [`FlickrError::Service`](crate::FlickrError::Service).
    pub raise_on_service_error: bool,
    /// Send parameters, URLs and raw responses to the request logger.
    pub verbose_logging: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: REST_ENDPOINT.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            raise_on_service_error: true,
            verbose_logging: false,
        }
    }
}
