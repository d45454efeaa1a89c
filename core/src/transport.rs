//! Blocking HTTP execution.
//!
//! # Design
//! The pipeline hands a fully built (and, if requested, signed)
//! [`HttpRequest`] to a [`Transport`] and gets an [`HttpResponse`] back. The
//! default [`UreqTransport`] does real network I/O; tests substitute a stub
//! to observe requests without touching the network.

use std::time::Duration;

use crate::config::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT};
use crate::error::{FlickrError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round trip.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// [`Transport`] backed by a blocking `ureq` agent.
///
/// HTTP status codes are returned as data rather than errors so the client
/// can still read Flickr's JSON error body on a non-2xx answer.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(connect_timeout: Duration, read_timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(connect_timeout))
            .timeout_recv_response(Some(read_timeout))
            .timeout_recv_body(Some(read_timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request)
    }
}

macro_rules! with_headers {
    ($builder:expr, $request:expr) => {{
        let mut builder = $builder;
        for (name, value) in &$request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }};
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let url = request.url.as_str();
        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, None) => with_headers!(self.agent.get(url), request).call(),
            (HttpMethod::Post, None) => with_headers!(self.agent.post(url), request).send_empty(),
            (method, _) => {
                return Err(FlickrError::InvalidArgument(format!(
                    "transport sends only body-less GET and POST, got {method}"
                )));
            }
        };

        let mut response = result.map_err(|e| {
            FlickrError::transport_with(format!("error while performing {} request", request.method), e)
        })?;

        let status = response.status().as_u16();
        // Bulk responses can exceed ureq's default 10 MiB body limit.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_string()
            .map_err(|e| FlickrError::transport_with("error reading response body", e))?;

        tracing::debug!(method = %request.method, status, bytes = body.len(), "received response");

        Ok(HttpResponse { status, body })
    }
}
