//! Error type for the Flickr client.
//!
//! Every pipeline failure surfaces synchronously as a [`FlickrError`]. Nothing
//! is retried internally; callers decide what to do with a transport failure.

use thiserror::Error;

use crate::response::Envelope;

/// Errors returned by the client pipeline and endpoint methods.
#[derive(Error, Debug)]
pub enum FlickrError {
    /// A required credential (API key or secret) is missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An authenticated call was attempted without an access token.
    #[error("authentication error: {0}")]
    Authentication(String),

    /// Network failure, timeout, empty response body, or a request that
    /// could not be constructed.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The response body is not valid JSON for the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Flickr answered with a non-success status. Only raised while the
    /// client's raise-on-error policy is enabled.
    #[error("Flickr returned error {code}: {message}")]
    Service {
        code: i32,
        message: String,
        envelope: Envelope,
    },

    /// The caller passed an unsupported method or an out-of-range argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, FlickrError>;

impl FlickrError {
    pub(crate) fn transport(message: impl Into<String>) -> Self {
        FlickrError::Transport {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn transport_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FlickrError::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub(crate) fn service(envelope: Envelope) -> Self {
        FlickrError::Service {
            code: envelope.code,
            message: envelope.message.clone().unwrap_or_default(),
            envelope,
        }
    }

    pub fn is_service_error(&self) -> bool {
        matches!(self, FlickrError::Service { .. })
    }

    /// The Flickr error code, if this is a service error.
    pub fn service_code(&self) -> Option<i32> {
        match self {
            FlickrError::Service { code, .. } => Some(*code),
            _ => None,
        }
    }
}
