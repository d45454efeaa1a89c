//! Response envelope and JSON decoding.
//!
//! Every Flickr JSON response carries a `stat` discriminator and, on failure,
//! a numeric `code` and a `message`. Typed responses flatten an [`Envelope`]
//! so the status check works the same way for every endpoint.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{FlickrError, Result};

/// Status discriminator of a Flickr response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Ok,
    Fail,
}

/// The status part shared by all Flickr responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub stat: Stat,
    #[serde(default)]
    pub code: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope {
    pub fn ok() -> Self {
        Self {
            stat: Stat::Ok,
            code: 0,
            message: None,
        }
    }

    /// A response failed if Flickr set a non-zero code. `stat` alone does not
    /// decide it.
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Implemented by every type the pipeline can decode into.
pub trait ApiResponse: DeserializeOwned {
    fn envelope(&self) -> &Envelope;

    fn is_success(&self) -> bool {
        self.envelope().is_success()
    }
}

impl ApiResponse for Envelope {
    fn envelope(&self) -> &Envelope {
        self
    }
}

/// A response with no fixed shape: the envelope plus whatever other
/// top-level fields Flickr sent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenericResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl GenericResponse {
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }

    /// Convenience for string-valued fields. Flickr often wraps scalars as
    /// `{"_content": "..."}`; both forms are accepted.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.fields.get(key)? {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Object(map) => map.get("_content").and_then(|v| v.as_str()),
            _ => None,
        }
    }
}

impl ApiResponse for GenericResponse {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

/// Implements [`ApiResponse`] for structs holding a flattened `envelope` field.
macro_rules! impl_api_response {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::response::ApiResponse for $ty {
                fn envelope(&self) -> &$crate::response::Envelope {
                    &self.envelope
                }
            }
        )+
    };
}
pub(crate) use impl_api_response;

/// Parse `json` into `T` and apply the raise-on-error policy.
///
/// With `raise_on_error` set, a failed envelope becomes
/// [`FlickrError::Service`]; otherwise the decoded value is returned as is
/// and the caller inspects its envelope.
pub fn decode<T: ApiResponse>(json: &str, raise_on_error: bool) -> Result<T> {
    let value: T = serde_json::from_str(json)?;
    if raise_on_error && !value.is_success() {
        let envelope = value.envelope().clone();
        tracing::warn!(code = envelope.code, message = ?envelope.message, "Flickr returned non-success status");
        return Err(FlickrError::service(envelope));
    }
    Ok(value)
}
