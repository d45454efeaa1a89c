//! Endpoint sub-clients.
//!
//! Each sub-client borrows the [`FlickrClient`] and maps its arguments onto a
//! parameter map for the shared pipeline. Argument validation happens here,
//! before anything reaches the network.

mod oauth;
mod places;

pub use oauth::OAuth;
pub use places::Places;
pub use test::Test;

use crate::client::FlickrClient;
use crate::error::{FlickrError, Result};

impl FlickrClient {
    /// `flickr.test.*`
    pub fn test(&self) -> Test<'_> {
        Test { client: self }
    }

    /// `flickr.oauth.*`
    pub fn oauth(&self) -> OAuth<'_> {
        OAuth { client: self }
    }

    /// `flickr.places.*`
    pub fn places(&self) -> Places<'_> {
        Places { client: self }
    }
}

fn require_non_empty(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FlickrError::InvalidArgument(format!("{name} is required")));
    }
    Ok(())
}
