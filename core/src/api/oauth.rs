use super::require_non_empty;
use crate::client::FlickrClient;
use crate::error::{FlickrError, Result};
use crate::params::params;
use crate::types::CheckTokenResponse;

/// Sub-client for `flickr.oauth.*`.
pub struct OAuth<'a> {
    pub(crate) client: &'a FlickrClient,
}

impl<'a> OAuth<'a> {
    /// `flickr.oauth.checkToken`: who a token belongs to and what it may do.
    pub fn check_token(&self, oauth_token: &str) -> Result<CheckTokenResponse> {
        require_non_empty("oauth_token", oauth_token)?;
        self.client.flickr_get(params([
            ("method", "flickr.oauth.checkToken"),
            ("oauth_token", oauth_token),
        ]))
    }

    /// Check the token the client is currently configured with.
    pub fn check_current_token(&self) -> Result<CheckTokenResponse> {
        let token = self.client.access_token().ok_or_else(|| {
            FlickrError::Authentication("no OAuth access token configured".to_string())
        })?;
        self.check_token(&token.token)
    }
}
