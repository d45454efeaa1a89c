//! API credentials and the OAuth access token.

use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{FlickrError, Result};

/// An OAuth access token identifying an authorized user.
///
/// Obtained through the OAuth authorization flow, which happens outside this
/// crate. Serializable so callers can persist it however they like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub token: String,
    pub token_secret: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub nsid: String,
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub perms: String,
}

impl AccessToken {
    /// A token with only the signing pair set.
    pub fn new(token: impl Into<String>, token_secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            token_secret: token_secret.into(),
            username: String::new(),
            nsid: String::new(),
            fullname: String::new(),
            perms: String::new(),
        }
    }
}

/// Snapshot of everything a signer needs for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: String,
    pub token_secret: String,
}

/// API key and secret plus the replaceable access token.
///
/// The token sits behind a lock and is swapped whole, so a request signed
/// concurrently with a replacement sees either the old pair or the new one.
#[derive(Debug)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
    access_token: RwLock<Option<AccessToken>>,
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        access_token: Option<AccessToken>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            access_token: RwLock::new(access_token),
        }
    }

    pub fn api_key(&self) -> Result<&str> {
        if self.api_key.is_empty() {
            return Err(FlickrError::Configuration(
                "missing API key; construct the client with a key".to_string(),
            ));
        }
        Ok(&self.api_key)
    }

    pub fn api_secret(&self) -> Result<&str> {
        if self.api_secret.is_empty() {
            return Err(FlickrError::Configuration(
                "missing API secret; construct the client with a secret".to_string(),
            ));
        }
        Ok(&self.api_secret)
    }

    pub fn access_token(&self) -> Option<AccessToken> {
        self.access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn set_access_token(&self, token: AccessToken) {
        *self
            .access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub fn clear_access_token(&self) {
        *self
            .access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Snapshot the current key, secret and token pair for signing.
    pub fn signing_credentials(&self) -> Result<SigningCredentials> {
        let token = self.access_token().ok_or_else(|| {
            FlickrError::Authentication("no OAuth access token configured".to_string())
        })?;
        Ok(SigningCredentials {
            consumer_key: self.api_key()?.to_string(),
            consumer_secret: self.api_secret()?.to_string(),
            token: token.token,
            token_secret: token.token_secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_a_configuration_error() {
        let creds = Credentials::new("", "secret", None);
        assert!(matches!(creds.api_key(), Err(FlickrError::Configuration(_))));
        assert_eq!(creds.api_secret().unwrap(), "secret");
    }

    #[test]
    fn empty_secret_is_a_configuration_error() {
        let creds = Credentials::new("key", "", None);
        assert!(matches!(creds.api_secret(), Err(FlickrError::Configuration(_))));
    }

    #[test]
    fn signing_without_token_is_an_authentication_error() {
        let creds = Credentials::new("key", "secret", None);
        assert!(!creds.has_access_token());
        assert!(matches!(
            creds.signing_credentials(),
            Err(FlickrError::Authentication(_))
        ));
    }

    #[test]
    fn replacing_token_changes_signing_pair() {
        let creds = Credentials::new("key", "secret", Some(AccessToken::new("t1", "s1")));
        assert_eq!(creds.signing_credentials().unwrap().token, "t1");

        creds.set_access_token(AccessToken::new("t2", "s2"));
        let signing = creds.signing_credentials().unwrap();
        assert_eq!(signing.token, "t2");
        assert_eq!(signing.token_secret, "s2");
        assert_eq!(signing.consumer_key, "key");
        assert_eq!(signing.consumer_secret, "secret");
    }

    #[test]
    fn clearing_token_removes_it() {
        let creds = Credentials::new("key", "secret", Some(AccessToken::new("t", "s")));
        creds.clear_access_token();
        assert!(creds.access_token().is_none());
    }

    #[test]
    fn token_deserializes_with_only_signing_pair() {
        let token: AccessToken =
            serde_json::from_str(r#"{"token":"72157-abc","token_secret":"f00"}"#).unwrap();
        assert_eq!(token, AccessToken::new("72157-abc", "f00"));
    }
}
