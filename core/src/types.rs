//! Typed responses for the endpoints in [`crate::api`].
//!
//! Each response flattens an [`Envelope`]. The payload fields are optional
//! because a failed call decoded with raise-on-error disabled carries only
//! the envelope.

use serde::{Deserialize, Serialize};

use crate::credentials::AccessToken;
use crate::response::{impl_api_response, Envelope};
use crate::serde_util::{f64_lenient, opt_f64_lenient, opt_u64_lenient, string_lenient, u64_lenient};

/// Flickr wraps many scalars as `{"_content": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    #[serde(rename = "_content", default)]
    pub content: String,
}

impl Content {
    pub fn as_str(&self) -> &str {
        &self.content
    }
}

// ── flickr.test.login ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(default)]
    pub user: Option<LoginUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginUser {
    pub id: String,
    #[serde(default)]
    pub username: Content,
    #[serde(default)]
    pub path_alias: Option<String>,
}

// ── flickr.oauth.checkToken ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckTokenResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(default)]
    pub oauth: Option<OAuthInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OAuthInfo {
    pub token: Content,
    #[serde(default)]
    pub perms: Content,
    pub user: OAuthUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OAuthUser {
    pub nsid: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub fullname: String,
}

/// Flat view of a checked token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
    pub token: String,
    pub perms: String,
    pub nsid: String,
    pub username: String,
    pub fullname: String,
}

impl CheckTokenResponse {
    pub fn credentials(&self) -> Option<OAuthCredentials> {
        let oauth = self.oauth.as_ref()?;
        Some(OAuthCredentials {
            token: oauth.token.content.clone(),
            perms: oauth.perms.content.clone(),
            nsid: oauth.user.nsid.clone(),
            username: oauth.user.username.clone(),
            fullname: oauth.user.fullname.clone(),
        })
    }

    /// Build a complete [`AccessToken`] from the checked token and its
    /// secret, which Flickr never echoes back.
    pub fn access_token(&self, token_secret: impl Into<String>) -> Option<AccessToken> {
        let creds = self.credentials()?;
        Some(AccessToken {
            token: creds.token,
            token_secret: token_secret.into(),
            username: creds.username,
            nsid: creds.nsid,
            fullname: creds.fullname,
            perms: creds.perms,
        })
    }
}

// ── flickr.places.* ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlacesResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(default)]
    pub places: Option<Places>,
}

impl PlacesResponse {
    /// The places in the response, empty on failure.
    pub fn place_list(&self) -> &[Place] {
        self.places
            .as_ref()
            .map(|p| p.place.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Places {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default, deserialize_with = "opt_f64_lenient")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64_lenient")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "opt_u64_lenient")]
    pub accuracy: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64_lenient")]
    pub total: Option<u64>,
    #[serde(default)]
    pub place: Vec<Place>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Place {
    pub place_id: String,
    #[serde(default, deserialize_with = "string_lenient")]
    pub woeid: String,
    #[serde(deserialize_with = "f64_lenient")]
    pub latitude: f64,
    #[serde(deserialize_with = "f64_lenient")]
    pub longitude: f64,
    #[serde(default)]
    pub place_url: String,
    #[serde(default)]
    pub place_type: String,
    #[serde(default, deserialize_with = "u64_lenient")]
    pub place_type_id: u64,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub woe_name: Option<String>,
    #[serde(default, deserialize_with = "opt_u64_lenient")]
    pub photo_count: Option<u64>,
    /// Human-readable place name. `find` sends it as `_content`,
    /// `findByLatLon` as `name`.
    #[serde(rename = "_content", alias = "name", default)]
    pub name: String,
}

impl_api_response!(LoginResponse, CheckTokenResponse, PlacesResponse);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ApiResponse;

    #[test]
    fn check_token_flattens_credentials() {
        let json = r#"{
            "oauth": {
                "token": {"_content": "72157-abc"},
                "perms": {"_content": "write"},
                "user": {"nsid": "12037949754@N01", "username": "Bees", "fullname": "Cal H"}
            },
            "stat": "ok"
        }"#;
        let resp: CheckTokenResponse = serde_json::from_str(json).unwrap();
        assert!(resp.is_success());
        let creds = resp.credentials().unwrap();
        assert_eq!(creds.token, "72157-abc");
        assert_eq!(creds.perms, "write");
        assert_eq!(creds.nsid, "12037949754@N01");

        let token = resp.access_token("s3cret").unwrap();
        assert_eq!(token.token_secret, "s3cret");
        assert_eq!(token.username, "Bees");
        assert_eq!(token.fullname, "Cal H");
    }

    #[test]
    fn failed_check_token_has_no_credentials() {
        let resp: CheckTokenResponse =
            serde_json::from_str(r#"{"stat":"fail","code":98,"message":"Invalid token"}"#).unwrap();
        assert!(resp.credentials().is_none());
        assert_eq!(resp.envelope().code, 98);
    }

    #[test]
    fn places_accept_mixed_scalar_types() {
        let json = r#"{
            "places": {
                "query": "Alabama",
                "total": "1",
                "place": [{
                    "place_id": "VrrjuESbApjeFS4.",
                    "woeid": 2347559,
                    "latitude": "32.614",
                    "longitude": -86.680,
                    "place_url": "/United+States/Alabama",
                    "place_type": "region",
                    "place_type_id": "8",
                    "timezone": "America/Chicago",
                    "_content": "Alabama, US, United States"
                }]
            },
            "stat": "ok"
        }"#;
        let resp: PlacesResponse = serde_json::from_str(json).unwrap();
        let place = &resp.place_list()[0];
        assert_eq!(place.woeid, "2347559");
        assert_eq!(place.latitude, 32.614);
        assert_eq!(place.longitude, -86.68);
        assert_eq!(place.place_type_id, 8);
        assert_eq!(place.name, "Alabama, US, United States");
        assert_eq!(resp.places.as_ref().unwrap().total, Some(1));
    }

    #[test]
    fn login_user() {
        let json = r#"{"user":{"id":"12037949754@N01","username":{"_content":"Bees"}},"stat":"ok"}"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        let user = resp.user.unwrap();
        assert_eq!(user.id, "12037949754@N01");
        assert_eq!(user.username.as_str(), "Bees");
    }
}
