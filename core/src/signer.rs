//! OAuth 1.0a request signing.
//!
//! Flickr takes request parameters in the query string for GET and POST
//! alike, so the signature always covers the query parameters of the request
//! URL plus the `oauth_*` protocol parameters. The result is attached as an
//! `Authorization: OAuth ...` header.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use uuid::Uuid;

use crate::credentials::SigningCredentials;
use crate::error::{FlickrError, Result};
use crate::http::HttpRequest;
use crate::params::{decode_query, percent_encode};

/// Narrow signing seam: annotate a request using a credential snapshot.
pub trait RequestSigner: Send + Sync {
    fn sign(&self, request: HttpRequest, credentials: &SigningCredentials) -> Result<HttpRequest>;
}

impl<T: RequestSigner + ?Sized> RequestSigner for std::sync::Arc<T> {
    fn sign(&self, request: HttpRequest, credentials: &SigningCredentials) -> Result<HttpRequest> {
        (**self).sign(request, credentials)
    }
}

/// HMAC-SHA1 signer producing an OAuth 1.0a `Authorization` header.
#[derive(Debug, Default, Clone, Copy)]
pub struct HmacSha1Signer;

impl HmacSha1Signer {
    pub fn new() -> Self {
        Self
    }

    /// Build the `Authorization` header value for a fixed nonce and timestamp.
    pub fn authorization_header(
        &self,
        request: &HttpRequest,
        credentials: &SigningCredentials,
        nonce: &str,
        timestamp: &str,
    ) -> Result<String> {
        let mut oauth_params = vec![
            ("oauth_consumer_key".to_string(), credentials.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_token".to_string(), credentials.token.clone()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ];

        let query_params = match request.query() {
            Some(query) => decode_query(query).ok_or_else(|| {
                FlickrError::transport("request query string is not valid UTF-8")
            })?,
            None => Vec::new(),
        };

        let mut all_params = oauth_params.clone();
        all_params.extend(query_params);

        let base_string =
            signature_base_string(request.method.as_str(), request.base_url(), &all_params);
        let signing_key = format!(
            "{}&{}",
            percent_encode(&credentials.consumer_secret),
            percent_encode(&credentials.token_secret)
        );
        let signature = hmac_sha1(&signing_key, &base_string)?;
        oauth_params.push(("oauth_signature".to_string(), signature));

        let header = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {header}"))
    }
}

impl RequestSigner for HmacSha1Signer {
    fn sign(
        &self,
        mut request: HttpRequest,
        credentials: &SigningCredentials,
    ) -> Result<HttpRequest> {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| FlickrError::transport_with("system clock is before the Unix epoch", e))?
            .as_secs()
            .to_string();
        let nonce = generate_nonce();

        let header = self.authorization_header(&request, credentials, &nonce, &timestamp)?;
        request
            .headers
            .retain(|(k, _)| !k.eq_ignore_ascii_case("authorization"));
        request.headers.push(("Authorization".to_string(), header));
        Ok(request)
    }
}

/// `METHOD&enc(url)&enc(sorted, encoded params)`.
pub fn signature_base_string(method: &str, base_url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(base_url),
        percent_encode(&param_string)
    )
}

fn generate_nonce() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Compute HMAC-SHA1 and return the base64-encoded digest.
fn hmac_sha1(key: &str, data: &str) -> Result<String> {
    type HmacSha1 = Hmac<Sha1>;

    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| FlickrError::Authentication(format!("invalid signing key: {e}")))?;
    mac.update(data.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    // Worked example from Twitter's "Creating a signature" documentation.
    fn twitter_credentials() -> SigningCredentials {
        SigningCredentials {
            consumer_key: "xvz1evFS4wEEPTGEFPHBog".to_string(),
            consumer_secret: "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".to_string(),
            token: "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".to_string(),
            token_secret: "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".to_string(),
        }
    }

    fn twitter_request() -> HttpRequest {
        HttpRequest::new(
            HttpMethod::Post,
            "https://api.twitter.com/1.1/statuses/update.json?include_entities=true&status=Hello%20Ladies%20%2B%20Gentlemen%2C%20a%20signed%20OAuth%20request%21",
        )
    }

    const NONCE: &str = "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg";
    const TIMESTAMP: &str = "1318622958";

    #[test]
    fn base_string_matches_reference() {
        let creds = twitter_credentials();
        let req = twitter_request();
        let mut params = vec![
            ("oauth_consumer_key".to_string(), creds.consumer_key.clone()),
            ("oauth_nonce".to_string(), NONCE.to_string()),
            ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
            ("oauth_timestamp".to_string(), TIMESTAMP.to_string()),
            ("oauth_token".to_string(), creds.token.clone()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ];
        params.extend(decode_query(req.query().unwrap()).unwrap());

        let base = signature_base_string("POST", req.base_url(), &params);
        assert_eq!(
            base,
            "POST&https%3A%2F%2Fapi.twitter.com%2F1.1%2Fstatuses%2Fupdate.json&include_entities%3Dtrue%26oauth_consumer_key%3Dxvz1evFS4wEEPTGEFPHBog%26oauth_nonce%3DkYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg%26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1318622958%26oauth_token%3D370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb%26oauth_version%3D1.0%26status%3DHello%2520Ladies%2520%252B%2520Gentlemen%252C%2520a%2520signed%2520OAuth%2520request%2521"
        );
    }

    #[test]
    fn signature_matches_reference() {
        let header = HmacSha1Signer::new()
            .authorization_header(&twitter_request(), &twitter_credentials(), NONCE, TIMESTAMP)
            .unwrap();
        assert!(header.starts_with("OAuth "));
        assert!(header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
        assert!(header.contains("oauth_token=\"370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb\""));
    }

    #[test]
    fn sign_adds_single_authorization_header() {
        let signer = HmacSha1Signer::new();
        let req = HttpRequest::new(HttpMethod::Get, "https://api.flickr.com/services/rest/?method=flickr.test.login");
        let signed = signer.sign(req, &twitter_credentials()).unwrap();
        let signed = signer.sign(signed, &twitter_credentials()).unwrap();

        let auth: Vec<_> = signed
            .headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("authorization"))
            .collect();
        assert_eq!(auth.len(), 1);
        assert!(auth[0].1.contains("oauth_nonce="));
        assert!(auth[0].1.contains("oauth_timestamp="));
        assert_eq!(signed.url, "https://api.flickr.com/services/rest/?method=flickr.test.login");
    }

    #[test]
    fn different_token_secret_changes_signature() {
        let signer = HmacSha1Signer::new();
        let req = twitter_request();
        let mut other = twitter_credentials();
        other.token_secret = "another-secret".to_string();

        let a = signer.authorization_header(&req, &twitter_credentials(), NONCE, TIMESTAMP).unwrap();
        let b = signer.authorization_header(&req, &other, NONCE, TIMESTAMP).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn nonces_are_unique_hex() {
        let a = generate_nonce();
        let b = generate_nonce();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn invalid_utf8_query_is_a_transport_error() {
        let req = HttpRequest::new(HttpMethod::Get, "https://example.com/?a=%FF");
        let err = HmacSha1Signer::new()
            .authorization_header(&req, &twitter_credentials(), NONCE, TIMESTAMP)
            .unwrap_err();
        assert!(matches!(err, FlickrError::Transport { .. }));
    }
}
