//! The Flickr client and its request/response pipeline.
//!
//! # Design
//! Every endpoint goes through one generic pipeline, [`FlickrClient::call`]:
//! inject the fixed parameters, encode them into a query string, build an
//! [`HttpRequest`], sign it if asked, hand it to the [`Transport`], then
//! decode the JSON and apply the raise-on-error policy. Endpoint methods in
//! [`crate::api`] only build parameter maps and pick the response type.
//!
//! The signer, transport and logger are injected, so the pipeline itself
//! carries no global state and can be driven entirely by stubs.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::credentials::{AccessToken, Credentials};
use crate::error::{FlickrError, Result};
use crate::http::{HttpMethod, HttpRequest};
use crate::logger::{NoopLogger, RequestLogger};
use crate::params::{encode_params, Params};
use crate::response::{decode, ApiResponse};
use crate::signer::{HmacSha1Signer, RequestSigner};
use crate::transport::{Transport, UreqTransport};

/// Blocking client for the Flickr REST API.
///
/// Safe to share between threads: the access token is swapped atomically
/// and everything else is read-only after construction, except the two
/// policy toggles which need `&mut self`.
pub struct FlickrClient {
    config: ClientConfig,
    credentials: Credentials,
    signer: Box<dyn RequestSigner>,
    transport: Box<dyn Transport>,
    logger: Arc<dyn RequestLogger>,
}

impl fmt::Debug for FlickrClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlickrClient")
            .field("config", &self.config)
            .field("has_access_token", &self.credentials.has_access_token())
            .finish_non_exhaustive()
    }
}

impl FlickrClient {
    /// Client with default configuration and no access token.
    pub fn new(api_key: &str, api_secret: &str) -> Result<Self> {
        Self::builder(api_key, api_secret).build()
    }

    /// Client with default configuration and an access token.
    pub fn with_access_token(api_key: &str, api_secret: &str, token: AccessToken) -> Result<Self> {
        Self::builder(api_key, api_secret).access_token(token).build()
    }

    pub fn builder(api_key: impl Into<String>, api_secret: impl Into<String>) -> FlickrClientBuilder {
        FlickrClientBuilder::new(api_key, api_secret)
    }

    // ── Credentials ──────────────────────────────────────────────────────

    pub fn api_key(&self) -> Result<&str> {
        self.credentials.api_key()
    }

    pub fn api_secret(&self) -> Result<&str> {
        self.credentials.api_secret()
    }

    pub fn access_token(&self) -> Option<AccessToken> {
        self.credentials.access_token()
    }

    /// Replace the access token. Requests signed after this returns use the
    /// new token and secret.
    pub fn set_access_token(&self, token: AccessToken) {
        self.credentials.set_access_token(token);
    }

    pub fn clear_access_token(&self) {
        self.credentials.clear_access_token();
    }

    // ── Configuration ────────────────────────────────────────────────────

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn raise_on_service_error(&self) -> bool {
        self.config.raise_on_service_error
    }

    pub fn set_raise_on_service_error(&mut self, raise: bool) {
        self.config.raise_on_service_error = raise;
    }

    pub fn verbose_logging(&self) -> bool {
        self.config.verbose_logging
    }

    pub fn set_verbose_logging(&mut self, verbose: bool) {
        self.config.verbose_logging = verbose;
    }

    // ── Pipeline entry points ────────────────────────────────────────────

    /// Signed GET.
    pub fn flickr_get<T: ApiResponse>(&self, params: Params) -> Result<T> {
        self.call(params, HttpMethod::Get, true)
    }

    pub fn flickr_get_with<T: ApiResponse>(&self, params: Params, sign: bool) -> Result<T> {
        self.call(params, HttpMethod::Get, sign)
    }

    /// Signed POST.
    pub fn flickr_post<T: ApiResponse>(&self, params: Params) -> Result<T> {
        self.call(params, HttpMethod::Post, true)
    }

    pub fn flickr_post_with<T: ApiResponse>(&self, params: Params, sign: bool) -> Result<T> {
        self.call(params, HttpMethod::Post, sign)
    }

    /// Run the full pipeline and decode the response into `T`.
    pub fn call<T: ApiResponse>(&self, params: Params, method: HttpMethod, sign: bool) -> Result<T> {
        let json = self.call_raw(params, method, sign)?;
        self.decode(&json)
    }

    /// Run the pipeline up to the raw JSON text, without decoding it.
    ///
    /// Some endpoints return structures that need repair before they fit a
    /// typed response; fix the text and pass it to [`decode`](Self::decode).
    pub fn call_raw(&self, mut params: Params, method: HttpMethod, sign: bool) -> Result<String> {
        if !self.credentials.has_access_token() {
            return Err(FlickrError::Authentication(
                "client has not been configured with an OAuth access token".to_string(),
            ));
        }
        if !matches!(method, HttpMethod::Get | HttpMethod::Post) {
            return Err(FlickrError::InvalidArgument(format!("unsupported method: {method}")));
        }

        params.insert("format".to_string(), "json".to_string());
        params.insert("nojsoncallback".to_string(), "1".to_string());
        params.insert("api_key".to_string(), self.api_key()?.to_string());

        if self.config.verbose_logging {
            self.logger.log("----------PARAMETERS----------");
            for (k, v) in &params {
                self.logger.log(&format!("{k}={v}"));
            }
            self.logger.log("--------END PARAMETERS--------");
        }

        tracing::debug!(
            flickr_method = params.get("method").map(String::as_str).unwrap_or_default(),
            http_method = %method,
            signed = sign,
            "calling Flickr"
        );

        let encoded = encode_params(&params);
        let endpoint = self.config.endpoint.as_str();
        let json = match method {
            HttpMethod::Get => self.get(endpoint, &encoded, sign)?,
            _ => self.post(endpoint, &encoded, sign)?,
        };

        if json.trim().is_empty() {
            return Err(FlickrError::transport("empty response from Flickr"));
        }
        if self.config.verbose_logging {
            self.logger.log(&format!("RESPONSE is {json}"));
        }
        Ok(json)
    }

    /// Decode JSON into `T`, applying this client's raise-on-error policy.
    pub fn decode<T: ApiResponse>(&self, json: &str) -> Result<T> {
        decode(json, self.config.raise_on_service_error)
    }

    // ── Transport ────────────────────────────────────────────────────────

    /// GET `url?encoded_params` and return the body text.
    pub fn get(&self, url: &str, encoded_params: &str, sign: bool) -> Result<String> {
        self.send(HttpMethod::Get, url, encoded_params, sign)
    }

    /// POST `url?encoded_params` and return the body text. Parameters go in
    /// the query string, not the body.
    pub fn post(&self, url: &str, encoded_params: &str, sign: bool) -> Result<String> {
        self.send(HttpMethod::Post, url, encoded_params, sign)
    }

    fn send(&self, method: HttpMethod, url: &str, encoded_params: &str, sign: bool) -> Result<String> {
        let full_url = if encoded_params.is_empty() {
            url.to_string()
        } else {
            format!("{url}?{encoded_params}")
        };
        if self.config.verbose_logging {
            self.logger.log(&format!("{method} URL is {full_url}"));
        }

        let mut request = HttpRequest::new(method, full_url);
        if sign {
            let credentials = self.credentials.signing_credentials()?;
            request = self.signer.sign(request, &credentials)?;
        }

        let response = self.transport.execute(&request)?;
        if !response.is_success() && response.body.trim().is_empty() {
            return Err(FlickrError::transport(format!(
                "HTTP {} with empty body from {}",
                response.status,
                request.base_url()
            )));
        }
        Ok(response.body)
    }
}

/// Builder for [`FlickrClient`].
pub struct FlickrClientBuilder {
    api_key: String,
    api_secret: String,
    access_token: Option<AccessToken>,
    config: ClientConfig,
    signer: Option<Box<dyn RequestSigner>>,
    transport: Option<Box<dyn Transport>>,
    logger: Option<Arc<dyn RequestLogger>>,
}

impl FlickrClientBuilder {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            access_token: None,
            config: ClientConfig::default(),
            signer: None,
            transport: None,
            logger: None,
        }
    }

    pub fn access_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Timeouts for the default transport. Ignored when a custom transport
    /// is supplied.
    pub fn timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.config.connect_timeout = connect;
        self.config.read_timeout = read;
        self
    }

    pub fn raise_on_service_error(mut self, raise: bool) -> Self {
        self.config.raise_on_service_error = raise;
        self
    }

    pub fn verbose_logging(mut self, verbose: bool) -> Self {
        self.config.verbose_logging = verbose;
        self
    }

    pub fn logger(mut self, logger: Arc<dyn RequestLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn signer(mut self, signer: impl RequestSigner + 'static) -> Self {
        self.signer = Some(Box::new(signer));
        self
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Build the client. Fails if the API key or secret is empty.
    pub fn build(self) -> Result<FlickrClient> {
        let credentials = Credentials::new(self.api_key, self.api_secret, self.access_token);
        credentials.api_key()?;
        credentials.api_secret()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Box::new(UreqTransport::new(
                self.config.connect_timeout,
                self.config.read_timeout,
            )),
        };

        Ok(FlickrClient {
            config: self.config,
            credentials,
            signer: self.signer.unwrap_or_else(|| Box::new(HmacSha1Signer::new())),
            transport,
            logger: self.logger.unwrap_or_else(|| Arc::new(NoopLogger)),
        })
    }
}
