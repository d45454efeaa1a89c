//! Synchronous client core for the Flickr REST API.
//!
//! # Overview
//! Every API call goes through one pipeline in [`FlickrClient`]: the caller's
//! parameters get `format`, `nojsoncallback` and `api_key` added, are
//! percent-encoded into a query string, optionally OAuth 1.0a signed, sent
//! through a [`Transport`], and the JSON reply is decoded into a typed
//! response that flattens Flickr's `stat`/`code`/`message` envelope.
//!
//! # Design
//! - The signer, transport and request logger are traits injected at build
//!   time. The defaults are [`HmacSha1Signer`], [`UreqTransport`] and
//!   [`NoopLogger`]; tests swap in stubs so nothing touches the network.
//! - Requests are plain [`HttpRequest`] values until the transport runs them.
//! - Service failures (a non-zero `code`) become
//!   [`FlickrError::Service`] unless raise-on-error is turned off, in which
//!   case the envelope is returned to the caller for inspection.
//! - Endpoint groups hang off the client as borrowed sub-clients:
//!   `client.test()`, `client.oauth()`, `client.places()`.

pub mod api;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod logger;
pub mod params;
pub mod response;
pub mod serde_util;
pub mod signer;
pub mod transport;
pub mod types;

pub use client::{FlickrClient, FlickrClientBuilder};
pub use config::{ClientConfig, REST_ENDPOINT};
pub use credentials::{AccessToken, Credentials, SigningCredentials};
pub use error::{FlickrError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use logger::{NoopLogger, RequestLogger, StdoutLogger, TracingLogger};
pub use params::{encode_params, params, percent_encode, Params};
pub use response::{decode, ApiResponse, Envelope, GenericResponse, Stat};
pub use signer::{HmacSha1Signer, RequestSigner};
pub use transport::{Transport, UreqTransport};
pub use types::{
    CheckTokenResponse, Content, LoginResponse, LoginUser, OAuthCredentials, OAuthInfo, OAuthUser, Place,
    Places, PlacesResponse,
};
