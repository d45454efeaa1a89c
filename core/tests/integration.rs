//! End-to-end calls against the Flickr mock server.
//!
//! # Design
//! Starts the mock on a random port in a background runtime, then drives a
//! real [`FlickrClient`] through the default `ureq` transport and HMAC-SHA1
//! signer. What the server recorded is checked alongside what the client
//! decoded.

use std::net::SocketAddr;
use std::sync::Arc;

use flickr_core::{params, AccessToken, FlickrClient, FlickrError, Stat};
use mock_server::{Db, MockState, API_KEY, TOKEN, TOKEN_SECRET};
use tokio::sync::RwLock;

fn start_server() -> (SocketAddr, Db) {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let db: Db = Arc::new(RwLock::new(MockState::default()));
    let server_db = db.clone();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with_state(listener, server_db).await
        })
        .unwrap();
    });
    (addr, db)
}

fn client(addr: SocketAddr) -> FlickrClient {
    FlickrClient::builder(API_KEY, "mock-api-secret")
        .endpoint(format!("http://{addr}/services/rest/"))
        .access_token(AccessToken::new(TOKEN, TOKEN_SECRET))
        .build()
        .unwrap()
}

fn recorded(db: &Db) -> Vec<mock_server::RecordedCall> {
    db.blocking_read().calls.clone()
}

#[test]
fn echo_round_trip() {
    let (addr, db) = start_server();
    let client = client(addr);

    let resp = client
        .test()
        .echo(params([("foo", "bar baz"), ("format", "xml")]))
        .unwrap();
    assert_eq!(resp.envelope.stat, Stat::Ok);
    assert_eq!(resp.get_str("foo"), Some("bar baz"));
    // Injected parameters win over caller values.
    assert_eq!(resp.get_str("format"), Some("json"));
    assert_eq!(resp.get_str("nojsoncallback"), Some("1"));

    let calls = recorded(&db);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].params["api_key"], API_KEY);
    assert!(calls[0].authorization.is_none());
}

#[test]
fn signed_calls_reach_the_server_with_oauth_header() {
    let (addr, db) = start_server();
    let client = client(addr);

    let login = client.test().login().unwrap();
    assert_eq!(login.user.unwrap().username.as_str(), "mockuser");

    let checked = client.oauth().check_current_token().unwrap();
    let token = checked.access_token(TOKEN_SECRET).unwrap();
    assert_eq!(token.perms, "write");
    assert_eq!(token.nsid, "12037949754@N01");

    let calls = recorded(&db);
    assert_eq!(calls.len(), 2);
    for call in &calls {
        let auth = call.authorization.as_deref().unwrap();
        assert!(auth.starts_with("OAuth "));
        assert!(auth.contains(&format!("oauth_token=\"{TOKEN}\"")));
        assert!(auth.contains("oauth_signature=\""));
    }
}

#[test]
fn post_sends_params_in_query_string() {
    let (addr, db) = start_server();
    let client = client(addr);

    let resp: flickr_core::Envelope = client
        .flickr_post(params([("method", "flickr.test.null")]))
        .unwrap();
    assert!(resp.is_success());

    let calls = recorded(&db);
    assert_eq!(calls[0].http_method.as_str(), "POST");
    assert_eq!(calls[0].params["method"], "flickr.test.null");
}

#[test]
fn service_errors_raise_or_return() {
    let (addr, _db) = start_server();
    let mut client = client(addr);

    let err = client
        .flickr_get::<flickr_core::GenericResponse>(params([("method", "flickr.nope")]))
        .unwrap_err();
    match err {
        FlickrError::Service { code, message, .. } => {
            assert_eq!(code, 112);
            assert_eq!(message, "Method \"flickr.nope\" not found");
        }
        other => panic!("expected service error, got {other:?}"),
    }

    client.set_raise_on_service_error(false);
    let resp: flickr_core::Envelope = client.flickr_get(params([("method", "flickr.nope")])).unwrap();
    assert_eq!(resp.stat, Stat::Fail);
    assert_eq!(resp.code, 112);
}

#[test]
fn wrong_token_is_rejected_by_server() {
    let (addr, _db) = start_server();
    let client = client(addr);
    client.set_access_token(AccessToken::new("someone-else", "secret"));

    let err = client.test().null().unwrap_err();
    assert_eq!(err.service_code(), Some(98));
}

#[test]
fn places_lookups() {
    let (addr, db) = start_server();
    let client = client(addr);

    let found = client.places().find("San Francisco").unwrap();
    let place = &found.place_list()[0];
    assert_eq!(place.woeid, "2487956");
    assert_eq!(place.latitude, 37.779);
    assert_eq!(place.place_type_id, 7);

    let nearest = client.places().find_by_lat_lon(51.507_35, -0.127_58, Some(11)).unwrap();
    let place = &nearest.place_list()[0];
    assert_eq!(place.name, "London, England, United Kingdom");
    assert_eq!(place.woeid, "44418");
    assert_eq!(nearest.places.as_ref().unwrap().accuracy, Some(11));

    let children = client
        .places()
        .get_children_with_photos_public(Some("7.MJR8tTVrIO1EgB"), None)
        .unwrap();
    assert_eq!(children.place_list()[0].photo_count, Some(3082));

    let calls = recorded(&db);
    assert_eq!(calls[1].params["lat"], "51.5073");
    assert_eq!(calls[1].params["lon"], "-0.1275");
    assert!(calls.iter().all(|c| c.authorization.is_none()));
}

#[test]
fn unreachable_endpoint_is_a_transport_error() {
    let client = FlickrClient::builder(API_KEY, "secret")
        .endpoint("http://127.0.0.1:9/services/rest/")
        .access_token(AccessToken::new(TOKEN, TOKEN_SECRET))
        .build()
        .unwrap();
    let err = client.test().null().unwrap_err();
    assert!(matches!(err, FlickrError::Transport { .. }), "{err:?}");
}
