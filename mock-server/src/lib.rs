//! In-process emulator of the Flickr REST endpoint, for integration tests.
//!
//! Serves `/services/rest/` over GET and POST with Flickr's envelope
//! conventions: HTTP 200 for every reply, `stat`/`code`/`message` for
//! failures. Signed methods accept any `OAuth` header that names a known
//! token and carries a signature; the signature itself is not verified.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, Method},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const API_KEY: &str = "mock-api-key";
pub const TOKEN: &str = "72157-mock-token";
pub const TOKEN_SECRET: &str = "mock-token-secret";

#[derive(Clone, Debug)]
pub struct MockUser {
    pub nsid: String,
    pub username: String,
    pub fullname: String,
    pub perms: String,
}

/// A request as the emulator saw it.
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub http_method: Method,
    pub params: HashMap<String, String>,
    pub authorization: Option<String>,
}

#[derive(Debug)]
pub struct MockState {
    pub api_key: String,
    pub users: HashMap<String, MockUser>,
    pub calls: Vec<RecordedCall>,
}

impl Default for MockState {
    fn default() -> Self {
        let mut users = HashMap::new();
        users.insert(
            TOKEN.to_string(),
            MockUser {
                nsid: "12037949754@N01".to_string(),
                username: "mockuser".to_string(),
                fullname: "Mock User".to_string(),
                perms: "write".to_string(),
            },
        );
        Self {
            api_key: API_KEY.to_string(),
            users,
            calls: Vec::new(),
        }
    }
}

pub type Db = Arc<RwLock<MockState>>;

pub fn app() -> Router {
    app_with_state(Arc::new(RwLock::new(MockState::default())))
}

/// Router over caller-owned state, so tests can inspect recorded calls.
pub fn app_with_state(db: Db) -> Router {
    Router::new()
        .route("/services/rest/", get(rest).post(rest))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_state(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(db)).await
}

fn fail(code: i32, message: impl Into<String>) -> Value {
    json!({ "stat": "fail", "code": code, "message": message.into() })
}

fn ok(mut body: Map<String, Value>) -> Value {
    body.insert("stat".to_string(), json!("ok"));
    Value::Object(body)
}

async fn rest(
    State(db): State<Db>,
    method: Method,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut state = db.write().await;
    state.calls.push(RecordedCall {
        http_method: method,
        params: params.clone(),
        authorization: authorization.clone(),
    });

    Json(dispatch(&state, &params, authorization.as_deref()))
}

fn dispatch(state: &MockState, params: &HashMap<String, String>, authorization: Option<&str>) -> Value {
    let param = |name: &str| params.get(name).map(String::as_str).unwrap_or_default();

    if param("format") != "json" {
        return fail(111, format!("Format \"{}\" not found", param("format")));
    }
    if param("nojsoncallback") != "1" {
        return fail(111, "JSONP responses are not supported");
    }
    if param("api_key") != state.api_key {
        return fail(100, "Invalid API Key (Key has invalid format)");
    }

    match param("method") {
        "flickr.test.echo" => echo(params),
        "flickr.test.null" => match authenticate(state, authorization) {
            Ok(_) => ok(Map::new()),
            Err(err) => err,
        },
        "flickr.test.login" => match authenticate(state, authorization) {
            Ok(user) => login(user),
            Err(err) => err,
        },
        "flickr.oauth.checkToken" => match authenticate(state, authorization) {
            Ok(_) => check_token(state, param("oauth_token")),
            Err(err) => err,
        },
        "flickr.places.find" => find(param("query")),
        "flickr.places.findByLatLon" => find_by_lat_lon(param("lat"), param("lon"), params.get("accuracy")),
        "flickr.places.getChildrenWithPhotosPublic" => {
            children(params.get("place_id"), params.get("woe_id"))
        }
        other => fail(112, format!("Method \"{other}\" not found")),
    }
}

/// Token named in an `OAuth` Authorization header, if the header is well formed
/// and carries a signature.
fn oauth_token(authorization: &str) -> Option<&str> {
    let fields = authorization.strip_prefix("OAuth ")?;
    let mut token = None;
    let mut signed = false;
    for field in fields.split(',') {
        let (key, value) = field.trim().split_once('=')?;
        let value = value.trim_matches('"');
        match key {
            "oauth_token" => token = Some(value),
            "oauth_signature" => signed = !value.is_empty(),
            _ => {}
        }
    }
    token.filter(|_| signed)
}

fn authenticate<'a>(state: &'a MockState, authorization: Option<&str>) -> Result<&'a MockUser, Value> {
    let token = authorization
        .and_then(oauth_token)
        .ok_or_else(|| fail(96, "Invalid signature"))?;
    state
        .users
        .get(token)
        .ok_or_else(|| fail(98, "Invalid auth token"))
}

fn echo(params: &HashMap<String, String>) -> Value {
    let body = params
        .iter()
        .map(|(k, v)| (k.clone(), json!({ "_content": v })))
        .collect();
    ok(body)
}

fn login(user: &MockUser) -> Value {
    let mut body = Map::new();
    body.insert(
        "user".to_string(),
        json!({ "id": user.nsid, "username": { "_content": user.username } }),
    );
    ok(body)
}

fn check_token(state: &MockState, token: &str) -> Value {
    let Some(user) = state.users.get(token) else {
        return fail(98, "Invalid token");
    };
    let mut body = Map::new();
    body.insert(
        "oauth".to_string(),
        json!({
            "token": { "_content": token },
            "perms": { "_content": user.perms },
            "user": { "nsid": user.nsid, "username": user.username, "fullname": user.fullname }
        }),
    );
    ok(body)
}

fn gazetteer() -> Vec<Value> {
    vec![
        json!({
            "place_id": "7.MJR8tTVrIO1EgB",
            "woeid": "2487956",
            "latitude": "37.779",
            "longitude": "-122.420",
            "place_url": "/United+States/California/San+Francisco",
            "place_type": "locality",
            "place_type_id": "7",
            "timezone": "America/Los_Angeles",
            "_content": "San Francisco, California, United States",
            "woe_name": "San Francisco"
        }),
        json!({
            "place_id": "kH8dLOubBZRvX_YZ",
            "woeid": 44418,
            "latitude": 51.506,
            "longitude": -0.127,
            "place_url": "/United+Kingdom/England/London",
            "place_type": "locality",
            "place_type_id": 7,
            "timezone": "Europe/London",
            "_content": "London, England, United Kingdom",
            "woe_name": "London"
        }),
    ]
}

fn places(extra: Map<String, Value>, place: Vec<Value>) -> Value {
    let mut inner = extra;
    inner.insert("total".to_string(), json!(place.len()));
    inner.insert("place".to_string(), Value::Array(place));
    let mut body = Map::new();
    body.insert("places".to_string(), Value::Object(inner));
    ok(body)
}

fn find(query: &str) -> Value {
    if query.is_empty() {
        return fail(1, "Required parameter \"query\" missing");
    }
    let needle = query.to_lowercase();
    let found = gazetteer()
        .into_iter()
        .filter(|p| {
            p["_content"]
                .as_str()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .collect();
    let mut extra = Map::new();
    extra.insert("query".to_string(), json!(query));
    places(extra, found)
}

fn find_by_lat_lon(lat: &str, lon: &str, accuracy: Option<&String>) -> Value {
    let (Ok(lat_value), Ok(lon_value)) = (lat.parse::<f64>(), lon.parse::<f64>()) else {
        return fail(1, "Required arguments missing");
    };
    let accuracy = accuracy.map_or("16", String::as_str);
    let nearest = gazetteer().into_iter().min_by(|a, b| {
        let distance = |p: &Value| {
            let plat = p["latitude"].as_str().and_then(|s| s.parse().ok()).or(p["latitude"].as_f64());
            let plon = p["longitude"].as_str().and_then(|s| s.parse().ok()).or(p["longitude"].as_f64());
            (plat.unwrap_or_default() - lat_value).powi(2) + (plon.unwrap_or_default() - lon_value).powi(2)
        };
        distance(a).total_cmp(&distance(b))
    });
    let found = nearest
        .map(|mut p| {
            if let Some(obj) = p.as_object_mut() {
                if let Some(name) = obj.remove("_content") {
                    obj.insert("name".to_string(), name);
                }
            }
            p
        })
        .into_iter()
        .collect();

    let mut extra = Map::new();
    extra.insert("latitude".to_string(), json!(lat));
    extra.insert("longitude".to_string(), json!(lon));
    extra.insert("accuracy".to_string(), json!(accuracy));
    places(extra, found)
}

fn children(place_id: Option<&String>, woe_id: Option<&String>) -> Value {
    if place_id.is_none() && woe_id.is_none() {
        return fail(2, "Not a valid place type");
    }
    let child = json!({
        "place_id": "GddgqTpTUb8LgT93hw",
        "woeid": "23512048",
        "latitude": 37.781,
        "longitude": -122.405,
        "place_url": "/United+States/California/San+Francisco/SoMa",
        "place_type": "neighbourhood",
        "place_type_id": 22,
        "photo_count": "3082",
        "_content": "SoMa, San Francisco, CA, US, United States"
    });
    let mut extra = Map::new();
    if let Some(place_id) = place_id {
        extra.insert("place_id".to_string(), json!(place_id));
    }
    if let Some(woe_id) = woe_id {
        extra.insert("woe_id".to_string(), json!(woe_id));
    }
    places(extra, vec![child])
}
