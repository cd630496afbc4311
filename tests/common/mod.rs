// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mock auth backend and country API served by axum on an ephemeral port.

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use countries_explorer::config::Config;
use countries_explorer::services::SessionManager;
use countries_explorer::store::MemoryStore;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const PASSWORD: &str = "correct-horse";
const SIGNING_KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: u64,
    iat: u64,
    jti: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Counters and switches shared with the mock handlers.
#[derive(Default)]
pub struct MockState {
    pub login_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    /// When set, the refresh endpoint answers 401.
    pub refresh_fails: AtomicBool,
    /// Delay applied inside the refresh handler, in milliseconds.
    pub refresh_delay_ms: AtomicU64,
    /// Number of upcoming profile requests to reject with 401 regardless of token.
    pub reject_profile: AtomicUsize,
    /// Headers of the most recent profile request.
    pub last_profile_headers: Mutex<Option<HeaderMap>>,
    pub last_refresh_token: Mutex<Option<String>>,
    pub last_update_body: Mutex<Option<Value>>,
    jti: AtomicU64,
}

impl MockState {
    /// Mint an HS256 token for `username` expiring `ttl_secs` from now
    /// (negative for an already expired token).
    pub fn mint(&self, username: &str, ttl_secs: i64) -> String {
        let now = now_secs();
        let claims = Claims {
            sub: username.to_string(),
            exp: (now as i64 + ttl_secs) as u64,
            iat: now,
            jti: self.jti.fetch_add(1, Ordering::SeqCst),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SIGNING_KEY),
        )
        .unwrap()
    }

    fn verify(&self, headers: &HeaderMap) -> Option<String> {
        let token = headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(token, &DecodingKey::from_secret(SIGNING_KEY), &validation)
            .ok()
            .map(|data| data.claims.sub)
    }

    pub fn refreshes(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn profiles(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }
}

type Shared = Arc<MockState>;

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct RegisterBody {
    username: String,
    password: String,
    #[serde(default)]
    email: String,
}

#[derive(Deserialize)]
struct RefreshBody {
    refresh: String,
}

async fn login(
    State(state): State<Shared>,
    Json(body): Json<LoginBody>,
) -> (StatusCode, Json<Value>) {
    state.login_calls.fetch_add(1, Ordering::SeqCst);
    if body.password != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"ok": false, "error": "Invalid credentials"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "access": state.mint(&body.username, 3600),
            "refresh": format!("refresh-{}", body.username),
        })),
    )
}

async fn register(
    State(state): State<Shared>,
    Json(body): Json<RegisterBody>,
) -> (StatusCode, Json<Value>) {
    state.register_calls.fetch_add(1, Ordering::SeqCst);
    if body.username == "taken" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Username already exists"})),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({"message": "User created successfully"})),
    )
}

async fn refresh(
    State(state): State<Shared>,
    Json(body): Json<RefreshBody>,
) -> (StatusCode, Json<Value>) {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    *state.last_refresh_token.lock().unwrap() = Some(body.refresh.clone());

    let delay = state.refresh_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    if state.refresh_fails.load(Ordering::SeqCst) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Token is invalid or expired"})),
        );
    }

    let username = body.refresh.trim_start_matches("refresh-");
    (
        StatusCode::OK,
        Json(json!({"access": state.mint(username, 3600)})),
    )
}

async fn profile(State(state): State<Shared>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    state.profile_calls.fetch_add(1, Ordering::SeqCst);
    *state.last_profile_headers.lock().unwrap() = Some(headers.clone());

    let forced = state
        .reject_profile
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    match state.verify(&headers) {
        Some(username) if !forced => (
            StatusCode::OK,
            Json(json!({"username": username, "email": format!("{username}@example.com")})),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Given token not valid for any token type"})),
        ),
    }
}

async fn update_profile(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.update_calls.fetch_add(1, Ordering::SeqCst);
    if state.verify(&headers).is_none() {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    let too_long = body["bio"].as_str().is_some_and(|b| b.len() > 20);
    *state.last_update_body.lock().unwrap() = Some(body);
    if too_long {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Bio too long"})));
    }
    (StatusCode::OK, Json(json!({"message": "Profile updated"})))
}

async fn server_error() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "boom"})),
    )
}

/// Running mock auth backend.
pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/api/auth/login/", post(login))
            .route("/api/auth/register/", post(register))
            .route("/api/auth/token/refresh/", post(refresh))
            .route("/api/auth/profile/", get(profile))
            .route("/api/auth/profile/update/", put(update_profile))
            .route("/api/broken/", get(server_error))
            .with_state(state.clone());

        let base_url = serve(app).await;
        Self { base_url, state }
    }

    pub fn config(&self) -> Config {
        Config {
            api_base_url: self.base_url.clone(),
            register_redirect_delay: Duration::from_millis(10),
            ..Config::default()
        }
    }

    /// Session manager over a fresh in-memory store.
    pub fn session(&self) -> (Arc<SessionManager>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let session = Arc::new(SessionManager::new(self.config(), store.clone()));
        (session, store)
    }
}

/// Mock country data API with a fixed data set.
pub struct MockCountries {
    pub base_url: String,
    pub hits: Arc<Mutex<Vec<String>>>,
}

fn fixture() -> Vec<Value> {
    vec![
        json!({
            "name": {"common": "Germany", "official": "Federal Republic of Germany"},
            "cca3": "DEU", "capital": ["Berlin"], "region": "Europe",
            "population": 83240525, "flags": {"svg": "https://flagcdn.com/de.svg"},
            "currencies": {"EUR": {"name": "Euro", "symbol": "€"}},
            "borders": ["AUT", "FRA"], "tld": [".de"]
        }),
        json!({
            "name": {"common": "France"}, "cca3": "FRA", "capital": ["Paris"],
            "region": "Europe", "population": 67391582,
            "flags": {"svg": "https://flagcdn.com/fr.svg"}, "borders": ["DEU"], "tld": [".fr"]
        }),
        json!({
            "name": {"common": "Japan"}, "cca3": "JPN", "capital": ["Tokyo"],
            "region": "Asia", "population": 125836021,
            "flags": {"svg": "https://flagcdn.com/jp.svg"}, "tld": [".jp"]
        }),
        json!({
            "name": {"common": "United States"}, "cca3": "USA", "capital": ["Washington, D.C."],
            "region": "Americas", "population": 329484123,
            "flags": {"svg": "https://flagcdn.com/us.svg"},
            "borders": ["CAN", "MEX"], "tld": [".us"]
        }),
    ]
}

fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"status": 404, "message": "Not Found"})),
    )
}

type Hits = Arc<Mutex<Vec<String>>>;

async fn all(State(hits): State<Hits>) -> (StatusCode, Json<Value>) {
    hits.lock().unwrap().push("all".to_string());
    (StatusCode::OK, Json(Value::Array(fixture())))
}

async fn alpha(State(hits): State<Hits>, Path(code): Path<String>) -> (StatusCode, Json<Value>) {
    hits.lock().unwrap().push(format!("alpha:{code}"));
    let found: Vec<Value> = fixture()
        .into_iter()
        .filter(|c| c["cca3"].as_str() == Some(code.to_uppercase().as_str()))
        .collect();
    if found.is_empty() {
        return not_found();
    }
    (StatusCode::OK, Json(Value::Array(found)))
}

async fn name(State(hits): State<Hits>, Path(name): Path<String>) -> (StatusCode, Json<Value>) {
    hits.lock().unwrap().push(format!("name:{name}"));
    let needle = name.to_lowercase();
    let found: Vec<Value> = fixture()
        .into_iter()
        .filter(|c| {
            c["name"]["common"]
                .as_str()
                .is_some_and(|n| n.to_lowercase().contains(&needle))
        })
        .collect();
    if found.is_empty() {
        return not_found();
    }
    (StatusCode::OK, Json(Value::Array(found)))
}

async fn region(State(hits): State<Hits>, Path(region): Path<String>) -> (StatusCode, Json<Value>) {
    hits.lock().unwrap().push(format!("region:{region}"));
    let found: Vec<Value> = fixture()
        .into_iter()
        .filter(|c| c["region"].as_str().is_some_and(|r| r.eq_ignore_ascii_case(&region)))
        .collect();
    if found.is_empty() {
        return not_found();
    }
    (StatusCode::OK, Json(Value::Array(found)))
}

impl MockCountries {
    pub async fn start() -> Self {
        let hits: Hits = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/v3.1/all", get(all))
            .route("/v3.1/alpha/{code}", get(alpha))
            .route("/v3.1/name/{name}", get(name))
            .route("/v3.1/region/{region}", get(region))
            .with_state(hits.clone());

        let base_url = format!("{}/v3.1", serve(app).await);
        Self { base_url, hits }
    }

    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

/// Bind an ephemeral port, serve `app` in the background, return its base URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
