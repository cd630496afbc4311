// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session manager: login state, token persistence and authenticated requests.
//!
//! Handles:
//! - Optimistic restore of a persisted session
//! - Login, registration and logout against the auth backend
//! - Access token refresh, serialized so concurrent callers share one refresh
//! - `authenticated_fetch`, which attaches the bearer token and recovers from
//!   one expired or rejected access token per call

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    ApiErrorBody, LoginRequest, RefreshRequest, RefreshResponse, RegistrationForm, Session,
    SessionState, TokenPair,
};
use crate::services::token;
use crate::store::{keys, KeyValueStore};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::Mutex;

/// Backend paths, relative to `Config::api_base_url`.
pub mod paths {
    pub const LOGIN: &str = "/api/auth/login/";
    pub const REGISTER: &str = "/api/auth/register/";
    pub const PROFILE: &str = "/api/auth/profile/";
    pub const PROFILE_UPDATE: &str = "/api/auth/profile/update/";
}

/// Route the UI navigates to after a successful registration.
pub const LOGIN_ROUTE: &str = "/login";

const REGISTRATION_SUCCESS: &str = "Registration successful! Redirecting to login...";

/// Method, extra headers and body for an authenticated request.
///
/// `Authorization` and `Content-Type` are always set by the session manager;
/// every other caller header is sent as given.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Request with a JSON-serialized body.
    pub fn json<T: Serialize + ?Sized>(method: Method, body: &T) -> Result<Self> {
        let body = serde_json::to_string(body)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode body: {}", e)))?;
        Ok(Self {
            body: Some(body),
            ..Self::new(method)
        })
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Result of a refresh attempt that reached a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// New access token, already persisted.
    Refreshed(String),
    /// Refresh was impossible or rejected; the session has been cleared.
    Rejected,
}

impl RefreshOutcome {
    pub fn into_token(self) -> Option<String> {
        match self {
            RefreshOutcome::Refreshed(token) => Some(token),
            RefreshOutcome::Rejected => None,
        }
    }
}

/// Confirmation of a successful registration. The user is not logged in.
#[derive(Debug, Clone)]
pub struct RegistrationReceipt {
    pub message: String,
    pub redirect_after: Duration,
}

impl RegistrationReceipt {
    /// Wait out the redirect delay, then return the login route.
    pub async fn redirect(&self) -> &'static str {
        tokio::time::sleep(self.redirect_after).await;
        LOGIN_ROUTE
    }
}

/// Owns the authentication state of one application instance.
///
/// Share it as `Arc<SessionManager>`; there is no global session.
pub struct SessionManager {
    http: reqwest::Client,
    config: Config,
    store: Arc<dyn KeyValueStore>,
    state: RwLock<SessionState>,
    /// Held for the duration of a refresh so concurrent callers wait for it.
    refresh_lock: Mutex<()>,
}

impl SessionManager {
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_client(reqwest::Client::new(), config, store)
    }

    pub fn with_client(
        http: reqwest::Client,
        config: Config,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            http,
            config,
            store,
            state: RwLock::new(SessionState::default()),
            refresh_lock: Mutex::new(()),
        }
    }

    // ─── State ───────────────────────────────────────────────────────────────

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.read_state().clone()
    }

    pub fn current(&self) -> Option<Session> {
        self.read_state().session.clone()
    }

    pub fn username(&self) -> Option<String> {
        self.read_state().session.as_ref().map(|s| s.username.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_state().is_authenticated()
    }

    /// Whether a token is absent, malformed or expired.
    pub fn is_expired(&self, token: Option<&str>) -> bool {
        token::is_expired(token)
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────────

    /// Populate the session from persisted tokens.
    ///
    /// Optimistic: no server round-trip and no expiry check. An expired token
    /// is dealt with by the first `authenticated_fetch`.
    pub fn restore(&self) -> Option<Session> {
        self.write_state().loading = true;

        let session = match (
            self.store.get(keys::ACCESS_TOKEN),
            self.store.get(keys::USERNAME),
        ) {
            (Some(access_token), Some(username)) => Some(Session {
                username,
                access_token,
                refresh_token: self.store.get(keys::REFRESH_TOKEN),
            }),
            _ => None,
        };

        let mut state = self.write_state();
        state.session = session.clone();
        state.loading = false;

        match &session {
            Some(s) => tracing::info!(username = %s.username, "Restored persisted session"),
            None => tracing::debug!("No persisted session"),
        }

        session
    }

    /// Log in and persist the issued token pair.
    ///
    /// On failure the server's message is returned verbatim and nothing
    /// persisted is touched.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let response = self
            .http
            .post(self.config.api_url(paths::LOGIN))
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let tokens = if status.is_success() {
            serde_json::from_str::<TokenPair>(&body).ok()
        } else {
            None
        };
        let Some(tokens) = tokens else {
            tracing::warn!(username, status = %status, "Login rejected");
            return Err(AppError::Server(
                ApiErrorBody::parse(&body).message_or("Login failed"),
            ));
        };

        self.store.set(keys::ACCESS_TOKEN, &tokens.access)?;
        self.store.set(keys::REFRESH_TOKEN, &tokens.refresh)?;
        self.store.set(keys::USERNAME, username)?;

        let session = Session {
            username: username.to_string(),
            access_token: tokens.access,
            refresh_token: Some(tokens.refresh),
        };
        self.write_state().session = Some(session.clone());

        tracing::info!(username, "Logged in");
        Ok(session)
    }

    /// Register a new account. Does not log in.
    ///
    /// Mismatched passwords fail locally without contacting the server.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<RegistrationReceipt> {
        let form = RegistrationForm {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm_password.to_string(),
        };
        form.check()?;

        let response = self
            .http
            .post(self.config.api_url(paths::REGISTER))
            .json(&form.to_request())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(username, status = %status, "Registration rejected");
            return Err(AppError::Server(
                ApiErrorBody::parse(&body).message_or("Registration failed"),
            ));
        }

        tracing::info!(username, "Registered new account");
        Ok(RegistrationReceipt {
            message: REGISTRATION_SUCCESS.to_string(),
            redirect_after: self.config.register_redirect_delay,
        })
    }

    /// Clear persisted tokens and the in-memory session. Idempotent.
    ///
    /// The in-memory session is cleared even if the store fails.
    pub fn logout(&self) -> Result<()> {
        self.write_state().session = None;

        let mut first_err = None;
        for key in [keys::ACCESS_TOKEN, keys::REFRESH_TOKEN, keys::USERNAME] {
            if let Err(e) = self.store.remove(key) {
                tracing::error!(key, error = %e, "Failed to clear persisted key");
                first_err.get_or_insert(e);
            }
        }

        tracing::info!("Logged out");
        first_err.map_or(Ok(()), Err)
    }

    // ─── Token Refresh ───────────────────────────────────────────────────────

    /// Exchange the stored refresh token for a new access token.
    ///
    /// A missing refresh token or a non-success response ends the session.
    /// Transport failures propagate without touching the session.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    /// Refresh unless another caller already replaced `stale` while we waited.
    async fn refresh_after(&self, stale: Option<&str>) -> Result<Option<String>> {
        let _guard = self.refresh_lock.lock().await;

        if let Some(current) = self.store.get(keys::ACCESS_TOKEN) {
            if Some(current.as_str()) != stale && !token::is_expired(Some(&current)) {
                tracing::debug!("Access token already refreshed by a concurrent request");
                return Ok(Some(current));
            }
        }

        Ok(self.refresh_locked().await?.into_token())
    }

    /// Caller must hold `refresh_lock`.
    async fn refresh_locked(&self) -> Result<RefreshOutcome> {
        let Some(refresh_token) = self.store.get(keys::REFRESH_TOKEN) else {
            tracing::info!("No refresh token stored, ending session");
            self.logout()?;
            return Ok(RefreshOutcome::Rejected);
        };

        let response = self
            .http
            .post(self.config.api_url(&self.config.token_refresh_path))
            .json(&RefreshRequest {
                refresh: &refresh_token,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Token refresh rejected, ending session");
            self.logout()?;
            return Ok(RefreshOutcome::Rejected);
        }

        let access = match response.json::<RefreshResponse>().await {
            Ok(body) => body.access,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed token refresh response, ending session");
                self.logout()?;
                return Ok(RefreshOutcome::Rejected);
            }
        };

        self.store.set(keys::ACCESS_TOKEN, &access)?;
        if let Some(session) = self.write_state().session.as_mut() {
            session.access_token = access.clone();
        }

        tracing::info!("Access token refreshed");
        Ok(RefreshOutcome::Refreshed(access))
    }

    // ─── Authenticated Requests ──────────────────────────────────────────────

    /// Perform a request with the current access token attached.
    ///
    /// 1. An expired stored token is refreshed before the request.
    /// 2. A 401 response triggers one refresh and exactly one retry; the
    ///    retry's response is returned whatever its status.
    /// 3. Any other response is returned unmodified.
    ///
    /// At most one refresh per call: a 401 for a token refreshed in step 1 is
    /// returned as is.
    ///
    /// A failed refresh yields `AppError::SessionExpired`.
    pub async fn authenticated_fetch(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<reqwest::Response> {
        let url = self.resolve_url(url);
        let mut access_token = self.store.get(keys::ACCESS_TOKEN);
        let mut refreshed = false;

        if access_token
            .as_deref()
            .is_some_and(|t| token::is_expired(Some(t)))
        {
            tracing::debug!(url = %url, "Access token expired, refreshing before request");
            let new_token = self.refresh_after(access_token.as_deref()).await?;
            access_token = Some(new_token.ok_or(AppError::SessionExpired)?);
            refreshed = true;
        }

        let response = self.send(&url, &options, access_token.as_deref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }
        if refreshed {
            tracing::warn!(url = %url, "Freshly refreshed token rejected, not refreshing again");
            return Ok(response);
        }

        tracing::info!(url = %url, "Request unauthorized, refreshing and retrying once");
        let new_token = self
            .refresh_after(access_token.as_deref())
            .await?
            .ok_or(AppError::SessionExpired)?;

        self.send(&url, &options, Some(new_token.as_str())).await
    }

    fn resolve_url(&self, url: &str) -> String {
        if url.starts_with('/') {
            self.config.api_url(url)
        } else {
            url.to_string()
        }
    }

    async fn send(
        &self,
        url: &str,
        options: &RequestOptions,
        access_token: Option<&str>,
    ) -> Result<reqwest::Response> {
        let headers = merge_headers(&options.headers, access_token)?;

        let mut request = self
            .http
            .request(options.method.clone(), url)
            .headers(headers);
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        Ok(request.send().await?)
    }
}

/// Caller headers plus the two keys the session manager owns.
fn merge_headers(caller: &HeaderMap, access_token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = caller.clone();

    match access_token {
        Some(token) => {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Access token is not a valid header: {}", e))
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        None => {
            headers.remove(AUTHORIZATION);
        }
    }
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(headers)
}
