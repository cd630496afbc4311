// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the auth/profile backend
    pub api_base_url: String,
    /// Base URL of the country data API
    pub countries_base_url: String,
    /// Path of the token refresh endpoint, relative to `api_base_url`
    pub token_refresh_path: String,
    /// File backing the persisted session and favorites
    pub session_store_path: PathBuf,
    /// Delay between a successful registration and the redirect to login
    pub register_redirect_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            countries_base_url: "https://restcountries.com/v3.1".to_string(),
            token_refresh_path: "/api/auth/token/refresh/".to_string(),
            session_store_path: PathBuf::from(".countries-explorer").join("session.json"),
            register_redirect_delay: Duration::from_millis(2000),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        let register_redirect_delay = match env::var("REGISTER_REDIRECT_DELAY_MS") {
            Ok(v) => Duration::from_millis(
                v.trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("REGISTER_REDIRECT_DELAY_MS", v))?,
            ),
            Err(_) => defaults.register_redirect_delay,
        };

        Ok(Self {
            api_base_url: env::var("API_BASE_URL")
                .map(|v| trim_base_url(&v))
                .unwrap_or(defaults.api_base_url),
            countries_base_url: env::var("COUNTRIES_BASE_URL")
                .map(|v| trim_base_url(&v))
                .unwrap_or(defaults.countries_base_url),
            token_refresh_path: env::var("TOKEN_REFRESH_PATH")
                .map(|v| v.trim().to_string())
                .unwrap_or(defaults.token_refresh_path),
            session_store_path: env::var("SESSION_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_store_path),
            register_redirect_delay,
        })
    }

    /// Absolute URL for a backend path such as `/api/auth/login/`.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }
}

fn trim_base_url(value: &str) -> String {
    value.trim().trim_end_matches('/').to_string()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
