// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Request and response bodies for the auth backend.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// `POST /api/auth/login/` body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Token pair returned by a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// `POST /api/auth/token/refresh/` body.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Refresh response; only the access token is rotated.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Registration form as entered by the user.
#[derive(Debug, Clone, Validate)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    #[validate(must_match(other = "confirm_password", message = "Passwords do not match"))]
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Run the local checks that must pass before contacting the server.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate().map_err(|errors| {
            let message = errors
                .field_errors()
                .values()
                .flat_map(|errs| errs.iter())
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| AppError::PASSWORD_MISMATCH.to_string());
            AppError::Validation(message)
        })
    }

    /// Wire body; the confirmation never leaves the client.
    pub fn to_request(&self) -> RegisterRequest<'_> {
        RegisterRequest {
            username: &self.username,
            password: &self.password,
            email: &self.email,
        }
    }
}

/// `POST /api/auth/register/` body.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub email: &'a str,
}

/// Error body shape shared by all backend endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    /// Parse an error body, tolerating non-JSON responses.
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// Server message, or `fallback` when the body carries none.
    pub fn message_or(self, fallback: &str) -> String {
        self.error
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}
