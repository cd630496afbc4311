// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types.
//!
//! Errors fall into four groups that callers treat differently:
//! local validation failures, an unrecoverable session, server-reported
//! business errors, and transport failures.

/// Application error type returned by every client operation.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Detected locally before any network call.
    #[error("{0}")]
    Validation(String),

    /// Refresh failed; callers should force a logout and send the user to login.
    #[error("Session expired")]
    SessionExpired,

    /// Human-readable error text taken verbatim from a response body.
    #[error("{0}")]
    Server(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message shown when the local password confirmation check fails.
    pub const PASSWORD_MISMATCH: &'static str = "Passwords do not match";

    /// True when the caller must drop the session and re-authenticate.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, AppError::SessionExpired)
    }

    /// True for failures that never left the process.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, AppError>;
