// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Session model derived from persisted tokens.

use serde::{Deserialize, Serialize};

/// Authenticated identity. Absent when logged out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Username the tokens were issued to
    pub username: String,
    /// Short-lived bearer token (JWT)
    #[serde(skip_serializing)]
    pub access_token: String,
    /// Long-lived token used only to mint new access tokens.
    /// May be missing after an optimistic restore.
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
}

/// Observable session state for UI consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub session: Option<Session>,
    /// True only while the persisted session is being restored.
    pub loading: bool,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}
