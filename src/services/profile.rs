// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Protected profile endpoints, reached through the session manager.

use crate::error::{AppError, Result};
use crate::models::{ApiErrorBody, Profile, ProfileUpdate};
use crate::services::session::{paths, RequestOptions, SessionManager};
use reqwest::Method;
use std::sync::Arc;

/// Profile API client. `AppError::SessionExpired` is passed through so the
/// caller can send the user back to login.
#[derive(Clone)]
pub struct ProfileClient {
    session: Arc<SessionManager>,
}

impl ProfileClient {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    pub async fn get_profile(&self) -> Result<Profile> {
        let response = self
            .session
            .authenticated_fetch(paths::PROFILE, RequestOptions::default())
            .await?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Profile fetch failed");
            return Err(AppError::Server("Failed to fetch profile data".to_string()));
        }

        Ok(response.json().await?)
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<()> {
        let options = RequestOptions::json(Method::PUT, update)?;
        let response = self
            .session
            .authenticated_fetch(paths::PROFILE_UPDATE, options)
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Profile update failed");
            return Err(AppError::Server(
                ApiErrorBody::parse(&body).message_or("Failed to update profile"),
            ));
        }

        tracing::info!("Profile updated");
        Ok(())
    }
}
