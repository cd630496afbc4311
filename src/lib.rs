// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Countries Explorer: browse country data with an authenticated profile.
//!
//! This crate provides the client side: a session manager that keeps an
//! access/refresh token pair alive across requests, a country data API
//! client, and a locally persisted favorites list.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod time_utils;

use config::Config;
use services::{CountriesClient, Favorites, ProfileClient, SessionManager};
use std::sync::Arc;
use store::KeyValueStore;

/// Shared application state, one per application instance.
pub struct AppState {
    pub config: Config,
    pub session: Arc<SessionManager>,
    pub profile: ProfileClient,
    pub countries: CountriesClient,
    pub favorites: Favorites,
}

impl AppState {
    /// Wire every component over one store and restore any persisted session.
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>) -> Self {
        let session = Arc::new(SessionManager::new(config.clone(), store.clone()));
        session.restore();

        Self {
            profile: ProfileClient::new(session.clone()),
            countries: CountriesClient::new(config.countries_base_url.clone()),
            favorites: Favorites::load(store),
            session,
            config,
        }
    }
}
