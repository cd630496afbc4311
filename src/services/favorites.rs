// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorite countries, kept locally and never synced to a server.

use crate::error::{AppError, Result};
use crate::models::Country;
use crate::store::{keys, KeyValueStore};
use std::sync::{Arc, Mutex};

/// Ordered set of favorite countries keyed by `cca3`.
///
/// Insertion order is the display order. Every mutation is written through
/// to the store under `favorites`.
pub struct Favorites {
    store: Arc<dyn KeyValueStore>,
    countries: Mutex<Vec<Country>>,
}

impl Favorites {
    /// Load favorites from the store. A corrupted entry starts an empty list.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let countries = store
            .get(keys::FAVORITES)
            .and_then(|raw| match serde_json::from_str::<Vec<Country>>(&raw) {
                Ok(list) => Some(list),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unreadable favorites");
                    None
                }
            })
            .unwrap_or_default();

        Self {
            store,
            countries: Mutex::new(countries),
        }
    }

    pub fn is_favorite(&self, code: &str) -> bool {
        self.with_list(|list| list.iter().any(|c| c.cca3 == code))
    }

    pub fn list(&self) -> Vec<Country> {
        self.with_list(|list| list.clone())
    }

    pub fn len(&self) -> usize {
        self.with_list(|list| list.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add a country. Returns false if it was already a favorite.
    pub fn add(&self, country: Country) -> Result<bool> {
        self.mutate(|list| {
            if list.iter().any(|c| c.cca3 == country.cca3) {
                return false;
            }
            list.push(country);
            true
        })
    }

    /// Remove a country by code. Returns false if it was not a favorite.
    pub fn remove(&self, code: &str) -> Result<bool> {
        self.mutate(|list| {
            let before = list.len();
            list.retain(|c| c.cca3 != code);
            list.len() != before
        })
    }

    /// Flip membership and return whether the country is now a favorite.
    pub fn toggle(&self, country: Country) -> Result<bool> {
        self.mutate(|list| match list.iter().position(|c| c.cca3 == country.cca3) {
            Some(idx) => {
                list.remove(idx);
                false
            }
            None => {
                list.push(country);
                true
            }
        })
    }

    fn with_list<T>(&self, f: impl FnOnce(&Vec<Country>) -> T) -> T {
        let list = self.countries.lock().unwrap_or_else(|e| e.into_inner());
        f(&list)
    }

    fn mutate(&self, f: impl FnOnce(&mut Vec<Country>) -> bool) -> Result<bool> {
        let mut list = self.countries.lock().unwrap_or_else(|e| e.into_inner());
        let changed = f(&mut list);
        if changed {
            let raw = serde_json::to_string(&*list)
                .map_err(|e| AppError::Storage(format!("Failed to encode favorites: {}", e)))?;
            self.store.set(keys::FAVORITES, &raw)?;
        }
        Ok(changed)
    }
}
