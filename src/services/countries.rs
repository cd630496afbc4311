// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Country data API client.
//!
//! Read-only and unauthenticated. Listing and detail lookups propagate
//! failures; search and region filters degrade to an empty list so a bad
//! query never breaks the listing.

use crate::error::{AppError, Result};
use crate::models::Country;
use serde::de::DeserializeOwned;

/// Country data API client.
#[derive(Clone)]
pub struct CountriesClient {
    http: reqwest::Client,
    base_url: String,
}

impl CountriesClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// All countries.
    pub async fn get_all_countries(&self) -> Result<Vec<Country>> {
        let url = format!("{}/all", self.base_url);
        self.get_json(&url).await.inspect_err(|e| {
            tracing::error!(error = %e, "Error fetching all countries");
        })
    }

    /// A single country by its 3-letter code.
    pub async fn get_country_by_code(&self, code: &str) -> Result<Country> {
        let url = format!("{}/alpha/{}", self.base_url, urlencoding::encode(code));
        let countries: Vec<Country> = self.get_json(&url).await.inspect_err(|e| {
            tracing::error!(code, error = %e, "Error fetching country by code");
        })?;

        countries
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Country {}", code)))
    }

    /// Countries whose name contains `name`. Empty on any failure.
    pub async fn search_countries(&self, name: &str) -> Vec<Country> {
        let url = format!("{}/name/{}", self.base_url, urlencoding::encode(name));
        self.get_json(&url).await.unwrap_or_else(|e| {
            tracing::warn!(query = name, error = %e, "Country search failed");
            Vec::new()
        })
    }

    /// Countries in `region`. Empty on any failure.
    pub async fn get_countries_by_region(&self, region: &str) -> Vec<Country> {
        let url = format!("{}/region/{}", self.base_url, urlencoding::encode(region));
        self.get_json(&url).await.unwrap_or_else(|e| {
            tracing::warn!(region, error = %e, "Region lookup failed");
            Vec::new()
        })
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Server(format!("HTTP {}: {}", status, body)));
        }

        Ok(response.json().await?)
    }
}

/// Listing filters. A search term takes precedence over a region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryQuery {
    pub search: Option<String>,
    pub region: Option<String>,
}

/// Which upstream listing a query resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountrySource<'a> {
    Search(&'a str),
    Region(&'a str),
    All,
}

impl CountryQuery {
    pub fn source(&self) -> CountrySource<'_> {
        fn non_empty(value: &Option<String>) -> Option<&str> {
            value.as_deref().map(str::trim).filter(|s| !s.is_empty())
        }

        if let Some(search) = non_empty(&self.search) {
            CountrySource::Search(search)
        } else if let Some(region) = non_empty(&self.region) {
            CountrySource::Region(region)
        } else {
            CountrySource::All
        }
    }

    /// Fetch the listing this query selects.
    pub async fn fetch(&self, client: &CountriesClient) -> Result<Vec<Country>> {
        match self.source() {
            CountrySource::Search(name) => Ok(client.search_countries(name).await),
            CountrySource::Region(region) => Ok(client.get_countries_by_region(region).await),
            CountrySource::All => client.get_all_countries().await,
        }
    }
}
