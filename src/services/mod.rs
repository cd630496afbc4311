// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - client logic layer.

pub mod countries;
pub mod favorites;
pub mod profile;
pub mod session;
pub mod token;

pub use countries::{CountriesClient, CountryQuery, CountrySource};
pub use favorites::Favorites;
pub use profile::ProfileClient;
pub use session::{
    RefreshOutcome, RegistrationReceipt, RequestOptions, SessionManager, LOGIN_ROUTE,
};
