// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod auth;
pub mod country;
pub mod profile;
pub mod session;

pub use auth::{
    ApiErrorBody, LoginRequest, RefreshRequest, RefreshResponse, RegisterRequest,
    RegistrationForm, TokenPair,
};
pub use country::{Country, CountryName, Currency, Flags};
pub use profile::{Profile, ProfileUpdate};
pub use session::{Session, SessionState};
