// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Key-value persistence for the session and favorites.
//!
//! Values are plain strings, mirroring browser origin storage. The store is
//! shared mutable state without locking across keys: last writer wins.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Persisted key names.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "accessToken";
    pub const REFRESH_TOKEN: &str = "refreshToken";
    pub const USERNAME: &str = "username";
    /// JSON array of favorite country records
    pub const FAVORITES: &str = "favorites";
}

/// String-valued key-value store durable for the lifetime of the backend.
pub trait KeyValueStore: Send + Sync {
    /// Read a key, `None` if it was never set or has been removed.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a key, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
