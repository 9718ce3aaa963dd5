//! # Gigboard Shared Library
//!
//! Shared types and business logic for the gigboard task-marketplace
//! backend, used by the API server and its tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, tasks) and their store operations
//! - `auth`: Password hashing, session tokens, and the auth middleware
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the gigboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
