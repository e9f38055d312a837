//! Shared test utilities for the upper-air admin workspace.
//!
//! This crate provides common testing infrastructure including:
//! - In-memory stand-ins for the observation store and the cache
//! - Station and report fixtures
//! - A skip macro for tests that need a live PostgreSQL
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, MemoryCache, MemoryStore};
//! ```

pub mod fakes;
pub mod fixtures;

pub use fakes::*;
pub use fixtures::*;

/// Environment variable holding the URL of a disposable test database.
pub const TEST_DATABASE_URL_VAR: &str = "TEST_DATABASE_URL";

/// Macro to skip a test if no test database is configured.
///
/// Tests that write to the database must only ever run against a disposable
/// instance, so the regular `DATABASE_URL` is never used here.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_database;
///
/// #[tokio::test]
/// async fn test_counts() {
///     let url = require_database!();
///     // Test code using url...
/// }
/// ```
#[macro_export]
macro_rules! require_database {
    () => {{
        match std::env::var($crate::TEST_DATABASE_URL_VAR) {
            Ok(url) if !url.is_empty() => url,
            _ => {
                eprintln!(
                    "SKIPPED: {} not set. Point it at a disposable PostgreSQL database.",
                    $crate::TEST_DATABASE_URL_VAR
                );
                return;
            }
        }
    }};
}
