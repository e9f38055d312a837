//! Storage abstractions for the upper-air admin tools.
//!
//! Provides unified interfaces for:
//! - PostgreSQL for station and report counts and samples
//! - Redis (or a no-op backend) for the application cache
//! - Declarative schema migrations and the ledger that records them

pub mod cache;
pub mod catalog;
pub mod migrations;

pub use cache::{open_cache, CacheBackend, DummyCache, KeyListing, RedisCache};
pub use catalog::{Catalog, ObservationStore};
pub use migrations::{Migration, MigrationRunner, Operation, PlanStep};
