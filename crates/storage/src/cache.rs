//! Application cache backends.
//!
//! The admin tools only enumerate and flush the cache; entries are written by
//! the web application.

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, Client};
use tracing::{debug, info, instrument};

use upperair_common::{AdminError, AdminResult};

/// Result of asking a backend for its keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyListing {
    /// The backend cannot enumerate keys.
    Unsupported,
    /// Matching keys, sorted.
    Keys(Vec<String>),
}

/// A cache store the admin tools can flush.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// List keys matching a glob-style pattern.
    ///
    /// Backends without enumeration return `KeyListing::Unsupported` rather
    /// than an error.
    async fn list_keys(&self, pattern: &str) -> AdminResult<KeyListing>;

    /// Remove every entry in the store.
    async fn clear(&self) -> AdminResult<()>;
}

/// Open the backend named by a cache URL.
///
/// `redis://` and `rediss://` connect to Redis, `dummy://` selects the no-op
/// backend. `key_prefix` is the web application's cache key prefix.
pub async fn open_cache(cache_url: &str, key_prefix: &str) -> AdminResult<Box<dyn CacheBackend>> {
    let scheme = cache_url.split("://").next().unwrap_or_default();

    match scheme {
        "redis" | "rediss" => Ok(Box::new(
            RedisCache::connect(cache_url).await?.with_key_prefix(key_prefix),
        )),
        "dummy" => Ok(Box::new(DummyCache)),
        _ => Err(AdminError::ConfigError(format!(
            "Unsupported cache URL scheme '{}' in {}",
            scheme, cache_url
        ))),
    }
}

/// Key version the web application writes with.
const DEFAULT_KEY_VERSION: u32 = 1;

/// Redis cache client.
///
/// The web application stores entries as `{prefix}:{version}:{key}`. Listing
/// only matches that namespace and reports the bare keys; clearing flushes
/// the whole database.
pub struct RedisCache {
    conn: MultiplexedConnection,
    scan_count: usize,
    key_prefix: String,
    key_version: u32,
}

impl RedisCache {
    /// Connect to Redis.
    pub async fn connect(redis_url: &str) -> AdminResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| AdminError::CacheError(format!("Redis connection failed: {}", e)))?;

        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AdminError::CacheError(format!("Redis connection failed: {}", e)))?;

        Ok(Self {
            conn,
            scan_count: 1000,
            key_prefix: String::new(),
            key_version: DEFAULT_KEY_VERSION,
        })
    }

    pub fn with_key_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }
}

/// SCAN pattern for application keys matching `pattern`.
fn namespaced_pattern(key_prefix: &str, version: u32, pattern: &str) -> String {
    format!("{}:{}:{}", key_prefix, version, pattern)
}

/// The application key inside a raw Redis key, if it belongs to the namespace.
fn application_key<'k>(key_prefix: &str, version: u32, raw: &'k str) -> Option<&'k str> {
    raw.strip_prefix(key_prefix)?
        .strip_prefix(':')?
        .strip_prefix(version.to_string().as_str())?
        .strip_prefix(':')
}

#[async_trait]
impl CacheBackend for RedisCache {
    fn name(&self) -> &str {
        "redis"
    }

    /// Walks the keyspace with SCAN.
    #[instrument(skip(self))]
    async fn list_keys(&self, pattern: &str) -> AdminResult<KeyListing> {
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();
        let matcher = namespaced_pattern(&self.key_prefix, self.key_version, pattern);

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&matcher)
                .arg("COUNT")
                .arg(self.scan_count)
                .query_async(&mut conn)
                .await
                .map_err(|e| AdminError::CacheError(format!("Key scan failed: {}", e)))?;

            keys.extend(batch.iter().filter_map(|raw| {
                application_key(&self.key_prefix, self.key_version, raw).map(str::to_string)
            }));
            if next == 0 {
                break;
            }
            cursor = next;
        }

        // SCAN may return a key more than once while the keyspace is rehashing
        keys.sort();
        keys.dedup();
        debug!(count = keys.len(), "Scanned cache keys");

        Ok(KeyListing::Keys(keys))
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> AdminResult<()> {
        let mut conn = self.conn.clone();

        let _: () = redis::cmd("FLUSHDB")
            .query_async(&mut conn)
            .await
            .map_err(|e| AdminError::CacheError(format!("Cache clear failed: {}", e)))?;

        info!("Flushed Redis database");
        Ok(())
    }
}

/// Cache that stores nothing, for deployments running without a cache.
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyCache;

#[async_trait]
impl CacheBackend for DummyCache {
    fn name(&self) -> &str {
        "dummy"
    }

    async fn list_keys(&self, _pattern: &str) -> AdminResult<KeyListing> {
        Ok(KeyListing::Unsupported)
    }

    async fn clear(&self) -> AdminResult<()> {
        Ok(())
    }
}
