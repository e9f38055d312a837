//! `clear_cache` - optionally list, then flush, the application cache.

use std::io::Write;
use tracing::{info, instrument, warn};

use storage::{CacheBackend, KeyListing};
use upperair_common::AdminResult;

use crate::output::Output;

/// Keys printed before the remainder is summarized.
pub const KEY_DISPLAY_LIMIT: usize = 20;

/// Lines printed after a successful clear.
///
/// The flush is a single operation over the whole store; these name the
/// data operators usually care about, they are not separate steps.
pub const CLEARED_REGIONS: [&str; 4] = [
    "Upper air observation times cache cleared",
    "Surface observation times cache cleared",
    "Available levels cache cleared",
    "All other cached data cleared",
];

/// What happened during a clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearReport {
    /// Keys found before clearing, when they were listed
    pub keys_found: Option<usize>,
}

/// List keys if asked, then clear the whole cache.
///
/// Listing problems are reported as warnings; a failed clear is returned.
#[instrument(skip(cache, out), fields(backend = cache.name()))]
pub async fn run<W: Write>(
    cache: &dyn CacheBackend,
    show_keys: bool,
    out: &mut Output<W>,
) -> AdminResult<ClearReport> {
    let keys_found = if show_keys {
        list_keys(cache, out).await?
    } else {
        None
    };

    out.line("Clearing all cache...")?;
    cache.clear().await?;
    info!("Cache cleared");

    out.success("✓ Cache cleared successfully!")?;
    for region in CLEARED_REGIONS {
        out.success(format!("  - {}", region))?;
    }

    Ok(ClearReport { keys_found })
}

/// Print the key listing. Only output errors are returned.
async fn list_keys<W: Write>(
    cache: &dyn CacheBackend,
    out: &mut Output<W>,
) -> AdminResult<Option<usize>> {
    match cache.list_keys("*").await {
        Ok(KeyListing::Unsupported) => {
            out.warning("Cache backend does not support key listing")?;
            Ok(None)
        }
        Ok(KeyListing::Keys(keys)) if keys.is_empty() => {
            out.warning("No cache keys found")?;
            Ok(Some(0))
        }
        Ok(KeyListing::Keys(keys)) => {
            out.warning(format!("Found {} cached items:", keys.len()))?;
            for key in keys.iter().take(KEY_DISPLAY_LIMIT) {
                out.line(format!("  - {}", key))?;
            }
            if keys.len() > KEY_DISPLAY_LIMIT {
                out.line(format!("  ... and {} more", keys.len() - KEY_DISPLAY_LIMIT))?;
            }
            Ok(Some(keys.len()))
        }
        Err(e) => {
            warn!(error = %e, "Key listing failed");
            out.warning(format!("Could not list cache keys: {}", e))?;
            Ok(None)
        }
    }
}
