//! Tests for the cache clearing command.

use storage::DummyCache;
use test_utils::MemoryCache;
use upperair_admin::commands::clear_cache::{self, CLEARED_REGIONS, KEY_DISPLAY_LIMIT};
use upperair_admin::Output;
use upperair_common::AdminError;

fn assert_cleared_checklist(text: &str) {
    assert!(text.contains("Clearing all cache..."));
    assert!(text.contains("✓ Cache cleared successfully!"));
    for region in CLEARED_REGIONS {
        assert!(text.contains(region), "missing checklist line: {}", region);
    }
}

#[tokio::test]
async fn test_clear_without_listing() {
    let cache = MemoryCache::with_keys(["upperair:times", "surface:times"]);
    let mut out = Output::buffer();

    let report = clear_cache::run(&cache, false, &mut out).await.unwrap();

    assert_eq!(report.keys_found, None);
    assert_eq!(cache.clear_count(), 1);
    assert!(cache.is_empty());
    let text = out.text();
    assert!(!text.contains("cached items"));
    assert_cleared_checklist(&text);
}

#[tokio::test]
async fn test_lists_keys_before_clearing() {
    let cache = MemoryCache::with_keys(["upperair:times", "upperair:levels", "surface:times"]);
    let mut out = Output::buffer();

    let report = clear_cache::run(&cache, true, &mut out).await.unwrap();

    assert_eq!(report.keys_found, Some(3));
    let text = out.text();
    assert!(text.contains("Found 3 cached items:"));
    assert!(text.contains("  - upperair:levels"));
    assert!(!text.contains("more"));

    // Listing comes before the clear
    let listed = text.find("Found 3 cached items:").unwrap();
    let cleared = text.find("Clearing all cache...").unwrap();
    assert!(listed < cleared);
    assert_eq!(cache.clear_count(), 1);
}

#[tokio::test]
async fn test_listing_truncated_after_twenty_keys() {
    let keys: Vec<String> = (0..25).map(|i| format!("views.decorators.cache:{:02}", i)).collect();
    let cache = MemoryCache::with_keys(keys);
    let mut out = Output::buffer();

    clear_cache::run(&cache, true, &mut out).await.unwrap();

    let text = out.text();
    assert!(text.contains("Found 25 cached items:"));
    let shown = text
        .lines()
        .filter(|l| l.starts_with("  - views.decorators.cache:"))
        .count();
    assert_eq!(shown, KEY_DISPLAY_LIMIT);
    assert!(text.contains("  - views.decorators.cache:19"));
    assert!(!text.contains("  - views.decorators.cache:20"));
    assert!(text.contains("  ... and 5 more"));
}

#[tokio::test]
async fn test_exactly_twenty_keys_has_no_remainder_line() {
    let cache = MemoryCache::with_keys((0..20).map(|i| format!("k{:02}", i)));
    let mut out = Output::buffer();

    clear_cache::run(&cache, true, &mut out).await.unwrap();

    assert!(!out.text().contains("... and"));
}

#[tokio::test]
async fn test_empty_cache_listing() {
    let cache = MemoryCache::with_keys(Vec::<String>::new());
    let mut out = Output::buffer();

    let report = clear_cache::run(&cache, true, &mut out).await.unwrap();

    assert_eq!(report.keys_found, Some(0));
    assert!(out.text().contains("No cache keys found"));
    assert_eq!(cache.clear_count(), 1);
}

#[tokio::test]
async fn test_backend_without_listing_still_clears() {
    let cache = MemoryCache::without_listing();
    let mut out = Output::buffer();

    let report = clear_cache::run(&cache, true, &mut out).await.unwrap();

    assert_eq!(report.keys_found, None);
    let text = out.text();
    assert!(text.contains("Cache backend does not support key listing"));
    assert_cleared_checklist(&text);
    assert_eq!(cache.clear_count(), 1);
}

#[tokio::test]
async fn test_dummy_backend_without_listing() {
    let mut out = Output::buffer();

    clear_cache::run(&DummyCache, true, &mut out).await.unwrap();

    let text = out.text();
    assert!(text.contains("Cache backend does not support key listing"));
    assert_cleared_checklist(&text);
}

#[tokio::test]
async fn test_listing_error_is_a_warning() {
    let cache = MemoryCache::with_listing_error("NOPERM this user has no permissions to run the 'scan' command");
    let mut out = Output::buffer();

    let report = clear_cache::run(&cache, true, &mut out).await.unwrap();

    assert_eq!(report.keys_found, None);
    let text = out.text();
    assert!(text.contains("Could not list cache keys:"));
    assert!(text.contains("NOPERM this user has no permissions"));
    assert_cleared_checklist(&text);
    assert_eq!(cache.clear_count(), 1);
}

#[tokio::test]
async fn test_clear_failure_propagates() {
    let cache = MemoryCache::with_keys(["a"]).with_clear_error("READONLY You can't write against a read only replica.");
    let mut out = Output::buffer();

    let err = clear_cache::run(&cache, false, &mut out).await.unwrap_err();

    assert!(matches!(err, AdminError::CacheError(_)));
    let text = out.text();
    assert!(text.contains("Clearing all cache..."));
    assert!(!text.contains("Cache cleared successfully"));
}
