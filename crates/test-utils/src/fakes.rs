//! In-memory implementations of the storage seams.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use storage::{CacheBackend, KeyListing, ObservationStore};
use upperair_common::{
    AdminError, AdminResult, LevelCount, ObservationTimeCount, ReportSample, WeatherStation,
};

/// Observation store backed by vectors, grouping the way the SQL does.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub stations: Vec<WeatherStation>,
    pub reports: Vec<ReportSample>,
}

impl MemoryStore {
    pub fn new(stations: Vec<WeatherStation>, reports: Vec<ReportSample>) -> Self {
        Self { stations, reports }
    }
}

#[async_trait]
impl ObservationStore for MemoryStore {
    async fn count_stations(&self) -> AdminResult<u64> {
        Ok(self.stations.len() as u64)
    }

    async fn sample_stations(&self, limit: usize) -> AdminResult<Vec<WeatherStation>> {
        Ok(self.stations.iter().take(limit).cloned().collect())
    }

    async fn count_reports(&self) -> AdminResult<u64> {
        Ok(self.reports.len() as u64)
    }

    async fn reports_by_level(&self) -> AdminResult<Vec<LevelCount>> {
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for report in &self.reports {
            *counts.entry(report.level.as_str()).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(level, count)| LevelCount {
                level: level.to_string(),
                count,
            })
            .collect())
    }

    async fn recent_observation_times(
        &self,
        limit: usize,
    ) -> AdminResult<Vec<ObservationTimeCount>> {
        let mut counts: BTreeMap<DateTime<Utc>, u64> = BTreeMap::new();
        for report in &self.reports {
            *counts.entry(report.observation_time).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .rev()
            .take(limit)
            .map(|(observation_time, count)| ObservationTimeCount {
                observation_time,
                count,
            })
            .collect())
    }

    async fn sample_reports(&self, limit: usize) -> AdminResult<Vec<ReportSample>> {
        Ok(self.reports.iter().take(limit).cloned().collect())
    }
}

/// Store whose every query fails, for error propagation tests.
#[derive(Debug, Clone)]
pub struct FailingStore {
    pub message: String,
}

impl FailingStore {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn error(&self) -> AdminError {
        AdminError::DatabaseError(self.message.clone())
    }
}

#[async_trait]
impl ObservationStore for FailingStore {
    async fn count_stations(&self) -> AdminResult<u64> {
        Err(self.error())
    }

    async fn sample_stations(&self, _limit: usize) -> AdminResult<Vec<WeatherStation>> {
        Err(self.error())
    }

    async fn count_reports(&self) -> AdminResult<u64> {
        Err(self.error())
    }

    async fn reports_by_level(&self) -> AdminResult<Vec<LevelCount>> {
        Err(self.error())
    }

    async fn recent_observation_times(
        &self,
        _limit: usize,
    ) -> AdminResult<Vec<ObservationTimeCount>> {
        Err(self.error())
    }

    async fn sample_reports(&self, _limit: usize) -> AdminResult<Vec<ReportSample>> {
        Err(self.error())
    }
}

/// How a `MemoryCache` answers key listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingMode {
    Supported,
    Unsupported,
    Fails(String),
}

/// Cache that records how often it was cleared.
#[derive(Debug)]
pub struct MemoryCache {
    keys: Mutex<Vec<String>>,
    listing: ListingMode,
    clear_error: Option<String>,
    clears: AtomicUsize,
}

impl MemoryCache {
    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: Mutex::new(keys.into_iter().map(Into::into).collect()),
            listing: ListingMode::Supported,
            clear_error: None,
            clears: AtomicUsize::new(0),
        }
    }

    pub fn without_listing() -> Self {
        Self {
            listing: ListingMode::Unsupported,
            ..Self::with_keys(Vec::<String>::new())
        }
    }

    pub fn with_listing_error(message: impl Into<String>) -> Self {
        Self {
            listing: ListingMode::Fails(message.into()),
            ..Self::with_keys(Vec::<String>::new())
        }
    }

    pub fn with_clear_error(mut self, message: impl Into<String>) -> Self {
        self.clear_error = Some(message.into());
        self
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.keys.lock().map(|k| k.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `*` matches everything, a trailing `*` matches a prefix.
fn glob_match(pattern: &str, key: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => pattern == key,
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list_keys(&self, pattern: &str) -> AdminResult<KeyListing> {
        match &self.listing {
            ListingMode::Unsupported => Ok(KeyListing::Unsupported),
            ListingMode::Fails(message) => Err(AdminError::CacheError(message.clone())),
            ListingMode::Supported => {
                let keys = self
                    .keys
                    .lock()
                    .map_err(|e| AdminError::CacheError(e.to_string()))?;
                let mut matching: Vec<String> = keys
                    .iter()
                    .filter(|k| glob_match(pattern, k))
                    .cloned()
                    .collect();
                matching.sort();
                Ok(KeyListing::Keys(matching))
            }
        }
    }

    async fn clear(&self) -> AdminResult<()> {
        if let Some(message) = &self.clear_error {
            return Err(AdminError::CacheError(message.clone()));
        }

        self.keys
            .lock()
            .map_err(|e| AdminError::CacheError(e.to_string()))?
            .clear();
        self.clears.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
