//! Read access to upper-air stations and reports in PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use std::time::Duration;
use tracing::{debug, instrument};

use upperair_common::{
    AdminError, AdminResult, LevelCount, ObservationTimeCount, ReportSample, WeatherStation,
};

/// Read-only queries the data check report needs.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    async fn count_stations(&self) -> AdminResult<u64>;

    /// First `limit` stations in insertion order.
    async fn sample_stations(&self, limit: usize) -> AdminResult<Vec<WeatherStation>>;

    async fn count_reports(&self) -> AdminResult<u64>;

    /// Report counts grouped by level, ascending by level code.
    async fn reports_by_level(&self) -> AdminResult<Vec<LevelCount>>;

    /// Report counts for the `limit` most recent distinct observation times,
    /// newest first.
    async fn recent_observation_times(&self, limit: usize)
        -> AdminResult<Vec<ObservationTimeCount>>;

    /// First `limit` reports joined with their station code.
    async fn sample_reports(&self, limit: usize) -> AdminResult<Vec<ReportSample>>;
}

/// Database connection pool for the web application's tables.
pub struct Catalog {
    pool: PgPool,
}

impl Catalog {
    /// Create a new catalog connection from database URL.
    pub async fn connect(database_url: &str) -> AdminResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await
            .map_err(|e| AdminError::DatabaseError(format!("Connection failed: {}", e)))?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ObservationStore for Catalog {
    #[instrument(skip(self))]
    async fn count_stations(&self) -> AdminResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM analysis_upperairweatherstation",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AdminError::DatabaseError(format!("Query failed: {}", e)))?;

        debug!(count, "Counted stations");
        Ok(count as u64)
    }

    #[instrument(skip(self))]
    async fn sample_stations(&self, limit: usize) -> AdminResult<Vec<WeatherStation>> {
        let rows = sqlx::query_as::<_, StationRow>(
            "SELECT station_id, name FROM analysis_upperairweatherstation \
             ORDER BY id LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AdminError::DatabaseError(format!("Query failed: {}", e)))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    #[instrument(skip(self))]
    async fn count_reports(&self) -> AdminResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM analysis_upperairsynopreport",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AdminError::DatabaseError(format!("Query failed: {}", e)))?;

        debug!(count, "Counted reports");
        Ok(count as u64)
    }

    #[instrument(skip(self))]
    async fn reports_by_level(&self) -> AdminResult<Vec<LevelCount>> {
        let rows = sqlx::query_as::<_, LevelCountRow>(
            "SELECT level, COUNT(*) AS count FROM analysis_upperairsynopreport \
             GROUP BY level ORDER BY level ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AdminError::DatabaseError(format!("Query failed: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|r| LevelCount {
                level: r.level,
                count: r.count as u64,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn recent_observation_times(
        &self,
        limit: usize,
    ) -> AdminResult<Vec<ObservationTimeCount>> {
        let rows = sqlx::query_as::<_, TimeCountRow>(
            "SELECT observation_time, COUNT(*) AS count FROM analysis_upperairsynopreport \
             GROUP BY observation_time ORDER BY observation_time DESC LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AdminError::DatabaseError(format!("Query failed: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|r| ObservationTimeCount {
                observation_time: r.observation_time,
                count: r.count as u64,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn sample_reports(&self, limit: usize) -> AdminResult<Vec<ReportSample>> {
        let rows = sqlx::query_as::<_, ReportRow>(
            "SELECT s.station_id, r.level, r.observation_time, r.temperature, r.height \
             FROM analysis_upperairsynopreport r \
             JOIN analysis_upperairweatherstation s ON s.id = r.station_id \
             ORDER BY r.id LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AdminError::DatabaseError(format!("Query failed: {}", e)))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}

// Internal row types for database queries.

#[derive(FromRow)]
struct StationRow {
    station_id: String,
    name: String,
}

impl From<StationRow> for WeatherStation {
    fn from(row: StationRow) -> Self {
        WeatherStation {
            station_id: row.station_id,
            name: row.name,
        }
    }
}

#[derive(FromRow)]
struct LevelCountRow {
    level: String,
    count: i64,
}

#[derive(FromRow)]
struct TimeCountRow {
    observation_time: DateTime<Utc>,
    count: i64,
}

#[derive(FromRow)]
struct ReportRow {
    station_id: String,
    level: String,
    observation_time: DateTime<Utc>,
    temperature: Option<f64>,
    height: Option<f64>,
}

impl From<ReportRow> for ReportSample {
    fn from(row: ReportRow) -> Self {
        ReportSample {
            station_id: row.station_id,
            level: row.level,
            observation_time: row.observation_time,
            temperature: row.temperature,
            height: row.height,
        }
    }
}
