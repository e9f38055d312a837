//! Trigger for the web application's upper-air fetch task.
//!
//! The task normally runs on the application's background scheduler. The
//! admin tool asks the task runner to execute it immediately and waits for
//! the result.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use upperair_common::AdminError;

/// Name of the fetch task in the task runner.
pub const FETCH_TASK_NAME: &str = "fetch_upper_air_data";

/// Result reported by the task runner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub stations_saved: Option<u64>,
    #[serde(default)]
    pub reports_saved: Option<u64>,
}

/// Runs the upper-air fetch to completion.
#[async_trait]
pub trait UpperAirFetch: Send + Sync {
    async fn fetch(&self) -> Result<FetchOutcome>;
}

/// Request body sent to the task runner.
#[derive(Debug, Serialize)]
struct TaskRequest<'a> {
    task: &'a str,
    request_id: String,
    synchronous: bool,
}

/// Calls `POST {task_runner_url}/fetch_upper_air_data` and waits.
pub struct HttpTaskTrigger {
    client: Client,
    endpoint: String,
}

impl HttpTaskTrigger {
    pub fn new(task_runner_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/{}", task_runner_url.trim_end_matches('/'), FETCH_TASK_NAME),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl UpperAirFetch for HttpTaskTrigger {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch(&self) -> Result<FetchOutcome> {
        let request = TaskRequest {
            task: FETCH_TASK_NAME,
            request_id: Uuid::new_v4().to_string(),
            synchronous: true,
        };
        info!(request_id = %request.request_id, "Triggering upper air fetch");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| AdminError::TaskUnavailable(format!("{}: {}", self.endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdminError::TaskFailed {
                task: FETCH_TASK_NAME.to_string(),
                message: format!("HTTP {}: {}", status, body.trim()),
            }
            .into());
        }

        let outcome: FetchOutcome = response
            .json()
            .await
            .context("Task runner returned an unreadable response")?;
        debug!(?outcome, "Task runner responded");

        if !outcome.success {
            return Err(AdminError::TaskFailed {
                task: FETCH_TASK_NAME.to_string(),
                message: outcome
                    .message
                    .unwrap_or_else(|| "task reported failure".to_string()),
            }
            .into());
        }

        Ok(outcome)
    }
}
