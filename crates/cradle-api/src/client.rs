//! Authenticated REST client for the health endpoints.

use std::sync::Arc;
use std::time::Duration;

use cradle_auth::CredentialProvider;
use cradle_core::HealthReading;
use serde::Deserialize;
use tracing::debug;

use crate::errors::{ApiError, Result};
use crate::types::{HealthStats, HistoryQuery, TimeSeriesPoint};

/// List endpoints wrap their records in a `data` field.
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
}

/// Client for the `/health/*` endpoints.
pub struct HealthApi {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl HealthApi {
    /// Create a client for the given API base URL.
    pub fn new(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            credentials,
        })
    }

    /// The most recent reading.
    pub async fn latest(&self) -> Result<HealthReading> {
        self.get_json("/health/latest", &[]).await
    }

    /// Historical readings, filtered by the query.
    pub async fn history(&self, query: &HistoryQuery) -> Result<Vec<HealthReading>> {
        let response: ListResponse<HealthReading> =
            self.get_json("/health/history", &query.to_params()).await?;
        Ok(response.data)
    }

    /// Aggregate statistics over all readings.
    pub async fn stats(&self) -> Result<HealthStats> {
        self.get_json("/health/stats", &[]).await
    }

    /// Bucketed chart series, e.g. `interval = "1 hour"`.
    pub async fn time_series(&self, interval: &str) -> Result<Vec<TimeSeriesPoint>> {
        let params = [("interval", interval.to_string())];
        let response: ListResponse<TimeSeriesPoint> =
            self.get_json("/health/timeseries", &params).await?;
        Ok(response.data)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let token = self.credentials.token().await?;
        debug!(path, "health api request");
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .query(params)
            .bearer_auth(token)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
