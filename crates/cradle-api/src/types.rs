//! Response and query shapes for the health endpoints.

use serde::{Deserialize, Serialize};

/// Aggregate statistics over all recorded readings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthStats {
    /// Total readings recorded.
    pub total_records: u64,
    /// Readings where cry detection fired.
    pub cry_detected_count: u64,
    /// Readings where sickness detection fired.
    pub sick_detected_count: u64,
    /// Mean temperature across readings.
    pub avg_temperature: f64,
    /// Mean humidity across readings.
    pub avg_humidity: f64,
}

/// One bucket of the chart time-series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Bucket start, server-formatted.
    pub time: String,
    /// Mean temperature in the bucket.
    pub avg_temperature: f64,
    /// Mean humidity in the bucket.
    pub avg_humidity: f64,
    /// Readings in the bucket.
    pub record_count: u64,
    /// Cry detections in the bucket.
    pub cry_count: u64,
    /// Sickness detections in the bucket.
    pub sick_count: u64,
}

/// Filters for the history endpoint.
#[derive(Clone, Debug, Default)]
pub struct HistoryQuery {
    /// Maximum records to return.
    pub limit: Option<u32>,
    /// Records to skip.
    pub offset: Option<u32>,
    /// Only readings with this cry-detection state.
    pub cry_detected: Option<bool>,
    /// Only readings with this sickness-detection state.
    pub sick_detected: Option<bool>,
}

impl HistoryQuery {
    /// Render the set query parameters as key/value pairs.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset", offset.to_string()));
        }
        if let Some(cry) = self.cry_detected {
            params.push(("cry_detected", cry.to_string()));
        }
        if let Some(sick) = self.sick_detected {
            params.push(("sick_detected", sick.to_string()));
        }
        params
    }
}
