//! # cradle-api
//!
//! REST pass-throughs over the health endpoints: latest reading, history,
//! aggregate statistics, and chart time-series. Each call is a simple
//! authenticated request/response; no caching or retry logic lives here.

#![deny(unsafe_code)]

pub mod client;
pub mod errors;
pub mod types;

pub use client::HealthApi;
pub use errors::{ApiError, Result};
pub use types::{HealthStats, HistoryQuery, TimeSeriesPoint};
