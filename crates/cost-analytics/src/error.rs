//! Cost analytics error types
//!
//! Errors only occur at the input boundary: building a series, parsing
//! request enums and validating configuration. The analyzers themselves
//! never fail and report degraded results instead.

use chrono::NaiveDate;
use thiserror::Error;

/// Cost analytics error types
#[derive(Debug, Error)]
pub enum CostAnalyticsError {
    /// A sample carries a cost the engine cannot use
    #[error("Invalid sample at index {index}: {reason}")]
    InvalidSample { index: usize, reason: String },

    /// Sample dates are not strictly ascending
    #[error("Samples out of order at index {index}: {current} does not follow {previous}")]
    UnorderedSamples {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    /// Unknown sensitivity level
    #[error("Unknown sensitivity level: {value}")]
    UnknownSensitivity { value: String },

    /// Unknown analysis type
    #[error("Unknown analysis type: {value}")]
    UnknownAnalysisType { value: String },

    /// Forecast horizon outside the configured range
    #[error("Invalid forecast horizon: {horizon} days (max {max})")]
    InvalidHorizon { horizon: u32, max: u32 },

    /// Request names a different account than the series it is run on
    #[error("Request for account {requested} was given the series of account {actual}")]
    AccountMismatch { requested: String, actual: String },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    ConfigurationError { message: String },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },
}

/// Cost analytics result type
pub type CostAnalyticsResult<T> = Result<T, CostAnalyticsError>;
