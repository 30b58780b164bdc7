//! Cost analytics engine for daily cloud spend
//!
//! This crate turns a per-account series of daily costs into:
//! - Trend characterization (direction, growth, volatility, seasonality)
//! - Anomalous days, found by three detectors and merged by severity
//! - Short-horizon cost forecasts with prediction bands
//! - Templated recommendations and ranked insights for the API layer
//!
//! Every analysis is a pure, synchronous computation over a caller-owned
//! [`CostSeries`]. Short, flat and all-zero series are ordinary inputs that
//! produce labeled fallback results; errors only arise when building a series
//! or validating a request or configuration.

#![warn(missing_docs)]

pub mod anomaly;
pub mod config;
pub mod error;
pub mod forecast;
pub mod orchestrator;
pub mod series;
pub mod stats;
pub mod trend;

pub use error::{CostAnalyticsError, CostAnalyticsResult};

// Configuration
pub use config::{
    AnalyticsConfig, AnomalyConfig, ForecastConfig, IsolationForestConfig, Sensitivity,
    SensitivityParams, SensitivityTable, TrendConfig,
};

// Input data
pub use series::{CostSample, CostSeries};

// Trend analysis
pub use trend::{TrendAnalyzer, TrendDirection, TrendResult};

// Anomaly detection
pub use anomaly::{
    Anomaly, AnomalyDetector, AnomalyReport, AnomalyType, DetectionMethod, DetectionNotice,
    Severity,
};

// Forecasting
pub use forecast::{ForecastModel, ForecastResult, Forecaster};

// Orchestration
pub use orchestrator::{
    AnalysisOutcome, AnalysisReport, AnalysisRequest, AnalysisType, AnalyticsOrchestrator,
    Insight, InsightType,
};
