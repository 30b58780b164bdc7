//! Analysis requests

use crate::config::{ForecastConfig, Sensitivity};
use crate::error::{CostAnalyticsError, CostAnalyticsResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of analysis a request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    /// Trend analysis
    Trend,
    /// Anomaly detection
    Anomaly,
    /// Cost forecast
    Forecast,
    /// All three, summarized into insights
    Insights,
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisType::Trend => write!(f, "trend"),
            AnalysisType::Anomaly => write!(f, "anomaly"),
            AnalysisType::Forecast => write!(f, "forecast"),
            AnalysisType::Insights => write!(f, "insights"),
        }
    }
}

impl FromStr for AnalysisType {
    type Err = CostAnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trend" | "trend_analysis" => Ok(AnalysisType::Trend),
            "anomaly" | "anomalies" | "anomaly_detection" => Ok(AnalysisType::Anomaly),
            "forecast" | "cost_forecast" => Ok(AnalysisType::Forecast),
            "insights" => Ok(AnalysisType::Insights),
            _ => Err(CostAnalyticsError::UnknownAnalysisType {
                value: s.to_string(),
            }),
        }
    }
}

/// A request from the API layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Account the analysis is for
    pub account_id: String,
    /// Requested analysis
    pub analysis_type: AnalysisType,
    /// Anomaly sensitivity
    #[serde(default)]
    pub sensitivity: Sensitivity,
    /// Forecast horizon; the configured default when omitted
    #[serde(default)]
    pub horizon_days: Option<u32>,
}

impl AnalysisRequest {
    /// Create a request with default sensitivity and horizon
    pub fn new(account_id: impl Into<String>, analysis_type: AnalysisType) -> Self {
        Self {
            account_id: account_id.into(),
            analysis_type,
            sensitivity: Sensitivity::default(),
            horizon_days: None,
        }
    }

    /// Set the anomaly sensitivity
    pub fn with_sensitivity(mut self, sensitivity: Sensitivity) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Set the forecast horizon
    pub fn with_horizon(mut self, horizon_days: u32) -> Self {
        self.horizon_days = Some(horizon_days);
        self
    }

    /// Horizon to forecast, after applying the default and range check
    pub fn resolve_horizon(&self, config: &ForecastConfig) -> CostAnalyticsResult<u32> {
        let horizon = self.horizon_days.unwrap_or(config.default_horizon);
        if horizon > config.max_horizon {
            return Err(CostAnalyticsError::InvalidHorizon {
                horizon,
                max: config.max_horizon,
            });
        }
        Ok(horizon)
    }
}
