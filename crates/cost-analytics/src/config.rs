//! Configuration for the cost analytics engine
//!
//! Every tuned constant lives here as plain data. Nothing is read from the
//! environment; the embedding service builds an [`AnalyticsConfig`] (or
//! deserializes one) and hands it to the analyzers.

use crate::error::{CostAnalyticsError, CostAnalyticsResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Anomaly detection sensitivity chosen by the caller
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Sensitivity {
    /// Only flag pronounced outliers
    Low,
    /// Balanced default
    #[default]
    Medium,
    /// Flag anything unusual
    High,
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sensitivity::Low => write!(f, "low"),
            Sensitivity::Medium => write!(f, "medium"),
            Sensitivity::High => write!(f, "high"),
        }
    }
}

impl FromStr for Sensitivity {
    type Err = CostAnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Sensitivity::Low),
            "medium" => Ok(Sensitivity::Medium),
            "high" => Ok(Sensitivity::High),
            _ => Err(CostAnalyticsError::UnknownSensitivity {
                value: s.to_string(),
            }),
        }
    }
}

/// Detector parameters for one sensitivity level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityParams {
    /// Z-score a point must exceed to be flagged
    pub z_threshold: f64,
    /// Expected outlier fraction for the isolation forest
    pub contamination: f64,
    /// Relative deviation from the moving average that gets flagged
    pub ma_deviation: f64,
}

/// Parameter table indexed by [`Sensitivity`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityTable {
    /// Parameters for [`Sensitivity::Low`]
    pub low: SensitivityParams,
    /// Parameters for [`Sensitivity::Medium`]
    pub medium: SensitivityParams,
    /// Parameters for [`Sensitivity::High`]
    pub high: SensitivityParams,
}

impl SensitivityTable {
    /// Look up the parameters for a sensitivity level
    pub fn params(&self, sensitivity: Sensitivity) -> SensitivityParams {
        match sensitivity {
            Sensitivity::Low => self.low,
            Sensitivity::Medium => self.medium,
            Sensitivity::High => self.high,
        }
    }

    /// Thresholds must loosen as sensitivity rises
    fn validate(&self) -> CostAnalyticsResult<()> {
        let levels = [self.low, self.medium, self.high];

        for params in &levels {
            ensure(
                params.contamination > 0.0 && params.contamination <= 0.5,
                format!("contamination must be in (0, 0.5], got {}", params.contamination),
            )?;
            ensure(
                params.z_threshold > 0.0 && params.ma_deviation > 0.0,
                "z_threshold and ma_deviation must be positive",
            )?;
        }

        for pair in levels.windows(2) {
            let (lower, higher) = (pair[0], pair[1]);
            ensure(
                higher.z_threshold <= lower.z_threshold
                    && higher.ma_deviation <= lower.ma_deviation
                    && higher.contamination >= lower.contamination,
                "sensitivity table must not tighten as sensitivity increases",
            )?;
        }

        Ok(())
    }
}

impl Default for SensitivityTable {
    fn default() -> Self {
        Self {
            low: SensitivityParams {
                z_threshold: 3.0,
                contamination: 0.05,
                ma_deviation: 0.5,
            },
            medium: SensitivityParams {
                z_threshold: 2.5,
                contamination: 0.10,
                ma_deviation: 0.3,
            },
            high: SensitivityParams {
                z_threshold: 2.0,
                contamination: 0.15,
                ma_deviation: 0.2,
            },
        }
    }
}

/// Trend analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Slope magnitude (cost per day) below which the trend is stable
    pub slope_threshold: f64,
    /// Sample count above which a fitted trend gets high confidence
    pub high_confidence_samples: usize,
    /// Window (days) compared at each end for the growth rate
    pub growth_window: usize,
    /// Weekly to monthly growth projection factor
    pub monthly_factor: f64,
    /// Weekly to annual growth projection factor
    pub annual_factor: f64,
    /// Half-over-half change (percent) that counts as a trend
    pub period_change_percent: f64,
    /// Minimum samples for the half-over-half comparison
    pub period_min_samples: usize,
    /// Day-over-day relative change below which a day counts as stable
    pub stable_day_delta: f64,
    /// Guard added to the previous day's cost in relative deltas
    pub volatility_epsilon: f64,
    /// Volatility score bands: very stable / stable / moderate
    pub volatility_bands: [f64; 3],
    /// Max/min average ratio that indicates a weekly or monthly pattern
    pub seasonal_pattern_ratio: f64,
    /// Coefficient of variation above which spending is called irregular
    pub high_variance_ratio: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            slope_threshold: 0.01,
            high_confidence_samples: 14,
            growth_window: 7,
            monthly_factor: 4.33,
            annual_factor: 52.0,
            period_change_percent: 5.0,
            period_min_samples: 4,
            stable_day_delta: 0.05,
            volatility_epsilon: 1e-10,
            volatility_bands: [5.0, 15.0, 30.0],
            seasonal_pattern_ratio: 1.2,
            high_variance_ratio: 0.3,
        }
    }
}

/// Isolation forest parameters for the density detector
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IsolationForestConfig {
    /// Number of isolation trees
    pub trees: usize,
    /// Samples drawn per tree (capped at the series length)
    pub subsample_size: usize,
    /// RNG seed; fixed so repeated calls score identically
    pub seed: u64,
    /// Normalized score above which an outlier is rated high severity
    pub strong_outlier_score: f64,
}

impl Default for IsolationForestConfig {
    fn default() -> Self {
        Self {
            trees: 100,
            subsample_size: 256,
            seed: 42,
            strong_outlier_score: 0.7,
        }
    }
}

/// Anomaly detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Minimum samples before any detector runs
    pub min_samples: usize,
    /// Maximum anomalies returned after merging
    pub max_results: usize,
    /// Upper bound on the centered moving-average window
    pub ma_max_window: usize,
    /// Guard added to denominators
    pub epsilon: f64,
    /// Z-score above which a statistical anomaly is critical
    pub z_critical: f64,
    /// Z-score above which a statistical anomaly is high
    pub z_high: f64,
    /// Moving-average deviation above which an anomaly is high
    pub ma_high_deviation: f64,
    /// Per-sensitivity thresholds
    pub sensitivity: SensitivityTable,
    /// Density detector model parameters
    pub isolation_forest: IsolationForestConfig,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            min_samples: 7,
            max_results: 10,
            ma_max_window: 7,
            epsilon: 1e-10,
            z_critical: 3.5,
            z_high: 3.0,
            ma_high_deviation: 0.8,
            sensitivity: SensitivityTable::default(),
            isolation_forest: IsolationForestConfig::default(),
        }
    }
}

/// Forecasting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Minimum samples for the regression path
    pub min_samples: usize,
    /// Horizon used when a request does not name one
    pub default_horizon: u32,
    /// Largest horizon a request may ask for
    pub max_horizon: u32,
    /// Confidence reported by the simple-average fallback
    pub simple_average_confidence: f64,
    /// Confidence reported for an all-zero series
    pub constant_zero_confidence: f64,
    /// Lower clamp for regression confidence
    pub min_confidence: f64,
    /// Upper clamp for regression confidence
    pub max_confidence: f64,
    /// Guard added to the mean when normalizing MAE
    pub epsilon: f64,
    /// Normal quantile for the prediction band
    pub interval_z: f64,
    /// Slope dead band for the forecast trend, same meaning as the trend
    /// analyzer's
    pub slope_threshold: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            min_samples: 3,
            default_horizon: 30,
            max_horizon: 365,
            simple_average_confidence: 0.6,
            constant_zero_confidence: 0.95,
            min_confidence: 0.5,
            max_confidence: 0.95,
            epsilon: 1e-10,
            interval_z: 1.96,
            slope_threshold: 0.01,
        }
    }
}

/// Top-level analytics configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Trend analysis settings
    pub trend: TrendConfig,
    /// Anomaly detection settings
    pub anomaly: AnomalyConfig,
    /// Forecast settings
    pub forecast: ForecastConfig,
}

impl AnalyticsConfig {
    /// Parse a configuration from JSON, filling omitted fields with defaults
    pub fn from_json_str(json: &str) -> CostAnalyticsResult<Self> {
        let config: AnalyticsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the analyzers cannot work with
    pub fn validate(&self) -> CostAnalyticsResult<()> {
        let trend = &self.trend;
        let bands = trend.volatility_bands;
        ensure(trend.growth_window > 0, "trend.growth_window must be > 0")?;
        ensure(trend.period_min_samples >= 2, "trend.period_min_samples must be >= 2")?;
        ensure(
            bands[0] <= bands[1] && bands[1] <= bands[2],
            "trend.volatility_bands must be ascending",
        )?;

        let anomaly = &self.anomaly;
        let forest = &anomaly.isolation_forest;
        ensure(
            anomaly.max_results > 0 && anomaly.ma_max_window > 0,
            "anomaly.max_results and anomaly.ma_max_window must be > 0",
        )?;
        ensure(
            anomaly.z_high <= anomaly.z_critical,
            "anomaly.z_high must not exceed anomaly.z_critical",
        )?;
        ensure(
            forest.trees > 0 && forest.subsample_size >= 2,
            "isolation forest needs at least one tree and a subsample of 2",
        )?;
        anomaly.sensitivity.validate()?;

        let forecast = &self.forecast;
        ensure(
            forecast.max_horizon > 0 && forecast.default_horizon <= forecast.max_horizon,
            format!(
                "forecast.default_horizon ({}) must be within 1..={}",
                forecast.default_horizon, forecast.max_horizon
            ),
        )?;
        ensure(
            0.0 <= forecast.min_confidence
                && forecast.min_confidence <= forecast.max_confidence
                && forecast.max_confidence <= 1.0,
            "forecast confidence clamp must satisfy 0 <= min <= max <= 1",
        )
    }
}

fn ensure(condition: bool, message: impl Into<String>) -> CostAnalyticsResult<()> {
    if condition {
        Ok(())
    } else {
        Err(CostAnalyticsError::ConfigurationError {
            message: message.into(),
        })
    }
}
