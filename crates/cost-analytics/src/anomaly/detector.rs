//! Multi-method anomaly detector

use crate::config::{AnomalyConfig, Sensitivity, SensitivityParams};
use crate::series::CostSeries;
use tracing::{debug, warn};

use super::merge::merge_candidates;
use super::types::*;
use super::{isolation_forest, moving_average, statistical};

/// Configuration and resolved thresholds handed to each detection method
#[derive(Debug, Clone, Copy)]
pub struct DetectionContext<'a> {
    /// Detector configuration
    pub config: &'a AnomalyConfig,
    /// Thresholds for the requested sensitivity
    pub params: SensitivityParams,
}

impl<'a> DetectionContext<'a> {
    /// Resolve the sensitivity table for one run
    pub fn new(config: &'a AnomalyConfig, sensitivity: Sensitivity) -> Self {
        Self {
            config,
            params: config.sensitivity.params(sensitivity),
        }
    }
}

impl DetectionMethod {
    /// Every method, in merge priority order
    pub const ALL: [DetectionMethod; 3] = [
        DetectionMethod::Statistical,
        DetectionMethod::Density,
        DetectionMethod::MovingAverage,
    ];

    /// Run this method over the series
    pub fn detect(&self, series: &CostSeries, ctx: &DetectionContext<'_>) -> Vec<Anomaly> {
        match self {
            DetectionMethod::Statistical => statistical::detect(series, ctx),
            DetectionMethod::Density => isolation_forest::detect(series, ctx),
            DetectionMethod::MovingAverage => moving_average::detect(series, ctx),
        }
    }
}

/// Runs every configured detection method and merges their findings
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    config: AnomalyConfig,
    methods: Vec<DetectionMethod>,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new(AnomalyConfig::default())
    }
}

impl AnomalyDetector {
    /// Create a detector running all methods
    pub fn new(config: AnomalyConfig) -> Self {
        Self::with_methods(config, DetectionMethod::ALL.to_vec())
    }

    /// Create a detector running only the given methods
    pub fn with_methods(config: AnomalyConfig, methods: Vec<DetectionMethod>) -> Self {
        Self { config, methods }
    }

    /// Detector configuration
    pub fn config(&self) -> &AnomalyConfig {
        &self.config
    }

    /// Detect anomalous days
    ///
    /// Returns at most `max_results` findings ordered by severity then date,
    /// both descending, or a single notice when there is nothing to report.
    pub fn detect(&self, series: &CostSeries, sensitivity: Sensitivity) -> AnomalyReport {
        if series.len() < self.config.min_samples {
            debug!(
                account_id = series.account_id(),
                samples = series.len(),
                required = self.config.min_samples,
                "Skipping anomaly detection: insufficient data"
            );
            return AnomalyReport::informational(
                sensitivity,
                DetectionNotice::InsufficientData {
                    required: self.config.min_samples,
                    available: series.len(),
                },
            );
        }

        if series.is_all_zero() {
            debug!(
                account_id = series.account_id(),
                "Skipping anomaly detection: all costs are zero"
            );
            return AnomalyReport::informational(sensitivity, DetectionNotice::AllZero);
        }

        let ctx = DetectionContext::new(&self.config, sensitivity);
        let mut candidates = Vec::new();

        for method in &self.methods {
            let found = method.detect(series, &ctx);
            debug!(
                account_id = series.account_id(),
                method = %method,
                candidates = found.len(),
                "Detection method finished"
            );
            candidates.extend(found);
        }

        let anomalies = merge_candidates(candidates, self.config.max_results);

        for anomaly in anomalies.iter().filter(|a| a.severity == Severity::Critical) {
            warn!(
                "Critical cost anomaly for {}: {} cost={:.2} ({} {:.1}%)",
                series.account_id(),
                anomaly.date,
                anomaly.actual_cost,
                anomaly.method,
                anomaly.deviation_percent
            );
        }

        let notice = anomalies
            .is_empty()
            .then_some(DetectionNotice::NoSignificantAnomalies);

        AnomalyReport {
            sensitivity,
            anomalies,
            notice,
            methods_run: self.methods.clone(),
        }
    }
}
