//! Anomaly detection result types

use crate::config::Sensitivity;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Anomaly severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational only
    Info,
    /// Low severity
    Low,
    /// Medium severity
    Medium,
    /// High severity
    High,
    /// Critical severity
    Critical,
}

impl Severity {
    /// Numeric rank used when merging findings (`info = 0` .. `critical = 4`)
    pub fn rank(self) -> u8 {
        match self {
            Severity::Info => 0,
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
            Severity::Critical => 4,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Detection strategy that produced a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Z-score against the series mean
    Statistical,
    /// Isolation forest outlier scoring
    Density,
    /// Deviation from a centered moving average
    MovingAverage,
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionMethod::Statistical => write!(f, "statistical"),
            DetectionMethod::Density => write!(f, "density"),
            DetectionMethod::MovingAverage => write!(f, "moving_average"),
        }
    }
}

/// Whether the cost sat above or below its reference level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    /// Cost above the reference level
    Spike,
    /// Cost below the reference level
    Drop,
}

impl AnomalyType {
    /// Classify `actual` against `reference`
    pub fn classify(actual: f64, reference: f64) -> Self {
        if actual > reference {
            AnomalyType::Spike
        } else {
            AnomalyType::Drop
        }
    }
}

/// What backs a finding: an expected cost or a model score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnomalyEvidence {
    /// Cost the method expected for the day
    Expected {
        /// Reference cost
        expected_cost: f64,
    },
    /// Normalized outlier score in (0, 1]
    Score {
        /// Isolation score
        anomaly_score: f64,
    },
}

/// A flagged day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    /// Day flagged
    pub date: NaiveDate,
    /// Cost on that day
    pub actual_cost: f64,
    /// Expected cost or model score
    #[serde(flatten)]
    pub evidence: AnomalyEvidence,
    /// Severity
    pub severity: Severity,
    /// Method that flagged it
    pub method: DetectionMethod,
    /// Spike or drop
    pub anomaly_type: AnomalyType,
    /// Distance from the reference level, in percent
    pub deviation_percent: f64,
}

impl Anomaly {
    /// Suggested follow-up for this finding
    pub fn recommended_actions(&self) -> Vec<String> {
        let mut actions: Vec<String> = match self.anomaly_type {
            AnomalyType::Spike => vec![
                "Review recent resource provisioning changes".to_string(),
                "Check for unscheduled workloads".to_string(),
                "Verify cost allocation tags".to_string(),
            ],
            AnomalyType::Drop => vec![
                "Check for stopped or failed services".to_string(),
                "Verify billing data completeness for the day".to_string(),
            ],
        };

        if self.severity == Severity::Critical {
            actions.insert(0, "Immediate investigation required".to_string());
            actions.push("Consider emergency response procedures".to_string());
        }

        actions
    }
}

/// Single informational record returned instead of per-day findings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum DetectionNotice {
    /// Series too short to run the detectors
    InsufficientData {
        /// Samples needed
        required: usize,
        /// Samples given
        available: usize,
    },
    /// Every cost is zero, typical of idle or free-tier accounts
    AllZero,
    /// Detectors ran and found nothing
    NoSignificantAnomalies,
}

impl DetectionNotice {
    /// Human-readable message
    pub fn message(&self) -> String {
        match self {
            DetectionNotice::InsufficientData {
                required,
                available,
            } => format!(
                "Insufficient data for anomaly detection: {} of {} required days",
                available, required
            ),
            DetectionNotice::AllZero => {
                "No anomalies detected: all costs in the period are zero".to_string()
            }
            DetectionNotice::NoSignificantAnomalies => {
                "No significant anomalies detected".to_string()
            }
        }
    }
}

/// Output of one detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Sensitivity the detectors ran with
    pub sensitivity: Sensitivity,
    /// Findings, most severe and most recent first
    pub anomalies: Vec<Anomaly>,
    /// Set when there are no findings to report
    pub notice: Option<DetectionNotice>,
    /// Detectors that actually ran
    pub methods_run: Vec<DetectionMethod>,
}

impl AnomalyReport {
    pub(crate) fn informational(sensitivity: Sensitivity, notice: DetectionNotice) -> Self {
        Self {
            sensitivity,
            anomalies: Vec::new(),
            notice: Some(notice),
            methods_run: Vec::new(),
        }
    }

    /// Whether the report is a single informational record
    pub fn is_informational(&self) -> bool {
        self.anomalies.is_empty() && self.notice.is_some()
    }

    /// Number of findings at the given severity
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.anomalies
            .iter()
            .filter(|a| a.severity == severity)
            .count()
    }

    /// Highest severity present, `Info` when there are no findings
    pub fn highest_severity(&self) -> Severity {
        self.anomalies
            .iter()
            .map(|a| a.severity)
            .max()
            .unwrap_or(Severity::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anomaly(severity: Severity, anomaly_type: AnomalyType) -> Anomaly {
        Anomaly {
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            actual_cost: 900.0,
            evidence: AnomalyEvidence::Expected {
                expected_cost: 100.0,
            },
            severity,
            method: DetectionMethod::Statistical,
            anomaly_type,
            deviation_percent: 800.0,
        }
    }

    #[test]
    fn test_severity_rank_and_ordering() {
        assert_eq!(Severity::Info.rank(), 0);
        assert_eq!(Severity::Critical.rank(), 4);
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert!(Severity::Low > Severity::Info);
    }

    #[test]
    fn test_anomaly_type_classification() {
        assert_eq!(AnomalyType::classify(200.0, 100.0), AnomalyType::Spike);
        assert_eq!(AnomalyType::classify(50.0, 100.0), AnomalyType::Drop);
    }

    #[test]
    fn test_evidence_serializes_flat() {
        let json = serde_json::to_value(anomaly(Severity::High, AnomalyType::Spike)).unwrap();
        assert_eq!(json["expected_cost"], 100.0);
        assert!(json.get("anomaly_score").is_none());
        assert_eq!(json["severity"], "high");
        assert_eq!(json["method"], "statistical");

        let mut scored = anomaly(Severity::Medium, AnomalyType::Spike);
        scored.evidence = AnomalyEvidence::Score { anomaly_score: 0.8 };
        scored.method = DetectionMethod::Density;
        let json = serde_json::to_value(&scored).unwrap();
        assert_eq!(json["anomaly_score"], 0.8);
        assert!(json.get("expected_cost").is_none());

        let back: Anomaly = serde_json::from_value(json).unwrap();
        assert_eq!(back, scored);
    }

    #[test]
    fn test_critical_actions_are_escalated() {
        let actions = anomaly(Severity::Critical, AnomalyType::Spike).recommended_actions();
        assert_eq!(actions.first().unwrap(), "Immediate investigation required");
        assert_eq!(actions.last().unwrap(), "Consider emergency response procedures");
        assert!(actions.contains(&"Review recent resource provisioning changes".to_string()));

        let actions = anomaly(Severity::Medium, AnomalyType::Drop).recommended_actions();
        assert!(!actions.contains(&"Immediate investigation required".to_string()));
    }

    #[test]
    fn test_notice_messages() {
        let notice = DetectionNotice::InsufficientData {
            required: 7,
            available: 3,
        };
        assert_eq!(
            notice.message(),
            "Insufficient data for anomaly detection: 3 of 7 required days"
        );
        let json = serde_json::to_value(&DetectionNotice::AllZero).unwrap();
        assert_eq!(json["notice"], "all_zero");
    }

    #[test]
    fn test_report_helpers() {
        let report = AnomalyReport {
            sensitivity: Sensitivity::Medium,
            anomalies: vec![
                anomaly(Severity::Critical, AnomalyType::Spike),
                anomaly(Severity::Medium, AnomalyType::Drop),
            ],
            notice: None,
            methods_run: vec![DetectionMethod::Statistical],
        };
        assert!(!report.is_informational());
        assert_eq!(report.count_by_severity(Severity::Critical), 1);
        assert_eq!(report.highest_severity(), Severity::Critical);

        let info = AnomalyReport::informational(Sensitivity::Low, DetectionNotice::AllZero);
        assert!(info.is_informational());
        assert_eq!(info.highest_severity(), Severity::Info);
    }
}
