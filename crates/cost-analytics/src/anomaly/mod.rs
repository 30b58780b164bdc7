//! Anomaly detection for daily cost series
//!
//! Three independent methods run over the same series and their findings are
//! merged per date, keeping the most severe explanation:
//! - Statistical z-score against the series mean
//! - Density scoring with a seeded isolation forest
//! - Deviation from a centered moving average

mod detector;
mod isolation_forest;
mod merge;
mod moving_average;
mod statistical;
mod types;

pub use detector::{AnomalyDetector, DetectionContext};
pub use isolation_forest::IsolationForest;
pub use merge::merge_candidates;
pub use moving_average::centered_moving_average;
pub use types::{
    Anomaly, AnomalyEvidence, AnomalyReport, AnomalyType, DetectionMethod, DetectionNotice,
    Severity,
};
