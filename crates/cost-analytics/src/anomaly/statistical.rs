//! Z-score detection against the series mean

use crate::series::CostSeries;
use crate::stats::{mean, population_std};

use super::detector::DetectionContext;
use super::types::*;

/// Flag days whose z-score exceeds the sensitivity threshold
///
/// Skipped when the series has no spread.
pub fn detect(series: &CostSeries, ctx: &DetectionContext<'_>) -> Vec<Anomaly> {
    let values = series.costs();
    let avg = mean(&values);
    let std_dev = population_std(&values);

    if std_dev == 0.0 || !std_dev.is_finite() {
        return Vec::new();
    }

    let threshold = ctx.params.z_threshold;

    series
        .samples()
        .iter()
        .filter_map(|sample| {
            let z = (sample.cost - avg).abs() / std_dev;
            if z <= threshold {
                return None;
            }

            let severity = if z > ctx.config.z_critical {
                Severity::Critical
            } else if z > ctx.config.z_high {
                Severity::High
            } else {
                Severity::Medium
            };

            Some(Anomaly {
                date: sample.date,
                actual_cost: sample.cost,
                evidence: AnomalyEvidence::Expected { expected_cost: avg },
                severity,
                method: DetectionMethod::Statistical,
                anomaly_type: AnomalyType::classify(sample.cost, avg),
                deviation_percent: deviation_percent(sample.cost, avg),
            })
        })
        .collect()
}

pub(super) fn deviation_percent(actual: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        0.0
    } else {
        ((actual - reference) / reference * 100.0).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnomalyConfig, Sensitivity};
    use chrono::NaiveDate;

    fn series(costs: &[f64]) -> CostSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        CostSeries::from_costs("acct-z", start, costs).unwrap()
    }

    #[test]
    fn test_final_spike_is_critical() {
        let mut costs = vec![100.0; 29];
        costs.push(5000.0);
        let config = AnomalyConfig::default();
        let ctx = DetectionContext::new(&config, Sensitivity::Medium);

        let found = detect(&series(&costs), &ctx);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].date, NaiveDate::from_ymd_opt(2024, 1, 30).unwrap());
        assert_eq!(found[0].severity, Severity::Critical);
        assert_eq!(found[0].anomaly_type, AnomalyType::Spike);
        assert_eq!(found[0].method, DetectionMethod::Statistical);
    }

    #[test]
    fn test_severity_bands() {
        let config = AnomalyConfig::default();
        let ctx = DetectionContext::new(&config, Sensitivity::Medium);

        // One outlier among n values sits at z = sqrt(n - 1)
        let mut high_band = vec![100.0; 11];
        high_band.push(200.0);
        let found = detect(&series(&high_band), &ctx);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].date, NaiveDate::from_ymd_opt(2024, 1, 12).unwrap());
        assert_eq!(found[0].severity, Severity::High);

        let mut medium_band = vec![100.0; 8];
        medium_band.push(200.0);
        let found = detect(&series(&medium_band), &ctx);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].date, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
        assert_eq!(found[0].severity, Severity::Medium);
    }

    #[test]
    fn test_flat_series_is_skipped() {
        let config = AnomalyConfig::default();
        let ctx = DetectionContext::new(&config, Sensitivity::High);
        assert!(detect(&series(&[50.0; 12]), &ctx).is_empty());
    }

    #[test]
    fn test_threshold_depends_on_sensitivity() {
        // z of the outlier is about 2.65 here
        let mut costs = vec![100.0; 7];
        costs.push(140.0);
        let config = AnomalyConfig::default();

        let low = detect(&series(&costs), &DetectionContext::new(&config, Sensitivity::Low));
        let high = detect(&series(&costs), &DetectionContext::new(&config, Sensitivity::High));
        assert!(low.is_empty());
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].severity, Severity::Medium);
    }

    #[test]
    fn test_deviation_percent_guards_zero_reference() {
        assert_eq!(deviation_percent(10.0, 0.0), 0.0);
        assert_eq!(deviation_percent(150.0, 100.0), 50.0);
        assert_eq!(deviation_percent(50.0, 100.0), 50.0);
    }
}
