//! Deviation from a centered moving average

use crate::series::CostSeries;

use super::detector::DetectionContext;
use super::types::*;

/// Centered rolling mean; `None` where the full window does not fit
///
/// For even windows the extra element sits on the left, so window 4 at
/// index `i` covers `i-2..=i+1`.
pub fn centered_moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 || window > values.len() {
        return vec![None; values.len()];
    }

    let right = (window - 1) / 2;
    let left = window - 1 - right;

    (0..values.len())
        .map(|i| {
            if i < left || i + right >= values.len() {
                None
            } else {
                let slice = &values[i - left..=i + right];
                Some(slice.iter().sum::<f64>() / window as f64)
            }
        })
        .collect()
}

/// Flag days that stray from their local average by more than the
/// sensitivity's relative deviation
pub fn detect(series: &CostSeries, ctx: &DetectionContext<'_>) -> Vec<Anomaly> {
    let values = series.costs();
    let window = ctx.config.ma_max_window.min(values.len() / 2);
    if window == 0 {
        return Vec::new();
    }

    let averages = centered_moving_average(&values, window);
    let eps = ctx.config.epsilon;

    series
        .samples()
        .iter()
        .zip(averages)
        .filter_map(|(sample, average)| {
            let average = average?;
            let deviation = (sample.cost - average).abs() / (average + eps);
            if deviation <= ctx.params.ma_deviation {
                return None;
            }

            Some(Anomaly {
                date: sample.date,
                actual_cost: sample.cost,
                evidence: AnomalyEvidence::Expected {
                    expected_cost: average,
                },
                severity: if deviation > ctx.config.ma_high_deviation {
                    Severity::High
                } else {
                    Severity::Medium
                },
                method: DetectionMethod::MovingAverage,
                anomaly_type: AnomalyType::classify(sample.cost, average),
                deviation_percent: deviation * 100.0,
            })
        })
        .collect()
}
