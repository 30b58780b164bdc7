//! Numerical helpers shared by the analyzers
//!
//! Thin guards around `statistical` so short slices never reach a routine
//! that needs more samples than it is given.

use serde::{Deserialize, Serialize};

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    statistical::mean(values)
}

/// Population standard deviation (divides by n), 0 for an empty slice
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    statistical::population_standard_deviation(values, Some(avg))
}

/// Sample standard deviation (divides by n - 1), 0 below two values
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    statistical::standard_deviation(values, Some(avg))
}

/// Linearly interpolated quantile, `q` in [0, 1]
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Least-squares line over the sample index `t = 0..n-1`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    /// Cost change per day
    pub slope: f64,
    /// Fitted cost at `t = 0`
    pub intercept: f64,
}

impl LinearFit {
    /// Fit `values[t] ≈ slope·t + intercept`
    ///
    /// Returns `None` below two points or when the fit is not finite.
    pub fn fit(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }

        let x_mean = (values.len() - 1) as f64 / 2.0;
        let y_mean = mean(values);

        let mut num = 0.0;
        let mut den = 0.0;
        for (i, &y) in values.iter().enumerate() {
            let dx = i as f64 - x_mean;
            num += dx * (y - y_mean);
            den += dx * dx;
        }

        if den == 0.0 {
            return None;
        }

        let slope = num / den;
        let intercept = y_mean - slope * x_mean;

        if slope.is_finite() && intercept.is_finite() {
            Some(Self { slope, intercept })
        } else {
            None
        }
    }

    /// Fitted value at index `t`
    pub fn predict(&self, t: f64) -> f64 {
        self.intercept + self.slope * t
    }

    /// In-sample residuals `actual - fitted`
    pub fn residuals(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .enumerate()
            .map(|(i, &y)| y - self.predict(i as f64))
            .collect()
    }

    /// Coefficient of determination; 0 when the values have no variance
    pub fn r_squared(&self, values: &[f64]) -> f64 {
        let y_mean = mean(values);
        let mut ss_tot = 0.0;
        let mut ss_res = 0.0;

        for (i, &y) in values.iter().enumerate() {
            ss_tot += (y - y_mean).powi(2);
            ss_res += (y - self.predict(i as f64)).powi(2);
        }

        if ss_tot != 0.0 {
            1.0 - ss_res / ss_tot
        } else {
            0.0
        }
    }
}
