//! Cost forecasting
//!
//! A least-squares line over the sample index is projected forward. Short
//! and all-zero series get a flat projection instead, and so does any fit
//! that produces non-finite numbers, so a forecast is always returned.

use crate::config::ForecastConfig;
use crate::series::CostSeries;
use crate::stats::{mean, population_std, quantile, LinearFit};
use crate::trend::TrendDirection;
use chrono::Duration as ChronoDuration;
use tracing::{debug, warn};

use super::types::*;

/// Projects daily cost over a horizon
#[derive(Debug, Clone, Default)]
pub struct Forecaster {
    config: ForecastConfig,
}

impl Forecaster {
    /// Create a forecaster
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    /// Forecaster configuration
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast `horizon_days` days past the last sample
    ///
    /// Predictions are never negative. A zero horizon gives an empty
    /// forecast with the model the series would otherwise use.
    pub fn forecast(&self, series: &CostSeries, horizon_days: u32) -> ForecastResult {
        let values = series.costs();

        if values.len() < self.config.min_samples {
            debug!(
                account_id = series.account_id(),
                samples = values.len(),
                "Forecasting with simple average: insufficient data"
            );
            return self.simple_average(series, &values, horizon_days);
        }

        if series.is_all_zero() {
            debug!(
                account_id = series.account_id(),
                "Forecasting constant zero for all-zero series"
            );
            return self.flat(
                series,
                horizon_days,
                0.0,
                ForecastModel::ConstantZero,
                self.config.constant_zero_confidence,
            );
        }

        match self.linear(series, &values, horizon_days) {
            Some(result) => result,
            None => {
                warn!(
                    "Linear fit for {} is not usable, falling back to simple average",
                    series.account_id()
                );
                self.simple_average(series, &values, horizon_days)
            }
        }
    }

    fn linear(
        &self,
        series: &CostSeries,
        values: &[f64],
        horizon_days: u32,
    ) -> Option<ForecastResult> {
        let fit = LinearFit::fit(values)?;
        let n = values.len() as f64;

        let residuals = fit.residuals(values);
        let mae = residuals.iter().map(|r| r.abs()).sum::<f64>() / n;
        let rmse = (residuals.iter().map(|r| r * r).sum::<f64>() / n).sqrt();
        let r_squared = fit.r_squared(values);
        let sigma = population_std(&residuals);
        let raw_confidence = 1.0 - mae / (mean(values) + self.config.epsilon);

        if ![mae, rmse, r_squared, sigma, raw_confidence]
            .iter()
            .all(|v| v.is_finite())
        {
            return None;
        }

        let confidence = raw_confidence
            .max(self.config.min_confidence)
            .min(self.config.max_confidence);
        let half_width = self.config.interval_z * sigma;

        let predictions = (1..=horizon_days)
            .map(|offset_day| {
                let t = n + f64::from(offset_day - 1);
                let raw = fit.predict(t);
                raw.is_finite().then(|| {
                    self.point(series, offset_day, raw.max(0.0), confidence, half_width)
                })
            })
            .collect::<Option<Vec<_>>>()?;

        let total_predicted_cost: f64 = predictions.iter().map(|p| p.predicted_cost).sum();
        if !total_predicted_cost.is_finite() {
            return None;
        }

        Some(ForecastResult {
            horizon_days,
            predictions,
            total_predicted_cost,
            trend: TrendDirection::from_slope(fit.slope, self.config.slope_threshold),
            model_type: ForecastModel::LinearRegression,
            confidence,
            model_performance: Some(ModelPerformance {
                mae,
                rmse,
                r_squared,
            }),
        })
    }

    fn simple_average(
        &self,
        series: &CostSeries,
        values: &[f64],
        horizon_days: u32,
    ) -> ForecastResult {
        let average = mean(values);
        // the median cannot overflow where the sum did
        let level = if average.is_finite() {
            average
        } else {
            quantile(values, 0.5)
        };

        self.flat(
            series,
            horizon_days,
            level,
            ForecastModel::SimpleAverage,
            self.config.simple_average_confidence,
        )
    }

    fn flat(
        &self,
        series: &CostSeries,
        horizon_days: u32,
        level: f64,
        model_type: ForecastModel,
        confidence: f64,
    ) -> ForecastResult {
        let level = level.max(0.0);
        let predictions: Vec<ForecastPoint> = (1..=horizon_days)
            .map(|offset_day| self.point(series, offset_day, level, confidence, 0.0))
            .collect();
        let total_predicted_cost = predictions.iter().map(|p| p.predicted_cost).sum();

        ForecastResult {
            horizon_days,
            predictions,
            total_predicted_cost,
            trend: TrendDirection::Stable,
            model_type,
            confidence,
            model_performance: None,
        }
    }

    fn point(
        &self,
        series: &CostSeries,
        offset_day: u32,
        predicted_cost: f64,
        confidence: f64,
        half_width: f64,
    ) -> ForecastPoint {
        let date = series
            .last_date()
            .and_then(|last| last.checked_add_signed(ChronoDuration::days(i64::from(offset_day))));

        ForecastPoint {
            offset_day,
            date,
            predicted_cost,
            confidence,
            lower_bound: (predicted_cost - half_width).max(0.0),
            upper_bound: predicted_cost + half_width,
        }
    }
}
