//! Forecast result types

use crate::trend::TrendDirection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Model that produced a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastModel {
    /// Least-squares line over the sample index
    LinearRegression,
    /// Flat projection of the series mean
    SimpleAverage,
    /// Flat zero projection for an all-zero series
    ConstantZero,
}

impl fmt::Display for ForecastModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastModel::LinearRegression => write!(f, "linear_regression"),
            ForecastModel::SimpleAverage => write!(f, "simple_average"),
            ForecastModel::ConstantZero => write!(f, "constant_zero"),
        }
    }
}

/// Projected cost for one future day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Days after the last sample, starting at 1
    pub offset_day: u32,
    /// Calendar day, when the series has a last date to count from
    pub date: Option<NaiveDate>,
    /// Projected cost, never negative
    pub predicted_cost: f64,
    /// Model confidence in [0, 1]
    pub confidence: f64,
    /// Lower edge of the prediction band, never negative
    pub lower_bound: f64,
    /// Upper edge of the prediction band
    pub upper_bound: f64,
}

/// In-sample fit quality of the regression model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPerformance {
    /// Mean absolute error
    pub mae: f64,
    /// Root mean squared error
    pub rmse: f64,
    /// Coefficient of determination
    pub r_squared: f64,
}

/// Output of [`Forecaster::forecast`](super::Forecaster::forecast)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Number of days projected
    pub horizon_days: u32,
    /// One point per projected day, in order
    pub predictions: Vec<ForecastPoint>,
    /// Sum of all projected costs
    pub total_predicted_cost: f64,
    /// Direction of the projection
    pub trend: TrendDirection,
    /// Model that produced the projection
    pub model_type: ForecastModel,
    /// Overall confidence in [0, 1]
    pub confidence: f64,
    /// Fit quality, present for the regression model only
    pub model_performance: Option<ModelPerformance>,
}

impl ForecastResult {
    /// Mean projected daily cost, 0 for an empty horizon
    pub fn average_predicted_cost(&self) -> f64 {
        if self.predictions.is_empty() {
            0.0
        } else {
            self.total_predicted_cost / self.predictions.len() as f64
        }
    }

    /// Projected cost for a given offset day
    pub fn prediction_for(&self, offset_day: u32) -> Option<&ForecastPoint> {
        self.predictions.iter().find(|p| p.offset_day == offset_day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(offset_day: u32, predicted_cost: f64) -> ForecastPoint {
        ForecastPoint {
            offset_day,
            date: None,
            predicted_cost,
            confidence: 0.6,
            lower_bound: predicted_cost,
            upper_bound: predicted_cost,
        }
    }

    #[test]
    fn test_model_display_matches_serde() {
        for model in [
            ForecastModel::LinearRegression,
            ForecastModel::SimpleAverage,
            ForecastModel::ConstantZero,
        ] {
            let serialized = serde_json::to_string(&model).unwrap();
            assert_eq!(serialized, format!("\"{}\"", model));
        }
    }

    #[test]
    fn test_average_and_lookup() {
        let result = ForecastResult {
            horizon_days: 2,
            predictions: vec![point(1, 10.0), point(2, 30.0)],
            total_predicted_cost: 40.0,
            trend: TrendDirection::Stable,
            model_type: ForecastModel::SimpleAverage,
            confidence: 0.6,
            model_performance: None,
        };
        assert_eq!(result.average_predicted_cost(), 20.0);
        assert_eq!(result.prediction_for(2).unwrap().predicted_cost, 30.0);
        assert!(result.prediction_for(3).is_none());
    }
}
