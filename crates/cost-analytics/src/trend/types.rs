//! Trend analysis result types

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the fitted cost trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    /// Costs rising
    Increasing,
    /// Costs falling
    Decreasing,
    /// No meaningful slope
    Stable,
}

impl TrendDirection {
    /// Classify a slope (cost per day) against a dead band of `±threshold`
    pub fn from_slope(slope: f64, threshold: f64) -> Self {
        if slope > threshold {
            TrendDirection::Increasing
        } else if slope < -threshold {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "increasing"),
            TrendDirection::Decreasing => write!(f, "decreasing"),
            TrendDirection::Stable => write!(f, "stable"),
        }
    }
}

/// Qualitative support behind a fitted trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendConfidence {
    /// Too few samples to say
    Low,
    /// Fitted on two weeks or less
    Medium,
    /// Fitted on more than two weeks, or a perfectly flat series
    High,
}

/// Week-over-week growth
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthRate {
    /// Percent change between the first and last week averages
    pub weekly_growth_rate: f64,
    /// Weekly growth projected over a month
    pub monthly_projected: f64,
    /// Weekly growth projected over a year
    pub annual_projected: f64,
    /// False when the series is shorter than one week
    pub sufficient_data: bool,
}

/// Volatility band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stability {
    /// Score below 5
    #[default]
    VeryStable,
    /// Score below 15
    Stable,
    /// Score below 30
    Moderate,
    /// Score 30 or more
    Volatile,
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stability::VeryStable => write!(f, "very_stable"),
            Stability::Stable => write!(f, "stable"),
            Stability::Moderate => write!(f, "moderate"),
            Stability::Volatile => write!(f, "volatile"),
        }
    }
}

/// Dispersion of day-over-day changes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Volatility {
    /// Standard deviation of relative daily changes, in percent
    pub volatility_score: f64,
    /// Band the score falls into
    pub stability: Stability,
    /// Largest daily increase, in percent
    pub max_daily_increase: f64,
    /// Smallest daily change, in percent; positive when every day rose
    pub max_daily_decrease: f64,
    /// Share of days whose change stayed within the stable-day band
    pub stable_days_percentage: f64,
    /// Number of day-over-day changes observed
    pub observed_changes: usize,
}

/// First half versus second half of the series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "comparison", rename_all = "snake_case")]
pub enum PeriodComparison {
    /// Fewer samples than the comparison needs
    InsufficientData,
    /// Halves were compared
    Compared {
        /// Mean cost of the first half
        first_half_average: f64,
        /// Mean cost of the second half
        second_half_average: f64,
        /// Percent change from the first half to the second
        change_percentage: f64,
        /// Classification of the change
        trend: TrendDirection,
    },
}

/// Average cost on one weekday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayAverage {
    /// Day of week
    pub weekday: Weekday,
    /// Mean cost on that weekday
    pub average_cost: f64,
    /// Samples that fell on that weekday
    pub samples: usize,
}

/// Average cost in one calendar month, pooled across years
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthAverage {
    /// Month number, 1 = January
    pub month: u32,
    /// Mean daily cost in that month
    pub average_cost: f64,
    /// Samples that fell in that month
    pub samples: usize,
}

/// Day-of-week and month-of-year spending patterns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Seasonality {
    /// Averages for the weekdays present, Monday first
    pub weekday_averages: Vec<WeekdayAverage>,
    /// Whether the busiest weekday clearly outspends the quietest
    pub has_weekly_pattern: bool,
    /// Averages for the months present, January first
    pub monthly_averages: Vec<MonthAverage>,
    /// Whether the busiest month clearly outspends the quietest
    pub has_monthly_pattern: bool,
}

/// Basic totals over the analyzed series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Number of samples
    pub sample_count: usize,
    /// Sum of costs
    pub total_cost: f64,
    /// Mean daily cost
    pub average_daily_cost: f64,
    /// Calendar days missing between the first and last sample
    pub missing_days: usize,
}

/// Full trend characterization of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    /// Fitted direction
    pub direction: TrendDirection,
    /// Slope as a percentage of mean daily cost
    pub strength: f64,
    /// Fitted cost change per day
    pub slope: f64,
    /// Fitted cost at the first sample
    pub intercept: f64,
    /// Goodness of fit
    pub r_squared: f64,
    /// Support behind the fit
    pub confidence: TrendConfidence,
    /// Week-over-week growth
    pub growth_rate: GrowthRate,
    /// Day-over-day dispersion
    pub volatility: Volatility,
    /// Half-over-half comparison
    pub period_comparison: PeriodComparison,
    /// Weekday and month patterns
    pub seasonality: Seasonality,
    /// Totals
    pub summary: SeriesSummary,
}
