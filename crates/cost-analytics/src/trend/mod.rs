//! Trend analysis over daily cost series
//!
//! This module provides:
//! - Least-squares trend direction and strength
//! - Week-over-week growth with monthly and annual projections
//! - Day-over-day volatility scoring
//! - First-half versus second-half comparison
//! - Day-of-week and month-of-year spending patterns

mod analyzer;
mod types;

pub use analyzer::{OverallTrend, TrendAnalyzer};
pub use types::{
    GrowthRate, MonthAverage, PeriodComparison, Seasonality, SeriesSummary, Stability,
    TrendConfidence, TrendDirection, TrendResult, Volatility, WeekdayAverage,
};
