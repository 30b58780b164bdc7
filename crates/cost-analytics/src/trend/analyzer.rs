//! Trend characterization of a daily cost series

use crate::config::TrendConfig;
use crate::series::CostSeries;
use crate::stats::{mean, sample_std, LinearFit};
use chrono::Datelike;
use tracing::debug;

use super::types::*;

/// Slope, growth, volatility and period comparison over a cost series
#[derive(Debug, Clone, Default)]
pub struct TrendAnalyzer {
    config: TrendConfig,
}

/// Fitted line plus its classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverallTrend {
    /// Fitted direction
    pub direction: TrendDirection,
    /// Slope as a percentage of mean cost
    pub strength: f64,
    /// Cost change per day
    pub slope: f64,
    /// Fitted value at the first sample
    pub intercept: f64,
    /// Goodness of fit
    pub r_squared: f64,
    /// Support behind the fit
    pub confidence: TrendConfidence,
}

impl OverallTrend {
    fn flat(confidence: TrendConfidence, level: f64) -> Self {
        Self {
            direction: TrendDirection::Stable,
            strength: 0.0,
            slope: 0.0,
            intercept: level,
            r_squared: 0.0,
            confidence,
        }
    }
}

impl TrendAnalyzer {
    /// Create a new trend analyzer
    pub fn new(config: TrendConfig) -> Self {
        Self { config }
    }

    /// Analyzer configuration
    pub fn config(&self) -> &TrendConfig {
        &self.config
    }

    /// Characterize the series. Never fails; short or flat series get a
    /// stable, low-support result.
    pub fn analyze(&self, series: &CostSeries) -> TrendResult {
        let values = series.costs();
        let overall = self.overall_trend(&values);

        debug!(
            account_id = series.account_id(),
            samples = values.len(),
            direction = %overall.direction,
            slope = overall.slope,
            "Trend fitted"
        );

        TrendResult {
            direction: overall.direction,
            strength: overall.strength,
            slope: overall.slope,
            intercept: overall.intercept,
            r_squared: overall.r_squared,
            confidence: overall.confidence,
            growth_rate: self.growth_rate(&values),
            volatility: self.volatility(&values),
            period_comparison: self.compare_periods(&values),
            seasonality: self.seasonality(series),
            summary: SeriesSummary {
                sample_count: series.len(),
                total_cost: series.total_cost(),
                average_daily_cost: series.average_daily_cost(),
                missing_days: series.missing_days(),
            },
        }
    }

    /// Least-squares trend over the sample index
    pub fn overall_trend(&self, values: &[f64]) -> OverallTrend {
        if values.len() < 2 {
            return OverallTrend::flat(TrendConfidence::Low, mean(values));
        }

        if values.iter().all(|&v| v == values[0]) {
            return OverallTrend::flat(TrendConfidence::High, values[0]);
        }

        let Some(fit) = LinearFit::fit(values) else {
            return OverallTrend::flat(TrendConfidence::Low, mean(values));
        };

        let avg = mean(values);
        let strength = if avg != 0.0 {
            fit.slope.abs() / avg * 100.0
        } else {
            0.0
        };

        let confidence = if values.len() > self.config.high_confidence_samples {
            TrendConfidence::High
        } else {
            TrendConfidence::Medium
        };

        OverallTrend {
            direction: TrendDirection::from_slope(fit.slope, self.config.slope_threshold),
            strength,
            slope: fit.slope,
            intercept: fit.intercept,
            r_squared: fit.r_squared(values),
            confidence,
        }
    }

    /// First-week versus last-week growth
    pub fn growth_rate(&self, values: &[f64]) -> GrowthRate {
        let window = self.config.growth_window;
        if values.len() < window {
            return GrowthRate::default();
        }

        let first_avg = mean(&values[..window]);
        let last_avg = mean(&values[values.len() - window..]);

        let weekly = percent_change(first_avg, last_avg);

        GrowthRate {
            weekly_growth_rate: weekly,
            monthly_projected: weekly * self.config.monthly_factor,
            annual_projected: weekly * self.config.annual_factor,
            sufficient_data: true,
        }
    }

    /// Dispersion of relative day-over-day changes
    pub fn volatility(&self, values: &[f64]) -> Volatility {
        if values.len() < 2 {
            return Volatility::default();
        }

        let eps = self.config.volatility_epsilon;
        let deltas: Vec<f64> = values
            .windows(2)
            .map(|pair| (pair[1] - pair[0]) / (pair[0] + eps))
            .collect();

        let score = sample_std(&deltas) * 100.0;
        let max_increase = deltas.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let max_decrease = deltas.iter().copied().fold(f64::INFINITY, f64::min);
        let stable_days = deltas
            .iter()
            .filter(|d| d.abs() < self.config.stable_day_delta)
            .count();

        Volatility {
            volatility_score: score,
            stability: self.classify_volatility(score),
            max_daily_increase: max_increase * 100.0,
            max_daily_decrease: max_decrease * 100.0,
            stable_days_percentage: stable_days as f64 / deltas.len() as f64 * 100.0,
            observed_changes: deltas.len(),
        }
    }

    /// Map a volatility score to its band
    pub fn classify_volatility(&self, score: f64) -> Stability {
        let [very_stable, stable, moderate] = self.config.volatility_bands;
        if score < very_stable {
            Stability::VeryStable
        } else if score < stable {
            Stability::Stable
        } else if score < moderate {
            Stability::Moderate
        } else {
            Stability::Volatile
        }
    }

    /// Compare the mean of the first half with the second half
    pub fn compare_periods(&self, values: &[f64]) -> PeriodComparison {
        if values.len() < self.config.period_min_samples {
            return PeriodComparison::InsufficientData;
        }

        let mid = values.len() / 2;
        let first_half_average = mean(&values[..mid]);
        let second_half_average = mean(&values[mid..]);
        let change_percentage = percent_change(first_half_average, second_half_average);

        let threshold = self.config.period_change_percent;
        let trend = if change_percentage > threshold {
            TrendDirection::Increasing
        } else if change_percentage < -threshold {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        };

        PeriodComparison::Compared {
            first_half_average,
            second_half_average,
            change_percentage,
            trend,
        }
    }

    /// Average cost per calendar weekday and per calendar month
    pub fn seasonality(&self, series: &CostSeries) -> Seasonality {
        let mut weekday_buckets = [(0.0_f64, 0_usize); 7];
        let mut month_buckets = [(0.0_f64, 0_usize); 12];

        for sample in series.samples() {
            let day = sample.date.weekday().num_days_from_monday() as usize;
            weekday_buckets[day].0 += sample.cost;
            weekday_buckets[day].1 += 1;

            let month = sample.date.month0() as usize;
            month_buckets[month].0 += sample.cost;
            month_buckets[month].1 += 1;
        }

        let weekday_averages: Vec<WeekdayAverage> = (0..7)
            .filter(|&day| weekday_buckets[day].1 > 0)
            .map(|day| {
                let (sum, count) = weekday_buckets[day];
                WeekdayAverage {
                    weekday: weekday_from_index(day),
                    average_cost: sum / count as f64,
                    samples: count,
                }
            })
            .collect();

        let monthly_averages: Vec<MonthAverage> = (0..12)
            .filter(|&month| month_buckets[month].1 > 0)
            .map(|month| {
                let (sum, count) = month_buckets[month];
                MonthAverage {
                    month: month as u32 + 1,
                    average_cost: sum / count as f64,
                    samples: count,
                }
            })
            .collect();

        // A weekly pattern needs every weekday observed
        let has_weekly_pattern = weekday_averages.len() == 7
            && self.exceeds_pattern_ratio(weekday_averages.iter().map(|w| w.average_cost));
        let has_monthly_pattern = monthly_averages.len() >= 2
            && self.exceeds_pattern_ratio(monthly_averages.iter().map(|m| m.average_cost));

        Seasonality {
            weekday_averages,
            has_weekly_pattern,
            monthly_averages,
            has_monthly_pattern,
        }
    }

    /// Max/min ratio above the configured pattern ratio, with a non-zero minimum
    fn exceeds_pattern_ratio(&self, averages: impl Iterator<Item = f64> + Clone) -> bool {
        let max = averages.clone().fold(f64::NEG_INFINITY, f64::max);
        let min = averages.fold(f64::INFINITY, f64::min);
        min > 0.0 && max / min > self.config.seasonal_pattern_ratio
    }
}

/// Percent change from `before` to `after`, 0 when `before` is zero
fn percent_change(before: f64, after: f64) -> f64 {
    if before == 0.0 {
        0.0
    } else {
        (after - before) / before * 100.0
    }
}

fn weekday_from_index(day: usize) -> chrono::Weekday {
    use chrono::Weekday::*;
    [Mon, Tue, Wed, Thu, Fri, Sat, Sun][day]
}
