//! Daily cost series consumed by every analyzer

use crate::error::{CostAnalyticsError, CostAnalyticsResult};
use chrono::{Duration as ChronoDuration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One day of spend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostSample {
    /// Calendar day
    pub date: NaiveDate,
    /// Cost for the day
    pub cost: f64,
}

impl CostSample {
    /// Create a sample
    pub fn new(date: NaiveDate, cost: f64) -> Self {
        Self { date, cost }
    }
}

/// Ordered daily costs for one account
///
/// Samples are strictly ascending by date. Gaps are allowed; analyzers use
/// the sample index as the time axis, not the calendar distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCostSeries")]
pub struct CostSeries {
    account_id: String,
    samples: Vec<CostSample>,
}

#[derive(Deserialize)]
struct RawCostSeries {
    account_id: String,
    #[serde(default)]
    samples: Vec<CostSample>,
}

impl TryFrom<RawCostSeries> for CostSeries {
    type Error = CostAnalyticsError;

    fn try_from(raw: RawCostSeries) -> Result<Self, Self::Error> {
        CostSeries::new(raw.account_id, raw.samples)
    }
}

impl CostSeries {
    /// Build a series, rejecting negative or non-finite costs and
    /// out-of-order dates
    pub fn new(
        account_id: impl Into<String>,
        mut samples: Vec<CostSample>,
    ) -> CostAnalyticsResult<Self> {
        for (index, sample) in samples.iter_mut().enumerate() {
            if !sample.cost.is_finite() {
                return Err(CostAnalyticsError::InvalidSample {
                    index,
                    reason: format!("cost {} is not finite", sample.cost),
                });
            }
            if sample.cost < 0.0 {
                return Err(CostAnalyticsError::InvalidSample {
                    index,
                    reason: format!("cost {} is negative", sample.cost),
                });
            }
            // fold -0.0 into 0.0
            sample.cost += 0.0;
        }

        for (index, pair) in samples.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(CostAnalyticsError::UnorderedSamples {
                    index: index + 1,
                    previous: pair[0].date,
                    current: pair[1].date,
                });
            }
        }

        Ok(Self {
            account_id: account_id.into(),
            samples,
        })
    }

    /// Build a contiguous series of consecutive days starting at `start`
    pub fn from_costs(
        account_id: impl Into<String>,
        start: NaiveDate,
        costs: &[f64],
    ) -> CostAnalyticsResult<Self> {
        let samples = costs
            .iter()
            .enumerate()
            .map(|(i, &cost)| CostSample::new(start + ChronoDuration::days(i as i64), cost))
            .collect();
        Self::new(account_id, samples)
    }

    /// An empty series for an account with no billing data yet
    pub fn empty(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            samples: Vec::new(),
        }
    }

    /// Parse and validate a series from JSON
    pub fn from_json_str(json: &str) -> CostAnalyticsResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Account the series belongs to
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Samples in date order
    pub fn samples(&self) -> &[CostSample] {
        &self.samples
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the series has no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Costs in date order
    pub fn costs(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.cost).collect()
    }

    /// Date of the sample at `index`
    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        self.samples.get(index).map(|s| s.date)
    }

    /// First sample date
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.samples.first().map(|s| s.date)
    }

    /// Last sample date
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.samples.last().map(|s| s.date)
    }

    /// Sum of all costs
    pub fn total_cost(&self) -> f64 {
        self.samples.iter().map(|s| s.cost).sum()
    }

    /// Mean daily cost, 0 for an empty series
    pub fn average_daily_cost(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.total_cost() / self.samples.len() as f64
        }
    }

    /// Calendar days between the first and last sample that have no sample
    pub fn missing_days(&self) -> usize {
        match (self.first_date(), self.last_date()) {
            (Some(first), Some(last)) => {
                let span = (last - first).num_days() as usize + 1;
                span.saturating_sub(self.samples.len())
            }
            _ => 0,
        }
    }

    /// Whether every sample is exactly zero (false for an empty series)
    pub fn is_all_zero(&self) -> bool {
        !self.samples.is_empty() && self.samples.iter().all(|s| s.cost == 0.0)
    }

    /// Number of distinct cost values
    pub fn distinct_values(&self) -> usize {
        self.samples
            .iter()
            .map(|s| s.cost.to_bits())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_from_costs_builds_contiguous_days() {
        let series = CostSeries::from_costs("acct-1", day(1), &[10.0, 20.0, 30.0]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.account_id(), "acct-1");
        assert_eq!(series.first_date(), Some(day(1)));
        assert_eq!(series.last_date(), Some(day(3)));
        assert_eq!(series.missing_days(), 0);
        assert_eq!(series.total_cost(), 60.0);
        assert_eq!(series.average_daily_cost(), 20.0);
    }

    #[test]
    fn test_gaps_are_allowed_and_counted() {
        let samples = vec![
            CostSample::new(day(1), 5.0),
            CostSample::new(day(2), 5.0),
            CostSample::new(day(6), 5.0),
        ];
        let series = CostSeries::new("acct-1", samples).unwrap();
        assert_eq!(series.missing_days(), 3);
    }

    #[test]
    fn test_negative_cost_rejected() {
        let result = CostSeries::from_costs("acct-1", day(1), &[1.0, -2.0]);
        assert!(matches!(
            result,
            Err(CostAnalyticsError::InvalidSample { index: 1, .. })
        ));
    }

    #[test]
    fn test_non_finite_cost_rejected() {
        let result = CostSeries::from_costs("acct-1", day(1), &[f64::NAN]);
        assert!(matches!(
            result,
            Err(CostAnalyticsError::InvalidSample { index: 0, .. })
        ));
    }

    #[test]
    fn test_unordered_dates_rejected() {
        let samples = vec![
            CostSample::new(day(2), 1.0),
            CostSample::new(day(2), 1.0),
        ];
        assert!(matches!(
            CostSeries::new("acct-1", samples),
            Err(CostAnalyticsError::UnorderedSamples { index: 1, .. })
        ));
    }

    #[test]
    fn test_empty_series() {
        let series = CostSeries::empty("acct-1");
        assert!(series.is_empty());
        assert_eq!(series.average_daily_cost(), 0.0);
        assert_eq!(series.missing_days(), 0);
        assert!(!series.is_all_zero());
        assert_eq!(series.distinct_values(), 0);
    }

    #[test]
    fn test_all_zero_and_distinct_values() {
        let zero = CostSeries::from_costs("acct-1", day(1), &[0.0, -0.0, 0.0]).unwrap();
        assert!(zero.is_all_zero());
        assert_eq!(zero.distinct_values(), 1);

        let mixed = CostSeries::from_costs("acct-1", day(1), &[1.0, 2.0, 1.0]).unwrap();
        assert!(!mixed.is_all_zero());
        assert_eq!(mixed.distinct_values(), 2);
    }

    #[test]
    fn test_json_roundtrip_validates() {
        let json = r#"{
            "account_id": "123456789012",
            "samples": [
                { "date": "2024-01-01", "cost": 12.5 },
                { "date": "2024-01-02", "cost": 13.0 }
            ]
        }"#;
        let series = CostSeries::from_json_str(json).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.date_at(1), Some(day(2)));

        let bad = r#"{ "account_id": "a", "samples": [ { "date": "2024-01-01", "cost": -1 } ] }"#;
        assert!(matches!(
            CostSeries::from_json_str(bad),
            Err(CostAnalyticsError::JsonError { .. })
        ));
    }
}
