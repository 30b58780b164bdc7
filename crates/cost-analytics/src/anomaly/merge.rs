//! Merging findings from several detectors

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::types::Anomaly;

/// Keep the most severe finding per date, then rank by severity and
/// recency and cap the list
///
/// On a severity tie the finding seen first wins, so detector order decides.
pub fn merge_candidates(candidates: Vec<Anomaly>, max_results: usize) -> Vec<Anomaly> {
    let mut by_date: BTreeMap<NaiveDate, Anomaly> = BTreeMap::new();

    for candidate in candidates {
        match by_date.get(&candidate.date) {
            Some(existing) if existing.severity.rank() >= candidate.severity.rank() => {}
            _ => {
                by_date.insert(candidate.date, candidate);
            }
        }
    }

    let mut merged: Vec<Anomaly> = by_date.into_values().collect();
    merged.sort_by(|a, b| {
        b.severity
            .rank()
            .cmp(&a.severity.rank())
            .then_with(|| b.date.cmp(&a.date))
    });
    merged.truncate(max_results);
    merged
}
