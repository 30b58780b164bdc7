//! Templated recommendations and insights
//!
//! Pure mappings from structured results to user-facing text. No numbers
//! are computed here beyond what is needed to pick and fill a template.

use crate::anomaly::{AnomalyReport, AnomalyType, Severity};
use crate::config::TrendConfig;
use crate::forecast::{ForecastModel, ForecastResult};
use crate::stats::{mean, population_std};
use crate::trend::{Stability, TrendDirection, TrendResult};

use super::report::{Insight, InsightType};

/// Weekly growth (percent) above which budget alerts are suggested
const BUDGET_ALERT_GROWTH_PERCENT: f64 = 20.0;

/// Projected vs. current daily average change (percent) worth calling out
const FORECAST_CHANGE_PERCENT: f64 = 10.0;

/// Regression confidence below which projections are flagged as indicative
const LOW_FORECAST_CONFIDENCE: f64 = 0.7;

/// Recommendations for a trend result
///
/// `values` are the costs the trend was fitted on.
pub fn trend_recommendations(
    result: &TrendResult,
    values: &[f64],
    config: &TrendConfig,
) -> Vec<String> {
    if result.summary.sample_count < config.growth_window {
        return vec!["Collect more data for better trend analysis".to_string()];
    }

    let mut recommendations = direction_actions(result);

    if population_std(values) > mean(values) * config.high_variance_ratio {
        recommendations
            .push("Cost variance is high - investigate irregular spending patterns".to_string());
    }

    recommendations
}

fn direction_actions(result: &TrendResult) -> Vec<String> {
    match result.direction {
        TrendDirection::Increasing => {
            let mut actions = vec![
                "Investigate recent cost increases".to_string(),
                "Review resource utilization and optimization opportunities".to_string(),
            ];
            if result.growth_rate.weekly_growth_rate > BUDGET_ALERT_GROWTH_PERCENT {
                actions.push("Set up budget alerts to prevent cost overruns".to_string());
            }
            actions
        }
        TrendDirection::Decreasing => vec![
            "Monitor for any service disruptions causing cost reduction".to_string(),
            "Document optimization efforts for future reference".to_string(),
        ],
        TrendDirection::Stable => vec![
            "Cost trend is stable - continue monitoring".to_string(),
            "Consider proactive optimization to reduce baseline costs".to_string(),
        ],
    }
}

/// Recommendations for an anomaly report
pub fn anomaly_recommendations(report: &AnomalyReport) -> Vec<String> {
    if let Some(notice) = &report.notice {
        return vec![notice.message()];
    }

    let counts: Vec<String> = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ]
    .into_iter()
    .filter_map(|severity| {
        let count = report.count_by_severity(severity);
        (count > 0).then(|| format!("{} {}", count, severity))
    })
    .collect();

    let mut recommendations = vec![format!(
        "Detected {} cost anomalies ({})",
        report.anomalies.len(),
        counts.join(", ")
    )];

    if let Some(top) = report.anomalies.first() {
        for action in top.recommended_actions() {
            if !recommendations.contains(&action) {
                recommendations.push(action);
            }
        }
    }

    recommendations
}

/// Recommendations for a forecast
///
/// `current_daily_average` is the mean daily cost of the input series.
pub fn forecast_recommendations(
    forecast: &ForecastResult,
    current_daily_average: f64,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    match forecast.model_type {
        ForecastModel::ConstantZero => {
            return vec![
                "No spend recorded - forecast assumes the account stays idle".to_string(),
            ];
        }
        ForecastModel::SimpleAverage => recommendations.push(
            "Forecast uses the historical average - collect more data for a trend-based projection"
                .to_string(),
        ),
        ForecastModel::LinearRegression => {
            if forecast.confidence < LOW_FORECAST_CONFIDENCE {
                recommendations.push(
                    "Forecast confidence is low - treat projections as indicative".to_string(),
                );
            }
        }
    }

    if let Some(change) = projected_change_percent(forecast, current_daily_average) {
        if change > FORECAST_CHANGE_PERCENT {
            recommendations.push(format!(
                "Projected daily cost is {:.1}% above the current average - review the budget for the next {} days",
                change, forecast.horizon_days
            ));
        } else if change < -FORECAST_CHANGE_PERCENT {
            recommendations.push(format!(
                "Projected daily cost is {:.1}% below the current average",
                change.abs()
            ));
        }
    }

    if forecast.trend == TrendDirection::Increasing {
        recommendations.push("Set up budget alerts for the forecast period".to_string());
    }

    if recommendations.is_empty() {
        recommendations.push("Projected spend is in line with current costs".to_string());
    }

    recommendations
}

fn projected_change_percent(forecast: &ForecastResult, current_daily_average: f64) -> Option<f64> {
    if forecast.predictions.is_empty() || current_daily_average <= 0.0 {
        return None;
    }
    let projected = forecast.average_predicted_cost();
    Some((projected - current_daily_average) / current_daily_average * 100.0)
}

/// Ranked insights from the three analyses, highest impact first
pub fn derive_insights(
    trend: &TrendResult,
    anomalies: &AnomalyReport,
    forecast: &ForecastResult,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    let weekly = trend.growth_rate.weekly_growth_rate;
    match trend.direction {
        TrendDirection::Increasing => insights.push(insight(
            InsightType::TrendAnalysis,
            "Cost Growth Detected",
            format!(
                "Daily cost is rising by {:.2} per day; week-over-week growth is {:.1}% ({:.1}% projected monthly)",
                trend.slope, weekly, trend.growth_rate.monthly_projected
            ),
            3.0 + weekly.abs() / 5.0,
            direction_actions(trend),
        )),
        TrendDirection::Decreasing => insights.push(insight(
            InsightType::TrendAnalysis,
            "Cost Reduction Detected",
            format!(
                "Daily cost is falling by {:.2} per day; week-over-week change is {:.1}%",
                trend.slope.abs(),
                weekly
            ),
            2.0 + weekly.abs() / 10.0,
            direction_actions(trend),
        )),
        TrendDirection::Stable => {}
    }

    if trend.volatility.stability == Stability::Volatile {
        insights.push(insight(
            InsightType::Volatility,
            "Irregular Spending Pattern",
            format!(
                "Day-over-day volatility score is {:.1}; {:.0}% of days were stable",
                trend.volatility.volatility_score, trend.volatility.stable_days_percentage
            ),
            4.0 + trend.volatility.volatility_score / 20.0,
            vec![
                "Cost variance is high - investigate irregular spending patterns".to_string(),
                "Review scheduled and batch workloads for irregular runs".to_string(),
            ],
        ));
    }

    if let Some(top) = anomalies.anomalies.first() {
        let kind = match top.anomaly_type {
            AnomalyType::Spike => "spike",
            AnomalyType::Drop => "drop",
        };
        insights.push(insight(
            InsightType::AnomalyDetection,
            "Unusual Spending Detected",
            format!(
                "{} anomalous days; the most significant is a {} of {:.1}% on {} (cost {:.2})",
                anomalies.anomalies.len(),
                kind,
                top.deviation_percent,
                top.date,
                top.actual_cost
            ),
            severity_impact(anomalies.highest_severity()),
            top.recommended_actions(),
        ));
    }

    if forecast.model_type == ForecastModel::LinearRegression
        && forecast.trend == TrendDirection::Increasing
    {
        let change = projected_change_percent(forecast, trend.summary.average_daily_cost)
            .unwrap_or(0.0);
        insights.push(insight(
            InsightType::CostForecast,
            "Projected Cost Increase",
            format!(
                "Forecast projects {:.2} over the next {} days, {:.1}% above the current daily average, with {:.0}% confidence",
                forecast.total_predicted_cost,
                forecast.horizon_days,
                change,
                forecast.confidence * 100.0
            ),
            3.0 + change.max(0.0) / 5.0,
            vec![
                "Set up budget alerts for the forecast period".to_string(),
                "Review recent resource provisioning".to_string(),
            ],
        ));
    }

    insights.sort_by(|a, b| b.impact_score.total_cmp(&a.impact_score));
    insights
}

fn severity_impact(severity: Severity) -> f64 {
    match severity {
        Severity::Critical => 9.0,
        Severity::High => 7.5,
        Severity::Medium => 5.5,
        Severity::Low => 3.5,
        Severity::Info => 1.0,
    }
}

fn insight(
    insight_type: InsightType,
    title: &str,
    description: String,
    impact: f64,
    recommended_actions: Vec<String>,
) -> Insight {
    let impact = if impact.is_finite() { impact } else { 10.0 };
    Insight {
        insight_type,
        title: title.to_string(),
        description,
        impact_score: (impact.clamp(0.0, 10.0) * 10.0).round() / 10.0,
        recommended_actions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::AnomalyDetector;
    use crate::config::Sensitivity;
    use crate::forecast::Forecaster;
    use crate::series::CostSeries;
    use crate::trend::TrendAnalyzer;
    use chrono::NaiveDate;

    fn series(costs: &[f64]) -> CostSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        CostSeries::from_costs("acct-recs", start, costs).unwrap()
    }

    fn trend_recs(costs: &[f64]) -> Vec<String> {
        let s = series(costs);
        let result = TrendAnalyzer::default().analyze(&s);
        trend_recommendations(&result, &s.costs(), &TrendConfig::default())
    }

    #[test]
    fn test_short_series_asks_for_data() {
        assert_eq!(
            trend_recs(&[10.0, 12.0, 11.0]),
            vec!["Collect more data for better trend analysis".to_string()]
        );
    }

    #[test]
    fn test_stable_trend_recommendations() {
        let recs = trend_recs(&[100.0; 14]);
        assert_eq!(
            recs,
            vec![
                "Cost trend is stable - continue monitoring".to_string(),
                "Consider proactive optimization to reduce baseline costs".to_string(),
            ]
        );
    }

    #[test]
    fn test_fast_growth_adds_budget_alert() {
        // weekly averages 130 vs 270: growth well above 20%
        let costs: Vec<f64> = (0..21).map(|i| 100.0 + 10.0 * i as f64).collect();
        let recs = trend_recs(&costs);
        assert_eq!(recs[0], "Investigate recent cost increases");
        assert!(recs.contains(&"Set up budget alerts to prevent cost overruns".to_string()));
    }

    #[test]
    fn test_decreasing_trend_recommendations() {
        let costs: Vec<f64> = (0..14).map(|i| 200.0 - 5.0 * i as f64).collect();
        let recs = trend_recs(&costs);
        assert_eq!(
            recs[0],
            "Monitor for any service disruptions causing cost reduction"
        );
    }

    #[test]
    fn test_high_variance_flagged() {
        let costs: Vec<f64> = (0..14)
            .map(|i| if i % 2 == 0 { 10.0 } else { 100.0 })
            .collect();
        let recs = trend_recs(&costs);
        assert!(recs
            .iter()
            .any(|r| r == "Cost variance is high - investigate irregular spending patterns"));
    }

    #[test]
    fn test_anomaly_notice_becomes_recommendation() {
        let report = AnomalyDetector::default().detect(&series(&[5.0; 3]), Sensitivity::Medium);
        let recs = anomaly_recommendations(&report);
        assert_eq!(recs.len(), 1);
        assert!(recs[0].starts_with("Insufficient data"));
    }

    #[test]
    fn test_anomaly_summary_counts() {
        let mut costs = vec![100.0; 29];
        costs.push(5000.0);
        let report = AnomalyDetector::default().detect(&series(&costs), Sensitivity::Medium);
        let recs = anomaly_recommendations(&report);

        assert!(recs[0].starts_with(&format!("Detected {} cost anomalies", report.anomalies.len())));
        assert!(recs[0].contains("1 critical"));
        assert_eq!(recs[1], "Immediate investigation required");
    }

    #[test]
    fn test_forecast_recommendations() {
        let zero = Forecaster::default().forecast(&series(&[0.0; 10]), 7);
        assert_eq!(forecast_recommendations(&zero, 0.0).len(), 1);

        let costs: Vec<f64> = (0..30).map(|i| 100.0 + 10.0 * i as f64).collect();
        let s = series(&costs);
        let rising = Forecaster::default().forecast(&s, 30);
        let recs = forecast_recommendations(&rising, s.average_daily_cost());
        assert!(recs.iter().any(|r| r.starts_with("Projected daily cost is")));
        assert!(recs.contains(&"Set up budget alerts for the forecast period".to_string()));

        let flat = Forecaster::default().forecast(&series(&[50.0; 10]), 7);
        assert_eq!(
            forecast_recommendations(&flat, 50.0),
            vec!["Projected spend is in line with current costs".to_string()]
        );
    }

    #[test]
    fn test_insights_ranked_by_impact() {
        let mut costs: Vec<f64> = (0..30).map(|i| 100.0 + 10.0 * i as f64).collect();
        costs[29] = 5000.0;
        let s = series(&costs);

        let trend = TrendAnalyzer::default().analyze(&s);
        let anomalies = AnomalyDetector::default().detect(&s, Sensitivity::Medium);
        let forecast = Forecaster::default().forecast(&s, 30);
        let insights = derive_insights(&trend, &anomalies, &forecast);

        assert!(!insights.is_empty());
        assert!(insights
            .iter()
            .any(|i| i.insight_type == InsightType::AnomalyDetection));
        for pair in insights.windows(2) {
            assert!(pair[0].impact_score >= pair[1].impact_score);
        }
        for insight in &insights {
            assert!((0.0..=10.0).contains(&insight.impact_score));
            assert!(!insight.recommended_actions.is_empty());
        }
    }

    #[test]
    fn test_insights_are_reproducible() {
        let mut costs: Vec<f64> = (0..30).map(|i| 100.0 + 10.0 * i as f64).collect();
        costs[29] = 5000.0;
        let s = series(&costs);

        let trend = TrendAnalyzer::default().analyze(&s);
        let anomalies = AnomalyDetector::default().detect(&s, Sensitivity::Medium);
        let forecast = Forecaster::default().forecast(&s, 30);

        let first = derive_insights(&trend, &anomalies, &forecast);
        let second = derive_insights(&trend, &anomalies, &forecast);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_flat_series_has_no_insights() {
        let s = series(&[100.0; 20]);
        let trend = TrendAnalyzer::default().analyze(&s);
        let anomalies = AnomalyDetector::default().detect(&s, Sensitivity::High);
        let forecast = Forecaster::default().forecast(&s, 7);
        assert!(derive_insights(&trend, &anomalies, &forecast).is_empty());
    }
}
