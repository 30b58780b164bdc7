use approx::assert_relative_eq;
use chrono::NaiveDate;
use stratoswarm_cost_analytics::{
    forecast::ForecastModel,
    trend::{PeriodComparison, Stability, TrendConfidence},
    AnalysisRequest, AnalysisType, AnalyticsConfig, AnalyticsOrchestrator, AnomalyDetector,
    CostAnalyticsError, CostSeries, DetectionMethod, DetectionNotice, Forecaster, Sensitivity,
    Severity, TrendAnalyzer, TrendDirection,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn series(costs: &[f64]) -> CostSeries {
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    CostSeries::from_costs("acct-integration", start, costs).unwrap()
}

#[test]
fn test_flat_series_is_quiet() {
    init_tracing();
    let s = series(&[100.0; 10]);

    let trend = TrendAnalyzer::default().analyze(&s);
    assert_eq!(trend.direction, TrendDirection::Stable);
    assert_eq!(trend.confidence, TrendConfidence::High);
    assert_eq!(trend.volatility.stability, Stability::VeryStable);

    let report = AnomalyDetector::default().detect(&s, Sensitivity::High);
    assert!(report.anomalies.is_empty());
    assert_eq!(report.notice, Some(DetectionNotice::NoSignificantAnomalies));
}

#[test]
fn test_final_spike_is_critical() {
    init_tracing();
    let mut costs = vec![100.0; 29];
    costs.push(5000.0);
    let report = AnomalyDetector::default().detect(&series(&costs), Sensitivity::Medium);

    let last_day = NaiveDate::from_ymd_opt(2024, 3, 30).unwrap();
    let spike = report
        .anomalies
        .iter()
        .find(|a| a.date == last_day)
        .expect("last day flagged");
    assert!(spike.severity >= Severity::High);
    assert_eq!(spike.severity, Severity::Critical);
    assert_eq!(spike.method, DetectionMethod::Statistical);
    assert_eq!(report.anomalies[0].date, last_day);
}

#[test]
fn test_empty_series_forecast() {
    init_tracing();
    let result = Forecaster::default().forecast(&CostSeries::empty("acct-new"), 5);

    assert_eq!(result.predictions.len(), 5);
    assert!(result.predictions.iter().all(|p| p.predicted_cost == 0.0));
    assert!(matches!(
        result.model_type,
        ForecastModel::SimpleAverage | ForecastModel::ConstantZero
    ));
}

#[test]
fn test_linear_growth_trend_and_forecast() {
    init_tracing();
    let costs: Vec<f64> = (0..30).map(|i| 100.0 + 10.0 * i as f64).collect();
    let s = series(&costs);

    let trend = TrendAnalyzer::default().analyze(&s);
    assert_eq!(trend.direction, TrendDirection::Increasing);
    assert_relative_eq!(trend.slope, 10.0, epsilon = 1e-9);
    assert!(matches!(
        trend.period_comparison,
        PeriodComparison::Compared {
            trend: TrendDirection::Increasing,
            ..
        }
    ));

    let forecast = Forecaster::default().forecast(&s, 30);
    assert_eq!(forecast.trend, TrendDirection::Increasing);
    let day_31 = &forecast.predictions[0];
    let mae = forecast.model_performance.unwrap().mae;
    assert!((day_31.predicted_cost - 400.0).abs() <= mae + 1e-6);
    assert_eq!(day_31.date, NaiveDate::from_ymd_opt(2024, 3, 31));
}

#[test]
fn test_three_day_series_gets_insufficient_data_notice() {
    init_tracing();
    let s = series(&[10.0, 500.0, 10.0]);
    for sensitivity in [Sensitivity::Low, Sensitivity::Medium, Sensitivity::High] {
        let report = AnomalyDetector::default().detect(&s, sensitivity);
        assert!(report.is_informational());
        assert!(matches!(
            report.notice,
            Some(DetectionNotice::InsufficientData { available: 3, .. })
        ));
    }
}

#[test]
fn test_sensitivity_changes_what_is_flagged() {
    init_tracing();
    let mut costs: Vec<f64> = (0..28).map(|i| 100.0 + ((i * 7) % 11) as f64 * 3.0).collect();
    costs[10] = 150.0;
    costs[20] = 400.0;
    let s = series(&costs);

    let detector = AnomalyDetector::default();
    let low = detector.detect(&s, Sensitivity::Low);
    let medium = detector.detect(&s, Sensitivity::Medium);
    let high = detector.detect(&s, Sensitivity::High);

    assert!(low.anomalies.len() <= medium.anomalies.len());
    assert!(medium.anomalies.len() <= high.anomalies.len());

    let big_spike = NaiveDate::from_ymd_opt(2024, 3, 21).unwrap();
    assert!(low.anomalies.iter().any(|a| a.date == big_spike));
    assert!(high.anomalies.iter().any(|a| a.date == big_spike));
}

#[test]
fn test_series_from_json_and_report_to_json() {
    init_tracing();
    let json = r#"{
        "account_id": "acct-json",
        "samples": [
            { "date": "2024-05-01", "cost": 12.5 },
            { "date": "2024-05-02", "cost": 13.0 },
            { "date": "2024-05-04", "cost": 14.5 }
        ]
    }"#;
    let s = CostSeries::from_json_str(json).unwrap();
    assert_eq!(s.len(), 3);
    assert_eq!(s.missing_days(), 1);

    let orchestrator = AnalyticsOrchestrator::new(AnalyticsConfig::default()).unwrap();
    let request = AnalysisRequest::new("acct-json", AnalysisType::Forecast).with_horizon(3);
    let report = orchestrator.analyze(&request, &s).unwrap();

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["account_id"], "acct-json");
    assert_eq!(value["outcome"]["analysis_type"], "forecast");
    assert_eq!(value["outcome"]["result"]["model_type"], "linear_regression");
    assert_eq!(
        value["outcome"]["result"]["predictions"][0]["date"],
        "2024-05-05"
    );
    assert!(value["report_id"].is_string());
    assert!(value["recommendations"].is_array());
}

#[test]
fn test_anomaly_json_shape() {
    init_tracing();
    let mut costs = vec![100.0; 29];
    costs.push(5000.0);
    let report = AnomalyDetector::default().detect(&series(&costs), Sensitivity::Medium);

    let value = serde_json::to_value(&report).unwrap();
    let top = &value["anomalies"][0];
    assert_eq!(top["severity"], "critical");
    assert_eq!(top["method"], "statistical");
    assert_eq!(top["anomaly_type"], "spike");
    assert!(top["expected_cost"].is_number());
    assert!(value["notice"].is_null());
}

#[test]
fn test_invalid_series_json_rejected() {
    let negative = r#"{ "account_id": "a", "samples": [ { "date": "2024-05-01", "cost": -1.0 } ] }"#;
    assert!(CostSeries::from_json_str(negative).is_err());

    let unordered = r#"{ "account_id": "a", "samples": [
        { "date": "2024-05-02", "cost": 1.0 },
        { "date": "2024-05-01", "cost": 1.0 }
    ] }"#;
    assert!(CostSeries::from_json_str(unordered).is_err());
}

#[test]
fn test_request_parsing_from_api_strings() {
    let analysis_type: AnalysisType = "anomaly_detection".parse().unwrap();
    let sensitivity: Sensitivity = "high".parse().unwrap();
    let request = AnalysisRequest::new("acct-api", analysis_type).with_sensitivity(sensitivity);
    assert_eq!(request.analysis_type, AnalysisType::Anomaly);

    assert!(matches!(
        "quarterly".parse::<AnalysisType>(),
        Err(CostAnalyticsError::UnknownAnalysisType { .. })
    ));
}

#[test]
fn test_custom_config_changes_behavior() {
    init_tracing();
    let config = AnalyticsConfig::from_json_str(r#"{ "anomaly": { "max_results": 1 } }"#).unwrap();
    let orchestrator = AnalyticsOrchestrator::new(config).unwrap();

    let costs: Vec<f64> = (0..40)
        .map(|i| if i % 8 == 0 { 900.0 } else { 100.0 })
        .collect();
    let request = AnalysisRequest::new("acct-integration", AnalysisType::Anomaly)
        .with_sensitivity(Sensitivity::High);
    let report = orchestrator.analyze(&request, &series(&costs)).unwrap();

    assert_eq!(report.anomalies().unwrap().anomalies.len(), 1);
}
