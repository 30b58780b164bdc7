//! Single call surface for the API layer

use crate::anomaly::AnomalyDetector;
use crate::config::AnalyticsConfig;
use crate::error::{CostAnalyticsError, CostAnalyticsResult};
use crate::forecast::Forecaster;
use crate::series::CostSeries;
use crate::trend::TrendAnalyzer;
use tracing::info;

use super::recommendations::*;
use super::report::*;
use super::request::{AnalysisRequest, AnalysisType};

/// Dispatches analysis requests and attaches recommendations
///
/// Holds no per-call state, so one instance can serve any number of
/// concurrent callers.
#[derive(Debug, Clone)]
pub struct AnalyticsOrchestrator {
    config: AnalyticsConfig,
    trend: TrendAnalyzer,
    anomaly: AnomalyDetector,
    forecast: Forecaster,
}

impl AnalyticsOrchestrator {
    /// Create an orchestrator, rejecting an invalid configuration
    pub fn new(config: AnalyticsConfig) -> CostAnalyticsResult<Self> {
        config.validate()?;

        Ok(Self {
            trend: TrendAnalyzer::new(config.trend.clone()),
            anomaly: AnomalyDetector::new(config.anomaly.clone()),
            forecast: Forecaster::new(config.forecast.clone()),
            config,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Run the requested analysis over `series`
    ///
    /// Fails only on a malformed request; the analyses themselves always
    /// produce a report.
    pub fn analyze(
        &self,
        request: &AnalysisRequest,
        series: &CostSeries,
    ) -> CostAnalyticsResult<AnalysisReport> {
        if request.account_id != series.account_id() {
            return Err(CostAnalyticsError::AccountMismatch {
                requested: request.account_id.clone(),
                actual: series.account_id().to_string(),
            });
        }

        info!(
            "Running {} analysis for account {} over {} samples",
            request.analysis_type,
            request.account_id,
            series.len()
        );

        let (outcome, recommendations) = match request.analysis_type {
            AnalysisType::Trend => {
                let result = self.trend.analyze(series);
                let recommendations =
                    trend_recommendations(&result, &series.costs(), &self.config.trend);
                (AnalysisOutcome::Trend(result), recommendations)
            }
            AnalysisType::Anomaly => {
                let report = self.anomaly.detect(series, request.sensitivity);
                let recommendations = anomaly_recommendations(&report);
                (AnalysisOutcome::Anomaly(report), recommendations)
            }
            AnalysisType::Forecast => {
                let horizon = request.resolve_horizon(&self.config.forecast)?;
                let result = self.forecast.forecast(series, horizon);
                let recommendations =
                    forecast_recommendations(&result, series.average_daily_cost());
                (AnalysisOutcome::Forecast(result), recommendations)
            }
            AnalysisType::Insights => {
                let horizon = request.resolve_horizon(&self.config.forecast)?;
                let insights = self.insights(request, series, horizon);
                let recommendations = combined_recommendations(&insights);
                (AnalysisOutcome::Insights(Box::new(insights)), recommendations)
            }
        };

        let report = AnalysisReport::new(request.account_id.clone(), outcome, recommendations);

        info!(
            "Completed {} analysis for account {}: report {} with {} recommendations",
            request.analysis_type,
            report.account_id,
            report.report_id,
            report.recommendations.len()
        );

        Ok(report)
    }

    fn insights(
        &self,
        request: &AnalysisRequest,
        series: &CostSeries,
        horizon: u32,
    ) -> InsightsResult {
        let trend = self.trend.analyze(series);
        let anomalies = self.anomaly.detect(series, request.sensitivity);
        let forecast = self.forecast.forecast(series, horizon);
        let insights = derive_insights(&trend, &anomalies, &forecast);

        InsightsResult {
            trend,
            anomalies,
            forecast,
            insights,
        }
    }
}

/// Actions of every insight in rank order, or the stable-trend advice when
/// nothing stood out
fn combined_recommendations(result: &InsightsResult) -> Vec<String> {
    let mut recommendations: Vec<String> = Vec::new();

    for insight in &result.insights {
        for action in &insight.recommended_actions {
            if !recommendations.contains(action) {
                recommendations.push(action.clone());
            }
        }
    }

    if recommendations.is_empty() {
        recommendations.push("Cost trend is stable - continue monitoring".to_string());
    }

    recommendations
}
