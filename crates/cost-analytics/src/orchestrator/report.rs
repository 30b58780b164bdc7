//! Reports handed back to the API layer

use crate::anomaly::AnomalyReport;
use crate::forecast::ForecastResult;
use crate::trend::TrendResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::request::AnalysisType;

/// Area an insight is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    /// Sustained cost movement
    TrendAnalysis,
    /// Irregular day-to-day spending
    Volatility,
    /// Unusual individual days
    AnomalyDetection,
    /// Projected spend
    CostForecast,
}

/// A ranked finding distilled from the combined analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    /// Area the insight is about
    pub insight_type: InsightType,
    /// Short headline
    pub title: String,
    /// One-sentence explanation with the figures behind it
    pub description: String,
    /// Importance on a 0-10 scale
    pub impact_score: f64,
    /// Suggested next steps
    pub recommended_actions: Vec<String>,
}

/// Every analysis run for an insights request, plus the derived insights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsResult {
    /// Trend analysis
    pub trend: TrendResult,
    /// Anomaly detection
    pub anomalies: AnomalyReport,
    /// Forecast over the requested horizon
    pub forecast: ForecastResult,
    /// Insights, highest impact first
    pub insights: Vec<Insight>,
}

/// Structured result of one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "analysis_type", content = "result", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    /// Trend analysis result
    Trend(TrendResult),
    /// Anomaly detection result
    Anomaly(AnomalyReport),
    /// Forecast result
    Forecast(ForecastResult),
    /// Combined insights
    Insights(Box<InsightsResult>),
}

impl AnalysisOutcome {
    /// Analysis that produced this outcome
    pub fn analysis_type(&self) -> AnalysisType {
        match self {
            AnalysisOutcome::Trend(_) => AnalysisType::Trend,
            AnalysisOutcome::Anomaly(_) => AnalysisType::Anomaly,
            AnalysisOutcome::Forecast(_) => AnalysisType::Forecast,
            AnalysisOutcome::Insights(_) => AnalysisType::Insights,
        }
    }
}

/// Report returned for an [`AnalysisRequest`](super::AnalysisRequest)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Report ID
    pub report_id: Uuid,
    /// Account analyzed
    pub account_id: String,
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
    /// Structured result
    pub outcome: AnalysisOutcome,
    /// Templated recommendations for the notification layer
    pub recommendations: Vec<String>,
}

impl AnalysisReport {
    /// Stamp a new report
    pub fn new(
        account_id: impl Into<String>,
        outcome: AnalysisOutcome,
        recommendations: Vec<String>,
    ) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            account_id: account_id.into(),
            generated_at: Utc::now(),
            outcome,
            recommendations,
        }
    }

    /// Analysis that produced this report
    pub fn analysis_type(&self) -> AnalysisType {
        self.outcome.analysis_type()
    }

    /// Trend result, when the report carries one
    pub fn trend(&self) -> Option<&TrendResult> {
        match &self.outcome {
            AnalysisOutcome::Trend(trend) => Some(trend),
            AnalysisOutcome::Insights(insights) => Some(&insights.trend),
            _ => None,
        }
    }

    /// Anomaly report, when the report carries one
    pub fn anomalies(&self) -> Option<&AnomalyReport> {
        match &self.outcome {
            AnalysisOutcome::Anomaly(report) => Some(report),
            AnalysisOutcome::Insights(insights) => Some(&insights.anomalies),
            _ => None,
        }
    }

    /// Forecast, when the report carries one
    pub fn forecast(&self) -> Option<&ForecastResult> {
        match &self.outcome {
            AnalysisOutcome::Forecast(forecast) => Some(forecast),
            AnalysisOutcome::Insights(insights) => Some(&insights.forecast),
            _ => None,
        }
    }

    /// Insights, for an insights report
    pub fn insights(&self) -> Option<&[Insight]> {
        match &self.outcome {
            AnalysisOutcome::Insights(insights) => Some(&insights.insights),
            _ => None,
        }
    }
}
