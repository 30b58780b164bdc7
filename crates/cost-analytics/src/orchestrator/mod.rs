//! Request dispatch and recommendation templates

mod dispatcher;
mod recommendations;
mod report;
mod request;

pub use dispatcher::AnalyticsOrchestrator;
pub use recommendations::{
    anomaly_recommendations, derive_insights, forecast_recommendations, trend_recommendations,
};
pub use report::*;
pub use request::{AnalysisRequest, AnalysisType};
