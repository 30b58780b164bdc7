//! Daily cost forecasting

mod forecaster;
mod types;

pub use forecaster::Forecaster;
pub use types::*;
