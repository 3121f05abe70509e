use crate::data::bar::BarError;
use chrono::{DateTime, Utc};
use thiserror::Error;

//fatal precondition failures, reported before any bar is processed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BacktestError {
    #[error("Bar series is empty: at least one bar is required to run a backtest")]
    EmptySeries,

    #[error(
        "Timestamps must be strictly increasing: bar {index} at {current} does not come after {previous}"
    )]
    NonMonotonicTimestamp {
        index: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },

    #[error("Invalid bar at index {index}: {source}")]
    InvalidBar {
        index: usize,
        #[source]
        source: BarError,
    },

    #[error("Initial capital must be a positive number, got {0}")]
    NonPositiveCapital(f64),

    #[error("Unknown strategy '{0}': expected one of MA_CROSSOVER, RSI_OVERSOLD, MACD_CROSSOVER, BOLLINGER_BANDS")]
    UnknownStrategy(String),

    #[error("Unknown parameter '{name}' for strategy {strategy}: accepted parameters are {accepted}")]
    UnknownParameter {
        strategy: &'static str,
        name: String,
        accepted: String,
    },

    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}
