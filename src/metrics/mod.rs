pub mod summary;
pub mod timeseries;

pub use summary::{calculate_sharpe_ratio, SummaryMetrics};
pub use timeseries::{
    calculate_returns, drawdown_pct, max_drawdown_pct, running_max, EquityPoint,
};
