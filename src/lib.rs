//a Rust-based rule strategy backtesting engine for single-instrument price series

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod export;
pub mod indicators;
pub mod metrics;
pub mod portfolio;
pub mod strategy;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::BacktestConfiguration;
    pub use crate::data::{filter_by_date_range, load_csv, Bar, BarError, BarSeries};
    pub use crate::engine::{
        run_backtest, run_batch, BacktestConfig, BacktestEngine, BacktestResult, ExecutionEngine,
        ExecutionOutcome, Side, Trade,
    };
    pub use crate::error::BacktestError;
    pub use crate::export::{
        comparison_table, save_equity_csv, save_indicators_csv, save_metrics_json,
        save_trades_csv, trades_table,
    };
    pub use crate::indicators::{IndicatorFrame, IndicatorSettings};
    pub use crate::metrics::{EquityPoint, SummaryMetrics};
    pub use crate::portfolio::{Account, PositionSide, PositionState};
    pub use crate::strategy::{
        BollingerBandsParams, MaCrossoverParams, MacdCrossoverParams, RsiOversoldParams, Signal,
        SignalRule, Strategy, StrategyKind,
    };
}
