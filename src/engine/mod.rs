pub mod backtest;
pub mod execution;

pub use backtest::{run_backtest, run_batch, BacktestConfig, BacktestEngine, BacktestResult};
pub use execution::{ExecutionEngine, ExecutionOutcome, Side, Trade};
