use crate::data::{Bar, BarSeries};
use crate::engine::execution::{ExecutionEngine, Side, Trade};
use crate::error::BacktestError;
use crate::indicators::IndicatorFrame;
use crate::metrics::{EquityPoint, SummaryMetrics};
use crate::strategy::Strategy;
use rayon::prelude::*;
use tracing::info;

//result of a backtest
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub strategy: Strategy,
    pub summary: SummaryMetrics,
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
    pub indicators: IndicatorFrame,
}

impl BacktestResult {
    pub fn buy_count(&self) -> usize {
        self.trades.iter().filter(|t| t.side == Side::Buy).count()
    }

    pub fn sell_count(&self) -> usize {
        self.trades.iter().filter(|t| t.side == Side::Sell).count()
    }
}

//configuration for a backtest
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub strategy: Strategy,
}

impl BacktestConfig {
    pub fn new(initial_capital: f64, strategy: Strategy) -> Self {
        BacktestConfig {
            initial_capital,
            strategy,
        }
    }

    pub fn validate(&self) -> Result<(), BacktestError> {
        if !(self.initial_capital.is_finite() && self.initial_capital > 0.0) {
            return Err(BacktestError::NonPositiveCapital(self.initial_capital));
        }
        Ok(())
    }
}

//main backtest engine
//
//holds only validated inputs; every call to `run` builds its own execution
//state, so runs never share anything mutable
#[derive(Debug, Clone)]
pub struct BacktestEngine {
    config: BacktestConfig,
    bars: BarSeries,
}

impl BacktestEngine {
    //creates a new backtest engine after checking the configuration
    pub fn new(config: BacktestConfig, bars: BarSeries) -> Result<Self, BacktestError> {
        config.validate()?;
        Ok(BacktestEngine { config, bars })
    }

    //runs the backtest: indicators, then one forward pass over the bars
    pub fn run(&self) -> BacktestResult {
        let strategy = &self.config.strategy;
        let bars = self.bars.bars();

        info!(
            strategy = strategy.name(),
            bars = bars.len(),
            initial_capital = self.config.initial_capital,
            "starting backtest"
        );

        let indicators = IndicatorFrame::compute(bars, &strategy.indicator_settings());
        let mut execution = ExecutionEngine::new(self.config.initial_capital, bars.len());

        for (index, bar) in bars.iter().enumerate() {
            let signal = strategy.signal(index, bars, &indicators, execution.position());
            execution.process_bar(index, bar, signal);
        }

        let outcome = execution.finish();
        let summary = SummaryMetrics::from_backtest(
            &outcome.equity_curve,
            &outcome.trades,
            self.config.initial_capital,
            self.bars.first().close,
            self.bars.last().close,
        );

        info!(
            strategy = strategy.name(),
            trades = outcome.trades.len(),
            final_equity = summary.final_equity,
            total_return_pct = summary.total_return_pct,
            "backtest finished"
        );

        BacktestResult {
            strategy: strategy.clone(),
            summary,
            equity_curve: outcome.equity_curve,
            trades: outcome.trades,
            indicators,
        }
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    pub fn bars(&self) -> &BarSeries {
        &self.bars
    }
}

//validates raw bars and configuration, then runs a single backtest
pub fn run_backtest(bars: Vec<Bar>, config: BacktestConfig) -> Result<BacktestResult, BacktestError> {
    config.validate()?;
    let series = BarSeries::new(bars)?;
    Ok(BacktestEngine::new(config, series)?.run())
}

//runs independent backtests over the same series in parallel
//results come back in the order of `configs`
pub fn run_batch(
    bars: &BarSeries,
    configs: &[BacktestConfig],
) -> Vec<Result<BacktestResult, BacktestError>> {
    configs
        .par_iter()
        .map(|config| Ok(BacktestEngine::new(config.clone(), bars.clone())?.run()))
        .collect()
}
