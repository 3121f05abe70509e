use crate::engine::execution::{Side, Trade};
use crate::metrics::timeseries::{calculate_returns, max_drawdown_pct, EquityPoint};
use indexmap::IndexMap;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

//summary metrics for a backtest
//
//every field is finite: divisions with a zero denominator are defined as 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub initial_capital: f64,
    pub final_equity: f64,
    pub total_return_pct: f64,
    //closed round trips, i.e. sell trades
    pub total_trades: usize,
    pub profitable_trades: usize,
    pub win_rate_pct: f64,
    pub avg_profit: f64,
    pub avg_profit_pct: f64,
    //zero or negative
    pub max_drawdown_pct: f64,
    pub sharpe_ratio: f64,
    pub buy_hold_return_pct: f64,
    pub alpha: f64,
}

impl SummaryMetrics {
    //calculate summary metrics from the finished equity curve and trade log
    //`first_close`/`last_close` bound the buy-and-hold benchmark
    pub fn from_backtest(
        equity_curve: &[EquityPoint],
        trades: &[Trade],
        initial_capital: f64,
        first_close: f64,
        last_close: f64,
    ) -> Self {
        let final_equity = equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(initial_capital);
        let total_return_pct = (final_equity - initial_capital) / initial_capital * 100.0;

        let stats = calculate_trade_statistics(trades);

        let equity_values: Vec<f64> = equity_curve.iter().map(|p| p.equity).collect();
        let max_drawdown_pct = max_drawdown_pct(&equity_values, initial_capital);
        let sharpe_ratio = calculate_sharpe_ratio(&calculate_returns(&equity_values));

        let buy_hold_return_pct = (last_close - first_close) / first_close * 100.0;

        SummaryMetrics {
            initial_capital,
            final_equity,
            total_return_pct,
            total_trades: stats.total_trades,
            profitable_trades: stats.profitable_trades,
            win_rate_pct: stats.win_rate_pct,
            avg_profit: stats.avg_profit,
            avg_profit_pct: stats.avg_profit_pct,
            max_drawdown_pct,
            sharpe_ratio,
            buy_hold_return_pct,
            alpha: total_return_pct - buy_hold_return_pct,
        }
    }

    //flat name -> value mapping in display order
    pub fn to_map(&self) -> IndexMap<&'static str, f64> {
        let mut map = IndexMap::new();
        map.insert("Initial Capital", self.initial_capital);
        map.insert("Final Equity", self.final_equity);
        map.insert("Total Return %", self.total_return_pct);
        map.insert("Total Trades", self.total_trades as f64);
        map.insert("Profitable Trades", self.profitable_trades as f64);
        map.insert("Win Rate %", self.win_rate_pct);
        map.insert("Average Profit", self.avg_profit);
        map.insert("Average Profit %", self.avg_profit_pct);
        map.insert("Max Drawdown %", self.max_drawdown_pct);
        map.insert("Sharpe Ratio", self.sharpe_ratio);
        map.insert("Buy & Hold Return %", self.buy_hold_return_pct);
        map.insert("Alpha", self.alpha);
        map
    }

    //the metrics transposed into a single value column
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

        for (name, value) in self.to_map() {
            let formatted = match name {
                "Total Trades" | "Profitable Trades" => format!("{}", value as usize),
                "Initial Capital" | "Final Equity" | "Average Profit" => format!("${:.2}", value),
                "Sharpe Ratio" => format!("{:.3}", value),
                _ => format!("{:.2}%", value),
            };
            table.add_row(Row::new(vec![Cell::new(name), Cell::new(&formatted)]));
        }

        table
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self) {
        self.to_table().printstd();
    }
}

struct TradeStats {
    total_trades: usize,
    profitable_trades: usize,
    win_rate_pct: f64,
    avg_profit: f64,
    avg_profit_pct: f64,
}

//statistics over sell trades, each of which closes one round trip
fn calculate_trade_statistics(trades: &[Trade]) -> TradeStats {
    let sells: Vec<&Trade> = trades.iter().filter(|t| t.side == Side::Sell).collect();

    if sells.is_empty() {
        return TradeStats {
            total_trades: 0,
            profitable_trades: 0,
            win_rate_pct: 0.0,
            avg_profit: 0.0,
            avg_profit_pct: 0.0,
        };
    }

    let total = sells.len();
    let profitable = sells
        .iter()
        .filter(|t| t.realized_profit.unwrap_or(0.0) > 0.0)
        .count();
    let profits: Vec<f64> = sells
        .iter()
        .map(|t| t.realized_profit.unwrap_or(0.0))
        .collect();
    let profit_pcts: Vec<f64> = sells
        .iter()
        .map(|t| t.realized_profit_pct.unwrap_or(0.0))
        .collect();

    TradeStats {
        total_trades: total,
        profitable_trades: profitable,
        win_rate_pct: profitable as f64 / total as f64 * 100.0,
        avg_profit: profits.iter().mean(),
        avg_profit_pct: profit_pcts.iter().mean(),
    }
}

//mean / population std of per-bar returns, annualized by sqrt(252)
//
//idle bars contribute zero returns to both moments
pub fn calculate_sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }

    let mean = returns.iter().mean();
    let std_dev = returns.iter().population_std_dev();

    if std_dev == 0.0 || !std_dev.is_finite() {
        return 0.0;
    }

    (mean / std_dev) * TRADING_DAYS_PER_YEAR.sqrt()
}
