//tabular views of a finished run and writers for them.

use crate::data::Bar;
use crate::engine::{BacktestResult, Trade};
use crate::indicators::IndicatorFrame;
use crate::metrics::{EquityPoint, SummaryMetrics};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use prettytable::{Cell, Row, Table};
use serde::Serialize;
use std::path::Path;

//one trade ledger row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRow {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub side: &'static str,
    pub price: f64,
    pub shares: u64,
    pub value: f64,
    pub profit: Option<f64>,
    pub profit_pct: Option<f64>,
    pub capital: f64,
}

impl From<&Trade> for TradeRow {
    fn from(trade: &Trade) -> Self {
        TradeRow {
            date: trade.timestamp.date_naive(),
            side: trade.side.as_str(),
            price: trade.fill_price,
            shares: trade.shares,
            value: trade.notional_value,
            profit: trade.realized_profit,
            profit_pct: trade.realized_profit_pct,
            capital: trade.cash_after,
        }
    }
}

//one equity curve row; position is 1 while long
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityRow {
    pub date: NaiveDate,
    pub equity: f64,
    pub position: u8,
}

impl From<&EquityPoint> for EquityRow {
    fn from(point: &EquityPoint) -> Self {
        EquityRow {
            date: point.timestamp.date_naive(),
            equity: point.equity,
            position: point.position.as_flag(),
        }
    }
}

pub fn trade_rows(trades: &[Trade]) -> Vec<TradeRow> {
    trades.iter().map(TradeRow::from).collect()
}

pub fn equity_rows(curve: &[EquityPoint]) -> Vec<EquityRow> {
    curve.iter().map(EquityRow::from).collect()
}

fn write_rows<P: AsRef<Path>, T: Serialize>(path: P, rows: &[T]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .context(format!("Failed to create CSV file: {:?}", path))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

//writes the trade ledger as csv
pub fn save_trades_csv<P: AsRef<Path>>(trades: &[Trade], path: P) -> Result<()> {
    write_rows(path, &trade_rows(trades))
}

//writes the equity curve as csv
pub fn save_equity_csv<P: AsRef<Path>>(curve: &[EquityPoint], path: P) -> Result<()> {
    write_rows(path, &equity_rows(curve))
}

//writes the flat metrics mapping as a json object
pub fn save_metrics_json<P: AsRef<Path>>(summary: &SummaryMetrics, path: P) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(&summary.to_map())?;
    std::fs::write(path, json).context(format!("Failed to write metrics file: {:?}", path))?;
    Ok(())
}

//writes every indicator column next to its bar timestamp; empty cells are unavailable
pub fn save_indicators_csv<P: AsRef<Path>>(
    bars: &[Bar],
    frame: &IndicatorFrame,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .context(format!("Failed to create CSV file: {:?}", path))?;

    let columns = frame.columns();
    let mut header = vec!["timestamp".to_string(), "close".to_string()];
    header.extend(columns.iter().map(|(name, _)| name.clone()));
    writer.write_record(&header)?;

    for (i, bar) in bars.iter().enumerate() {
        let mut record = vec![bar.timestamp.to_rfc3339(), bar.close.to_string()];
        record.extend(columns.iter().map(|(_, values)| {
            values
                .get(i)
                .copied()
                .flatten()
                .map(|v| v.to_string())
                .unwrap_or_default()
        }));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

//trade ledger as a printable table
pub fn trades_table(trades: &[Trade]) -> Table {
    let mut table = Table::new();
    table.add_row(Row::new(
        ["Date", "Type", "Price", "Shares", "Value", "Profit", "Profit %", "Capital"]
            .iter()
            .map(|h| Cell::new(h))
            .collect(),
    ));

    for row in trade_rows(trades) {
        table.add_row(Row::new(vec![
            Cell::new(&row.date.to_string()),
            Cell::new(row.side),
            Cell::new(&format!("{:.2}", row.price)),
            Cell::new(&row.shares.to_string()),
            Cell::new(&format!("{:.2}", row.value)),
            Cell::new(&row.profit.map(|p| format!("{:.2}", p)).unwrap_or_default()),
            Cell::new(&row.profit_pct.map(|p| format!("{:.2}%", p)).unwrap_or_default()),
            Cell::new(&format!("{:.2}", row.capital)),
        ]));
    }

    table
}

//one row per run: strategy name plus headline metrics
pub fn comparison_table(results: &[BacktestResult]) -> Table {
    let mut table = Table::new();
    table.add_row(Row::new(
        ["Strategy", "Return %", "Trades", "Win Rate %", "Max DD %", "Sharpe", "Alpha"]
            .iter()
            .map(|h| Cell::new(h))
            .collect(),
    ));

    for result in results {
        let s = &result.summary;
        table.add_row(Row::new(vec![
            Cell::new(result.strategy.name()),
            Cell::new(&format!("{:.2}", s.total_return_pct)),
            Cell::new(&s.total_trades.to_string()),
            Cell::new(&format!("{:.2}", s.win_rate_pct)),
            Cell::new(&format!("{:.2}", s.max_drawdown_pct)),
            Cell::new(&format!("{:.3}", s.sharpe_ratio)),
            Cell::new(&format!("{:.2}", s.alpha)),
        ]));
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::make_bars;
    use crate::engine::ExecutionEngine;
    use crate::indicators::IndicatorSettings;
    use crate::strategy::Signal;

    fn two_trade_run() -> (Vec<Trade>, Vec<EquityPoint>) {
        let bars = make_bars(&[100.0, 110.0]);
        let mut engine = ExecutionEngine::new(1000.0, bars.len());
        engine.process_bar(0, &bars[0], Signal::Buy);
        engine.process_bar(1, &bars[1], Signal::Hold);
        let outcome = engine.finish();
        (outcome.trades, outcome.equity_curve)
    }

    #[test]
    fn trades_csv_has_ledger_columns() {
        let (trades, _) = two_trade_run();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.csv");
        save_trades_csv(&trades, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("date,type,price,shares,value,profit,profit_pct,capital")
        );
        assert_eq!(lines.next(), Some("2024-01-01,BUY,100.0,10,1000.0,,,0.0"));
        assert_eq!(
            lines.next(),
            Some("2024-01-02,SELL,110.0,10,1100.0,100.0,10.0,1100.0")
        );
    }

    #[test]
    fn equity_csv_flags_position() {
        let (_, curve) = two_trade_run();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("equity.csv");
        save_equity_csv(&curve, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines,
            vec!["date,equity,position", "2024-01-01,1000.0,1", "2024-01-02,1100.0,0"]
        );
    }

    #[test]
    fn metrics_json_is_flat_and_ordered() {
        let (trades, curve) = two_trade_run();
        let summary = SummaryMetrics::from_backtest(&curve, &trades, 1000.0, 100.0, 110.0);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        save_metrics_json(&summary, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object["Total Trades"], 1.0);
        assert_eq!(object["Win Rate %"], 100.0);
    }

    #[test]
    fn indicator_csv_leaves_warmup_blank() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        let settings = IndicatorSettings {
            short_ma: 2,
            long_ma: 3,
            rsi_period: 1,
            macd_fast: 1,
            macd_slow: 2,
            macd_signal: 2,
            bb_window: 2,
            bb_num_std: 2.0,
        };
        let frame = IndicatorFrame::compute(&bars, &settings);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indicators.csv");
        save_indicators_csv(&bars, &frame, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert!(lines[0].starts_with("timestamp,close,ma_2,ma_3,rsi_1"));
        assert!(lines[1].contains(",1,,,"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn tables_have_one_row_per_entry() {
        let (trades, _) = two_trade_run();
        assert_eq!(trades_table(&trades).len(), 3);
        assert_eq!(comparison_table(&[]).len(), 1);
    }
}
