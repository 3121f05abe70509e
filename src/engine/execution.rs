use crate::data::Bar;
use crate::metrics::EquityPoint;
use crate::portfolio::{Account, PositionState};
use crate::strategy::Signal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//trade side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

//an executed fill, immutable once recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub bar_index: usize,
    pub timestamp: DateTime<Utc>,
    pub side: Side,
    pub fill_price: f64,
    pub shares: u64,
    pub notional_value: f64,
    pub cash_after: f64,
    //sell only, measured against the paired buy
    pub realized_profit: Option<f64>,
    pub realized_profit_pct: Option<f64>,
    //true for the liquidation on the final bar
    pub forced: bool,
}

//what a completed walk leaves behind
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    pub final_cash: f64,
    pub final_position: PositionState,
}

//flat/long state machine driven one bar at a time
//
//FLAT --buy--> LONG, LONG --sell--> FLAT, anything else is ignored.
//on the last bar an open position is sold at the close before that bar's
//equity point is recorded, so every run ends flat
#[derive(Debug, Clone)]
pub struct ExecutionEngine {
    account: Account,
    equity_curve: Vec<EquityPoint>,
    total_bars: usize,
}

impl ExecutionEngine {
    pub fn new(initial_capital: f64, total_bars: usize) -> Self {
        ExecutionEngine {
            account: Account::new(initial_capital),
            equity_curve: Vec::with_capacity(total_bars),
            total_bars,
        }
    }

    pub fn position(&self) -> &PositionState {
        &self.account.position
    }

    pub fn cash(&self) -> f64 {
        self.account.cash
    }

    pub fn trades(&self) -> &[Trade] {
        &self.account.trade_log
    }

    pub fn equity_curve(&self) -> &[EquityPoint] {
        &self.equity_curve
    }

    //settles bar `index`: applies the signal, liquidates on the last bar,
    //then appends the bar's equity point
    //returns the number of fills made on this bar
    pub fn process_bar(&mut self, index: usize, bar: &Bar, signal: Signal) -> usize {
        debug_assert_eq!(index, self.equity_curve.len(), "bars must be processed in order");
        let before = self.account.trade_log.len();

        match (signal, self.account.position) {
            (Signal::Buy, PositionState::Flat) => {
                self.account.buy(index, bar);
            }
            (Signal::Sell, PositionState::Long { .. }) => {
                self.account.sell(index, bar, false);
            }
            _ => {}
        }

        if index + 1 == self.total_bars && self.account.position.is_long() {
            self.account.sell(index, bar, true);
        }

        self.equity_curve.push(EquityPoint {
            timestamp: bar.timestamp,
            cash: self.account.cash,
            equity: self.account.equity(bar.close),
            position: self.account.position.side(),
        });

        self.account.trade_log.len() - before
    }

    pub fn finish(self) -> ExecutionOutcome {
        ExecutionOutcome {
            final_cash: self.account.cash,
            final_position: self.account.position,
            trades: self.account.trade_log,
            equity_curve: self.equity_curve,
        }
    }
}
