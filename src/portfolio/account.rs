use crate::data::Bar;
use crate::engine::execution::{Side, Trade};
use crate::portfolio::position::PositionState;
use tracing::debug;

//cash, the single position and the append-only trade log of one run
//
//all capital is committed on entry: shares = floor(cash / close)
#[derive(Debug, Clone)]
pub struct Account {
    //cash not tied up in the position
    pub cash: f64,

    pub position: PositionState,

    //complete trade log, never revised
    pub trade_log: Vec<Trade>,
}

impl Account {
    //creates a new flat account with initial capital
    pub fn new(initial_capital: f64) -> Self {
        Account {
            cash: initial_capital,
            position: PositionState::Flat,
            trade_log: Vec::new(),
        }
    }

    //opens a long position at the bar close
    //returns none when already long or when cash cannot buy a single share
    pub fn buy(&mut self, bar_index: usize, bar: &Bar) -> Option<&Trade> {
        if !self.position.is_flat() {
            return None;
        }

        let price = bar.close;
        let mut shares = (self.cash / price).floor() as u64;
        //the quotient can round up across a whole number
        if shares > 0 && shares as f64 * price > self.cash {
            shares -= 1;
        }
        if shares == 0 {
            debug!(
                bar_index,
                cash = self.cash,
                price,
                "insufficient cash for one share, buy skipped"
            );
            return None;
        }

        let cost = shares as f64 * price;
        self.cash -= cost;
        self.position = PositionState::Long {
            entry_price: price,
            shares,
            entry_bar_index: bar_index,
        };

        debug!(bar_index, shares, price, cash = self.cash, "buy filled");

        self.trade_log.push(Trade {
            bar_index,
            timestamp: bar.timestamp,
            side: Side::Buy,
            fill_price: price,
            shares,
            notional_value: cost,
            cash_after: self.cash,
            realized_profit: None,
            realized_profit_pct: None,
            forced: false,
        });
        self.trade_log.last()
    }

    //closes the long position at the bar close; returns none when flat
    pub fn sell(&mut self, bar_index: usize, bar: &Bar, forced: bool) -> Option<&Trade> {
        let (entry_price, shares) = match self.position {
            PositionState::Flat => return None,
            PositionState::Long {
                entry_price,
                shares,
                ..
            } => (entry_price, shares),
        };

        let price = bar.close;
        let proceeds = shares as f64 * price;
        let cost_basis = shares as f64 * entry_price;
        let profit = proceeds - cost_basis;
        let profit_pct = profit / cost_basis * 100.0;

        self.cash += proceeds;
        self.position = PositionState::Flat;

        debug!(
            bar_index,
            shares,
            price,
            profit,
            forced,
            cash = self.cash,
            "sell filled"
        );

        self.trade_log.push(Trade {
            bar_index,
            timestamp: bar.timestamp,
            side: Side::Sell,
            fill_price: price,
            shares,
            notional_value: proceeds,
            cash_after: self.cash,
            realized_profit: Some(profit),
            realized_profit_pct: Some(profit_pct),
            forced,
        });
        self.trade_log.last()
    }

    //cash plus the position marked at `price`
    pub fn equity(&self, price: f64) -> f64 {
        self.cash + self.position.market_value(price)
    }
}
