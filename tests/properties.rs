//property tests for run invariants over random price paths.
//
//1. Every run ends flat with one equity point per bar
//2. Fills alternate BUY, SELL starting from a buy
//3. Cash never goes negative
//4. Runs are deterministic
//5. The drawdown peak never decreases

mod common;

use barwalk::data::BarSeries;
use barwalk::engine::{run_backtest, BacktestConfig, BacktestEngine, Side};
use barwalk::metrics::{max_drawdown_pct, running_max};
use barwalk::portfolio::PositionSide;
use barwalk::strategy::{Strategy as TradingStrategy, StrategyKind};
use common::{make_bars, path_from_moves};
use proptest::prelude::*;

//── Generators ──────────────────────────────────────────────────────

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    (
        20.0..300.0_f64,
        prop::collection::vec(-0.06..0.06_f64, 0..160),
    )
        .prop_map(|(start, moves)| path_from_moves(start, &moves))
}

fn arb_kind() -> impl Strategy<Value = StrategyKind> {
    prop::sample::select(StrategyKind::ALL.to_vec())
}

fn arb_capital() -> impl Strategy<Value = f64> {
    (100.0..1_000_000.0_f64).prop_map(|c| c.round())
}

fn config(kind: StrategyKind, capital: f64) -> BacktestConfig {
    BacktestConfig::new(capital, TradingStrategy::default_for(kind))
}

proptest! {
    #[test]
    fn run_ends_flat_with_full_curve(
        closes in arb_closes(),
        kind in arb_kind(),
        capital in arb_capital(),
    ) {
        let result = run_backtest(make_bars(&closes), config(kind, capital)).unwrap();

        prop_assert_eq!(result.equity_curve.len(), closes.len());
        prop_assert_eq!(
            result.equity_curve.last().map(|p| p.position),
            Some(PositionSide::Flat)
        );
        prop_assert_eq!(result.buy_count(), result.sell_count());
        prop_assert_eq!(result.summary.total_trades, result.sell_count());

        let final_cash = result.equity_curve.last().map(|p| p.cash).unwrap();
        prop_assert!((result.summary.final_equity - final_cash).abs() < 1e-6);
    }

    #[test]
    fn fills_alternate_and_cash_stays_non_negative(
        closes in arb_closes(),
        kind in arb_kind(),
        capital in arb_capital(),
    ) {
        let result = run_backtest(make_bars(&closes), config(kind, capital)).unwrap();

        for (i, trade) in result.trades.iter().enumerate() {
            let expected = if i % 2 == 0 { Side::Buy } else { Side::Sell };
            prop_assert_eq!(trade.side, expected);
            prop_assert!(trade.shares > 0);
            prop_assert!(trade.cash_after >= 0.0);
            prop_assert_eq!(trade.fill_price, closes[trade.bar_index]);
        }
        for pair in result.trades.windows(2) {
            prop_assert!(pair[0].bar_index <= pair[1].bar_index);
        }
        prop_assert!(result.equity_curve.iter().all(|p| p.cash >= 0.0));
        prop_assert!(result.summary.win_rate_pct >= 0.0 && result.summary.win_rate_pct <= 100.0);
    }

    #[test]
    fn runs_are_deterministic(closes in arb_closes(), kind in arb_kind()) {
        let series = BarSeries::new(make_bars(&closes)).unwrap();
        let engine = BacktestEngine::new(config(kind, 25_000.0), series).unwrap();

        let first = engine.run();
        let second = engine.run();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn drawdown_peak_is_monotonic(closes in arb_closes(), kind in arb_kind()) {
        let capital = 10_000.0;
        let result = run_backtest(make_bars(&closes), config(kind, capital)).unwrap();
        let equity: Vec<f64> = result.equity_curve.iter().map(|p| p.equity).collect();

        let peaks = running_max(&equity, capital);
        prop_assert!(peaks.iter().all(|&p| p >= capital));
        for pair in peaks.windows(2) {
            prop_assert!(pair[1] >= pair[0]);
        }

        let max_dd = max_drawdown_pct(&equity, capital);
        prop_assert!(max_dd <= 0.0);
        prop_assert!(max_dd >= -100.0);
        prop_assert_eq!(max_dd, result.summary.max_drawdown_pct);
    }
}
