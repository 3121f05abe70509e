use crate::portfolio::PositionSide;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//a point in the equity curve, recorded once per bar after execution settles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub cash: f64,
    //cash plus the open position marked at the bar close
    pub equity: f64,
    pub position: PositionSide,
}

//running peak of equity, seeded with the initial balance
pub fn running_max(equity_values: &[f64], initial_balance: f64) -> Vec<f64> {
    let mut peak = initial_balance;
    equity_values
        .iter()
        .map(|&equity| {
            if equity > peak {
                peak = equity;
            }
            peak
        })
        .collect()
}

//drawdown from the running peak in percent (zero or negative)
pub fn drawdown_pct(equity_values: &[f64], initial_balance: f64) -> Vec<f64> {
    running_max(equity_values, initial_balance)
        .iter()
        .zip(equity_values)
        .map(|(&peak, &equity)| {
            if peak > 0.0 {
                (equity - peak) / peak * 100.0
            } else {
                0.0
            }
        })
        .collect()
}

//calculates the most negative drawdown percentage, 0 for an empty curve
pub fn max_drawdown_pct(equity_values: &[f64], initial_balance: f64) -> f64 {
    drawdown_pct(equity_values, initial_balance)
        .into_iter()
        .fold(0.0, f64::min)
}

//calculates bar-over-bar fractional changes in equity
pub fn calculate_returns(equity_values: &[f64]) -> Vec<f64> {
    equity_values
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_max_starts_at_initial_balance() {
        let peaks = running_max(&[90.0, 120.0, 110.0, 130.0], 100.0);
        assert_eq!(peaks, vec![100.0, 120.0, 120.0, 130.0]);
    }

    #[test]
    fn drawdown_is_measured_from_peak() {
        let dd = drawdown_pct(&[100.0, 120.0, 90.0, 130.0], 100.0);
        assert_eq!(dd, vec![0.0, 0.0, -25.0, 0.0]);
        assert_eq!(max_drawdown_pct(&[100.0, 120.0, 90.0, 130.0], 100.0), -25.0);
    }

    #[test]
    fn loss_below_initial_balance_counts_as_drawdown() {
        assert_eq!(max_drawdown_pct(&[80.0], 100.0), -20.0);
    }

    #[test]
    fn empty_curve_has_no_drawdown() {
        assert_eq!(max_drawdown_pct(&[], 100.0), 0.0);
        assert!(calculate_returns(&[100.0]).is_empty());
    }

    #[test]
    fn returns_are_fractional() {
        assert_eq!(calculate_returns(&[100.0, 110.0, 99.0]), vec![0.1, -0.1]);
    }
}
