//relative strength index with wilder smoothing
//
//the first averages are simple means of the first `period` changes, after
//that `avg = (prev_avg * (period - 1) + current) / period`.
//RSI = 100 - 100 / (1 + avg_gain / avg_loss); a zero average loss gives 100.

pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = closes.len();
    let mut out = vec![None; n];
    if period == 0 || n < period + 1 {
        return out;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss -= change;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    let p = period as f64;
    for i in (period + 1)..n {
        let change = closes[i] - closes[i - 1];
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        avg_gain = (avg_gain * (p - 1.0) + gain) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss) / p;
        out[i] = Some(rsi_value(avg_gain, avg_loss));
    }

    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn first_value_at_period() {
        let out = rsi(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(&out[..3], &[None, None, None]);
        assert_eq!(out[3], Some(100.0));
    }

    #[test]
    fn all_losses_is_zero() {
        let out = rsi(&[5.0, 4.0, 3.0, 2.0], 3);
        assert_eq!(out[3], Some(0.0));
    }

    #[test]
    fn flat_prices_are_one_hundred() {
        let out = rsi(&[10.0; 20], 14);
        assert!(out[14..].iter().all(|v| *v == Some(100.0)));
    }

    #[test]
    fn wilder_smoothing() {
        //changes: +2, -1, +1, -2
        //seed (period 3): gain = 3/3 = 1, loss = 1/3
        //next: gain = (1 * 2 + 0) / 3 = 2/3, loss = (1/3 * 2 + 2) / 3 = 8/9
        let out = rsi(&[10.0, 12.0, 11.0, 12.0, 10.0], 3);
        approx(out[3].unwrap(), 100.0 - 100.0 / (1.0 + 3.0));
        approx(out[4].unwrap(), 100.0 - 100.0 / (1.0 + (2.0 / 3.0) / (8.0 / 9.0)));
    }

    #[test]
    fn short_series_is_all_unavailable() {
        assert!(rsi(&[1.0, 2.0, 3.0], 3).iter().all(Option::is_none));
    }
}
