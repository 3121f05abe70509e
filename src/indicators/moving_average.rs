//simple and exponential moving averages over close prices.

//arithmetic mean of the trailing `window` values; `None` before index `window - 1`.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    for (i, slice) in values.windows(window).enumerate() {
        out[i + window - 1] = Some(slice.iter().sum::<f64>() / window as f64);
    }
    out
}

//exponential moving average seeded with the first value (no warm-up).
//
//`ema[0] = values[0]`, `ema[i] = a * values[i] + (1 - a) * ema[i - 1]`
//with `a = 2 / (period + 1)`.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let alpha = 2.0 / (period as f64 + 1.0);

    let mut prev = match values.first() {
        Some(&v) => v,
        None => return out,
    };
    out.push(prev);

    for &v in &values[1..] {
        prev = alpha * v + (1.0 - alpha) * prev;
        out.push(prev);
    }
    out
}
