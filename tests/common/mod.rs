#![allow(dead_code)]

use barwalk::data::Bar;
use chrono::{Duration, TimeZone, Utc};

//daily bars with open = high = low = close
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let start = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            Bar::new(start + Duration::days(i as i64), c, c, c, c, 1_000.0).unwrap()
        })
        .collect()
}

//a random-walk style path built from per-bar relative moves
pub fn path_from_moves(start: f64, moves: &[f64]) -> Vec<f64> {
    let mut price = start;
    let mut closes = Vec::with_capacity(moves.len() + 1);
    closes.push(price);
    for m in moves {
        price *= 1.0 + m;
        closes.push(price);
    }
    closes
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9 * a.abs().max(b.abs()).max(1.0)
}
