//indicator pipeline: a pure function from a bar series to aligned columns.
//
//every column has exactly one entry per bar. Entries inside an indicator's
//warm-up window are `None`, never a carried-forward value. A series shorter
//than the longest configured window yields a frame with every entry `None`.

pub mod bollinger;
pub mod macd;
pub mod moving_average;
pub mod rsi;

use crate::data::Bar;
use serde::{Deserialize, Serialize};

pub use bollinger::{bollinger, BollingerBands};
pub use macd::{macd, Macd};
pub use moving_average::{ema, sma};
pub use rsi::rsi;

//window lengths and multipliers used to build an IndicatorFrame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSettings {
    pub short_ma: usize,
    pub long_ma: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bb_window: usize,
    pub bb_num_std: f64,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        IndicatorSettings {
            short_ma: 20,
            long_ma: 50,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bb_window: 20,
            bb_num_std: 2.0,
        }
    }
}

impl IndicatorSettings {
    //number of bars needed before every configured indicator can produce a value
    pub fn required_history(&self) -> usize {
        [
            self.short_ma,
            self.long_ma,
            self.rsi_period.saturating_add(1),
            self.macd_slow,
            self.bb_window,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub settings: IndicatorSettings,
    pub ma_short: Vec<Option<f64>>,
    pub ma_long: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub macd_histogram: Vec<Option<f64>>,
    pub bb_upper: Vec<Option<f64>>,
    pub bb_middle: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
}

impl IndicatorFrame {
    //computes every column from scratch
    pub fn compute(bars: &[Bar], settings: &IndicatorSettings) -> Self {
        let n = bars.len();
        if n < settings.required_history() {
            return IndicatorFrame::unavailable(n, settings);
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let lines = macd(
            &closes,
            settings.macd_fast,
            settings.macd_slow,
            settings.macd_signal,
        );
        let bands = bollinger(&closes, settings.bb_window, settings.bb_num_std);

        IndicatorFrame {
            settings: settings.clone(),
            ma_short: sma(&closes, settings.short_ma),
            ma_long: sma(&closes, settings.long_ma),
            rsi: rsi(&closes, settings.rsi_period),
            macd: lines.macd.into_iter().map(Some).collect(),
            macd_signal: lines.signal.into_iter().map(Some).collect(),
            macd_histogram: lines.histogram.into_iter().map(Some).collect(),
            bb_upper: bands.upper,
            bb_middle: bands.middle,
            bb_lower: bands.lower,
        }
    }

    //a frame of length n with no available values
    pub fn unavailable(n: usize, settings: &IndicatorSettings) -> Self {
        IndicatorFrame {
            settings: settings.clone(),
            ma_short: vec![None; n],
            ma_long: vec![None; n],
            rsi: vec![None; n],
            macd: vec![None; n],
            macd_signal: vec![None; n],
            macd_histogram: vec![None; n],
            bb_upper: vec![None; n],
            bb_middle: vec![None; n],
            bb_lower: vec![None; n],
        }
    }

    pub fn len(&self) -> usize {
        self.ma_short.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    //named columns, e.g. `ma_20`, `rsi_14`, in a stable order
    pub fn columns(&self) -> Vec<(String, &[Option<f64>])> {
        let s = &self.settings;
        vec![
            (format!("ma_{}", s.short_ma), self.ma_short.as_slice()),
            (format!("ma_{}", s.long_ma), self.ma_long.as_slice()),
            (format!("rsi_{}", s.rsi_period), self.rsi.as_slice()),
            ("macd".to_string(), self.macd.as_slice()),
            ("macd_signal".to_string(), self.macd_signal.as_slice()),
            ("macd_histogram".to_string(), self.macd_histogram.as_slice()),
            ("bb_upper".to_string(), self.bb_upper.as_slice()),
            ("bb_middle".to_string(), self.bb_middle.as_slice()),
            ("bb_lower".to_string(), self.bb_lower.as_slice()),
        ]
    }
}
