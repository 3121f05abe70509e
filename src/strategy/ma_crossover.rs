use crate::data::Bar;
use crate::error::BacktestError;
use crate::indicators::{IndicatorFrame, IndicatorSettings};
use crate::portfolio::PositionState;
use crate::strategy::{cross_signal, crossing, unknown_param, window_param, Signal, SignalRule};
use serde::{Deserialize, Serialize};

const NAME: &str = "MA_CROSSOVER";
const PARAMS: [&str; 2] = ["short_ma", "long_ma"];

//moving average crossover
//buys when the short sma crosses above the long sma (golden cross)
//sells when it crosses back below (death cross)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaCrossoverParams {
    pub short_ma: usize,
    pub long_ma: usize,
}

impl Default for MaCrossoverParams {
    fn default() -> Self {
        MaCrossoverParams {
            short_ma: 20,
            long_ma: 50,
        }
    }
}

impl SignalRule for MaCrossoverParams {
    fn name(&self) -> &'static str {
        NAME
    }

    fn evaluate(
        &self,
        index: usize,
        _bars: &[Bar],
        frame: &IndicatorFrame,
        position: &PositionState,
    ) -> Signal {
        cross_signal(crossing(&frame.ma_short, &frame.ma_long, index), position)
    }

    fn set_param(&mut self, name: &str, value: f64) -> Result<(), BacktestError> {
        match name {
            "short_ma" => self.short_ma = window_param(name, value)?,
            "long_ma" => self.long_ma = window_param(name, value)?,
            _ => return Err(unknown_param(NAME, name, &PARAMS)),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), BacktestError> {
        if self.short_ma >= self.long_ma {
            return Err(BacktestError::InvalidParameter {
                name: "short_ma".to_string(),
                reason: format!(
                    "must be shorter than long_ma ({} >= {})",
                    self.short_ma, self.long_ma
                ),
            });
        }
        Ok(())
    }

    fn configure(&self, settings: &mut IndicatorSettings) {
        settings.short_ma = self.short_ma;
        settings.long_ma = self.long_ma;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::make_bars;

    fn frame_for(closes: &[f64], params: &MaCrossoverParams) -> (Vec<Bar>, IndicatorFrame) {
        let bars = make_bars(closes);
        let mut settings = IndicatorSettings::default();
        params.configure(&mut settings);
        //keep the other windows out of the way of these short series
        settings.rsi_period = 2;
        settings.macd_slow = 2;
        settings.macd_fast = 1;
        settings.bb_window = 2;
        let frame = IndicatorFrame::compute(&bars, &settings);
        (bars, frame)
    }

    #[test]
    fn golden_cross_buys_when_flat() {
        let params = MaCrossoverParams {
            short_ma: 2,
            long_ma: 3,
        };
        //short: -, 9, 8, 9.5 ; long: -, -, 8.67, 9
        let (bars, frame) = frame_for(&[10.0, 8.0, 8.0, 11.0], &params);
        let flat = PositionState::Flat;

        //bar 2: first bar with both values, short 8 < long 8.67
        assert_eq!(params.evaluate(2, &bars, &frame, &flat), Signal::Hold);
        assert_eq!(params.evaluate(3, &bars, &frame, &flat), Signal::Buy);
    }

    #[test]
    fn death_cross_sells_only_when_long() {
        let params = MaCrossoverParams {
            short_ma: 2,
            long_ma: 3,
        };
        let (bars, frame) = frame_for(&[10.0, 12.0, 14.0, 8.0], &params);
        let long = PositionState::Long {
            entry_price: 14.0,
            shares: 1,
            entry_bar_index: 2,
        };

        assert_eq!(params.evaluate(3, &bars, &frame, &long), Signal::Sell);
        assert_eq!(
            params.evaluate(3, &bars, &frame, &PositionState::Flat),
            Signal::Hold
        );
    }

    #[test]
    fn short_window_must_be_shorter() {
        let params = MaCrossoverParams {
            short_ma: 50,
            long_ma: 50,
        };
        assert!(matches!(
            params.validate(),
            Err(BacktestError::InvalidParameter { .. })
        ));
    }
}
