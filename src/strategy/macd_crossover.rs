use crate::data::Bar;
use crate::error::BacktestError;
use crate::indicators::{IndicatorFrame, IndicatorSettings};
use crate::portfolio::PositionState;
use crate::strategy::{cross_signal, crossing, unknown_param, window_param, Signal, SignalRule};
use serde::{Deserialize, Serialize};

const NAME: &str = "MACD_CROSSOVER";
const PARAMS: [&str; 3] = ["fast", "slow", "signal"];

//buys when the macd line crosses above its signal line, sells on the reverse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdCrossoverParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdCrossoverParams {
    fn default() -> Self {
        MacdCrossoverParams {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

impl SignalRule for MacdCrossoverParams {
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
        cross_signal(crossing(&frame.macd, &frame.macd_signal, index), position)
    }

    fn set_param(&mut self, name: &str, value: f64) -> Result<(), BacktestError> {
        match name {
            "fast" => self.fast = window_param(name, value)?,
            "slow" => self.slow = window_param(name, value)?,
            "signal" => self.signal = window_param(name, value)?,
            _ => return Err(unknown_param(NAME, name, &PARAMS)),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), BacktestError> {
        if self.fast >= self.slow {
            return Err(BacktestError::InvalidParameter {
                name: "fast".to_string(),
                reason: format!("must be shorter than slow ({} >= {})", self.fast, self.slow),
            });
        }
        Ok(())
    }

    fn configure(&self, settings: &mut IndicatorSettings) {
        settings.macd_fast = self.fast;
        settings.macd_slow = self.slow;
        settings.macd_signal = self.signal;
    }
}
