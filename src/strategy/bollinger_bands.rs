use crate::data::Bar;
use crate::error::BacktestError;
use crate::indicators::{IndicatorFrame, IndicatorSettings};
use crate::portfolio::PositionState;
use crate::strategy::{unknown_param, window_param, Signal, SignalRule};
use serde::{Deserialize, Serialize};

const NAME: &str = "BOLLINGER_BANDS";
const PARAMS: [&str; 2] = ["window", "num_std"];

//buys at or below the lower band, sells at or above the upper band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerBandsParams {
    pub window: usize,
    pub num_std: f64,
}

impl Default for BollingerBandsParams {
    fn default() -> Self {
        BollingerBandsParams {
            window: 20,
            num_std: 2.0,
        }
    }
}

impl SignalRule for BollingerBandsParams {
    fn name(&self) -> &'static str {
        NAME
    }

    fn evaluate(
        &self,
        index: usize,
        bars: &[Bar],
        frame: &IndicatorFrame,
        position: &PositionState,
    ) -> Signal {
        let (close, lower, upper) = match (
            bars.get(index).map(|b| b.close),
            frame.bb_lower.get(index).copied().flatten(),
            frame.bb_upper.get(index).copied().flatten(),
        ) {
            (Some(c), Some(l), Some(u)) => (c, l, u),
            _ => return Signal::Hold,
        };

        if close <= lower && position.is_flat() {
            Signal::Buy
        } else if close >= upper && position.is_long() {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }

    fn set_param(&mut self, name: &str, value: f64) -> Result<(), BacktestError> {
        match name {
            "window" => self.window = window_param(name, value)?,
            "num_std" => {
                if !(value.is_finite() && value > 0.0) {
                    return Err(BacktestError::InvalidParameter {
                        name: name.to_string(),
                        reason: format!("must be a positive number, got {}", value),
                    });
                }
                self.num_std = value;
            }
            _ => return Err(unknown_param(NAME, name, &PARAMS)),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), BacktestError> {
        Ok(())
    }

    fn configure(&self, settings: &mut IndicatorSettings) {
        settings.bb_window = self.window;
        settings.bb_num_std = self.num_std;
    }
}
