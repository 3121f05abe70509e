use crate::data::Bar;
use crate::error::BacktestError;
use crate::indicators::{IndicatorFrame, IndicatorSettings};
use crate::portfolio::PositionState;
use crate::strategy::{unknown_param, window_param, Signal, SignalRule};
use serde::{Deserialize, Serialize};

const NAME: &str = "RSI_OVERSOLD";
const PARAMS: [&str; 3] = ["rsi_period", "oversold", "overbought"];

//rsi mean reversion
//buys when rsi drops below the oversold threshold
//sells when rsi rises above the overbought threshold
//level trigger: fires on every bar the condition holds, the position filter
//turns repeats into holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiOversoldParams {
    pub rsi_period: usize,
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for RsiOversoldParams {
    fn default() -> Self {
        RsiOversoldParams {
            rsi_period: 14,
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

impl SignalRule for RsiOversoldParams {
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
        let rsi = match frame.rsi.get(index).copied().flatten() {
            Some(v) => v,
            None => return Signal::Hold,
        };

        if rsi < self.oversold && position.is_flat() {
            Signal::Buy
        } else if rsi > self.overbought && position.is_long() {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }

    fn set_param(&mut self, name: &str, value: f64) -> Result<(), BacktestError> {
        match name {
            "rsi_period" => self.rsi_period = window_param(name, value)?,
            "oversold" => self.oversold = threshold_param(name, value)?,
            "overbought" => self.overbought = threshold_param(name, value)?,
            _ => return Err(unknown_param(NAME, name, &PARAMS)),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), BacktestError> {
        if self.oversold >= self.overbought {
            return Err(BacktestError::InvalidParameter {
                name: "oversold".to_string(),
                reason: format!(
                    "must be below overbought ({} >= {})",
                    self.oversold, self.overbought
                ),
            });
        }
        Ok(())
    }

    fn configure(&self, settings: &mut IndicatorSettings) {
        settings.rsi_period = self.rsi_period;
    }
}

fn threshold_param(name: &str, value: f64) -> Result<f64, BacktestError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(BacktestError::InvalidParameter {
            name: name.to_string(),
            reason: format!("RSI thresholds lie within 0..=100, got {}", value),
        });
    }
    Ok(value)
}
