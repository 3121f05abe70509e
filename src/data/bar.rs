use crate::error::BacktestError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BarError {
    #[error("{field} price must be positive, got {value}")]
    NonPositivePrice { field: &'static str, value: f64 },
    #[error("Invalid OHLC values: high ({high}) < low ({low})")]
    InvalidHighLow { high: f64, low: f64 },
    #[error("Negative volume: {0}")]
    NegativeVolume(f64),
}

//represents a single ohlcv bar (candlestick) of market data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    //creates a new Bar with validation
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self, BarError> {
        let bar = Bar::new_unchecked(timestamp, open, high, low, close, volume);
        bar.validate()?;
        Ok(bar)
    }

    //creates a Bar without validation
    pub fn new_unchecked(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    //checks prices are positive, high >= low and volume is non-negative
    //nan fails every comparison, so it is rejected too
    pub fn validate(&self) -> Result<(), BarError> {
        for (field, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(BarError::NonPositivePrice { field, value });
            }
        }

        if self.high < self.low {
            return Err(BarError::InvalidHighLow {
                high: self.high,
                low: self.low,
            });
        }

        if !(self.volume >= 0.0) {
            return Err(BarError::NegativeVolume(self.volume));
        }

        Ok(())
    }
}

//a validated, chronologically ordered sequence of bars for one instrument
//
//construction is the only place preconditions are checked, so every consumer
//can rely on: non-empty, strictly increasing timestamps, positive prices
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(bars: Vec<Bar>) -> Result<Self, BacktestError> {
        if bars.is_empty() {
            return Err(BacktestError::EmptySeries);
        }

        for (index, bar) in bars.iter().enumerate() {
            bar.validate()
                .map_err(|source| BacktestError::InvalidBar { index, source })?;
        }

        for (index, pair) in bars.windows(2).enumerate() {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(BacktestError::NonMonotonicTimestamp {
                    index: index + 1,
                    previous: pair[0].timestamp,
                    current: pair[1].timestamp,
                });
            }
        }

        Ok(BarSeries { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    //close prices in bar order
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn first(&self) -> &Bar {
        &self.bars[0]
    }

    pub fn last(&self) -> &Bar {
        &self.bars[self.bars.len() - 1]
    }

    pub fn into_inner(self) -> Vec<Bar> {
        self.bars
    }
}

impl Deref for BarSeries {
    type Target = [Bar];

    fn deref(&self) -> &[Bar] {
        &self.bars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn bar(day: u32, close: f64) -> Bar {
        Bar::new_unchecked(ts(day), close, close, close, close, 1000.0)
    }

    #[test]
    fn empty_series_is_rejected() {
        assert_eq!(BarSeries::new(vec![]), Err(BacktestError::EmptySeries));
    }

    #[test]
    fn duplicate_timestamp_is_rejected() {
        let err = BarSeries::new(vec![bar(1, 10.0), bar(2, 11.0), bar(2, 12.0)]).unwrap_err();
        assert_eq!(
            err,
            BacktestError::NonMonotonicTimestamp {
                index: 2,
                previous: ts(2),
                current: ts(2),
            }
        );
    }

    #[test]
    fn out_of_order_timestamp_is_rejected() {
        let err = BarSeries::new(vec![bar(3, 10.0), bar(2, 11.0)]).unwrap_err();
        assert!(matches!(
            err,
            BacktestError::NonMonotonicTimestamp { index: 1, .. }
        ));
    }

    #[test]
    fn non_positive_close_is_rejected_with_index() {
        let err = BarSeries::new(vec![bar(1, 10.0), bar(2, 0.0)]).unwrap_err();
        assert!(matches!(
            err,
            BacktestError::InvalidBar {
                index: 1,
                source: BarError::NonPositivePrice { field: "open", .. }
            }
        ));
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn nan_price_is_rejected() {
        let mut b = bar(1, 10.0);
        b.close = f64::NAN;
        assert!(matches!(
            b.validate(),
            Err(BarError::NonPositivePrice { field: "close", .. })
        ));
    }

    #[test]
    fn negative_volume_is_rejected() {
        let err = Bar::new(ts(1), 10.0, 11.0, 9.0, 10.5, -1.0).unwrap_err();
        assert_eq!(err, BarError::NegativeVolume(-1.0));
    }

    #[test]
    fn high_below_low_is_rejected() {
        let err = Bar::new(ts(1), 10.0, 9.0, 11.0, 10.0, 0.0).unwrap_err();
        assert_eq!(err, BarError::InvalidHighLow { high: 9.0, low: 11.0 });
    }

    #[test]
    fn valid_series_exposes_bars_in_order() {
        let series = BarSeries::new(vec![bar(1, 10.0), bar(2, 11.0), bar(5, 9.0)]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![10.0, 11.0, 9.0]);
        assert_eq!(series.first().close, 10.0);
        assert_eq!(series.last().close, 9.0);
    }
}
