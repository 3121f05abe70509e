pub mod bollinger_bands;
pub mod macd_crossover;
pub mod ma_crossover;
pub mod rsi_oversold;

use crate::data::Bar;
use crate::error::BacktestError;
use crate::indicators::{IndicatorFrame, IndicatorSettings};
use crate::portfolio::PositionState;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use bollinger_bands::BollingerBandsParams;
pub use macd_crossover::MacdCrossoverParams;
pub use ma_crossover::MaCrossoverParams;
pub use rsi_oversold::RsiOversoldParams;

//action requested for a single bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

//interface implemented by every strategy variant's parameter set
pub trait SignalRule {
    //canonical strategy name
    fn name(&self) -> &'static str;

    //evaluates bar `index` using only that bar and the one before it
    //must return Hold whenever a value it needs is unavailable
    fn evaluate(
        &self,
        index: usize,
        bars: &[Bar],
        frame: &IndicatorFrame,
        position: &PositionState,
    ) -> Signal;

    //overrides a single named parameter
    fn set_param(&mut self, name: &str, value: f64) -> Result<(), BacktestError>;

    //checks relationships between parameters once all overrides are applied
    fn validate(&self) -> Result<(), BacktestError>;

    //writes this strategy's windows into the pipeline settings
    fn configure(&self, settings: &mut IndicatorSettings);
}

//strategy family, parsed from a user-supplied name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    MaCrossover,
    RsiOversold,
    MacdCrossover,
    BollingerBands,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::MaCrossover,
        StrategyKind::RsiOversold,
        StrategyKind::MacdCrossover,
        StrategyKind::BollingerBands,
    ];

    //parse strategy kind from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ma_crossover" | "ma" | "sma" => Some(StrategyKind::MaCrossover),
            "rsi_oversold" | "rsi" => Some(StrategyKind::RsiOversold),
            "macd_crossover" | "macd" => Some(StrategyKind::MacdCrossover),
            "bollinger_bands" | "bollinger" | "bb" => Some(StrategyKind::BollingerBands),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::MaCrossover => "MA_CROSSOVER",
            StrategyKind::RsiOversold => "RSI_OVERSOLD",
            StrategyKind::MacdCrossover => "MACD_CROSSOVER",
            StrategyKind::BollingerBands => "BOLLINGER_BANDS",
        }
    }
}

//a strategy variant together with its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "params")]
pub enum Strategy {
    MaCrossover(MaCrossoverParams),
    RsiOversold(RsiOversoldParams),
    MacdCrossover(MacdCrossoverParams),
    BollingerBands(BollingerBandsParams),
}

impl Strategy {
    //strategy with default parameters
    pub fn default_for(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::MaCrossover => Strategy::MaCrossover(MaCrossoverParams::default()),
            StrategyKind::RsiOversold => Strategy::RsiOversold(RsiOversoldParams::default()),
            StrategyKind::MacdCrossover => Strategy::MacdCrossover(MacdCrossoverParams::default()),
            StrategyKind::BollingerBands => {
                Strategy::BollingerBands(BollingerBandsParams::default())
            }
        }
    }

    //resolves a strategy name plus parameter overrides
    pub fn from_name(name: &str, overrides: &IndexMap<String, f64>) -> Result<Self, BacktestError> {
        let kind = StrategyKind::parse(name)
            .ok_or_else(|| BacktestError::UnknownStrategy(name.to_string()))?;
        let mut strategy = Strategy::default_for(kind);

        for (key, &value) in overrides {
            strategy.rule_mut().set_param(key, value)?;
        }
        strategy.rule().validate()?;

        Ok(strategy)
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::MaCrossover(_) => StrategyKind::MaCrossover,
            Strategy::RsiOversold(_) => StrategyKind::RsiOversold,
            Strategy::MacdCrossover(_) => StrategyKind::MacdCrossover,
            Strategy::BollingerBands(_) => StrategyKind::BollingerBands,
        }
    }

    pub fn name(&self) -> &'static str {
        self.rule().name()
    }

    fn rule(&self) -> &dyn SignalRule {
        match self {
            Strategy::MaCrossover(p) => p,
            Strategy::RsiOversold(p) => p,
            Strategy::MacdCrossover(p) => p,
            Strategy::BollingerBands(p) => p,
        }
    }

    fn rule_mut(&mut self) -> &mut dyn SignalRule {
        match self {
            Strategy::MaCrossover(p) => p,
            Strategy::RsiOversold(p) => p,
            Strategy::MacdCrossover(p) => p,
            Strategy::BollingerBands(p) => p,
        }
    }

    //pipeline settings: defaults with this strategy's own windows applied
    pub fn indicator_settings(&self) -> IndicatorSettings {
        let mut settings = IndicatorSettings::default();
        self.rule().configure(&mut settings);
        settings
    }

    //signal for bar `index` given the position held before that bar settles
    pub fn signal(
        &self,
        index: usize,
        bars: &[Bar],
        frame: &IndicatorFrame,
        position: &PositionState,
    ) -> Signal {
        if index >= bars.len() || index >= frame.len() {
            return Signal::Hold;
        }
        self.rule().evaluate(index, bars, frame, position)
    }
}

//direction of a two-line crossing on the current bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cross {
    Above,
    Below,
    None,
}

//reads column values at `index` for both lines, if both are available
pub(crate) fn pair_at(a: &[Option<f64>], b: &[Option<f64>], index: usize) -> Option<(f64, f64)> {
    match (a.get(index).copied().flatten(), b.get(index).copied().flatten()) {
        (Some(x), Some(y)) => Some((x, y)),
        _ => None,
    }
}

//detects whether line `a` crossed line `b` on bar `index`
//
//the current bar must have both values; when the previous bar has none (end of
//a warm-up window) the first bar where `a` is strictly above `b` counts as a
//crossing above, and likewise below
pub(crate) fn crossing(a: &[Option<f64>], b: &[Option<f64>], index: usize) -> Cross {
    let (cur_a, cur_b) = match pair_at(a, b, index) {
        Some(values) => values,
        None => return Cross::None,
    };
    let prev = index.checked_sub(1).and_then(|i| pair_at(a, b, i));

    match prev {
        Some((prev_a, prev_b)) => {
            if prev_a <= prev_b && cur_a > cur_b {
                Cross::Above
            } else if prev_a >= prev_b && cur_a < cur_b {
                Cross::Below
            } else {
                Cross::None
            }
        }
        None if cur_a > cur_b => Cross::Above,
        None if cur_a < cur_b => Cross::Below,
        None => Cross::None,
    }
}

//converts a crossing into a position-aware signal
pub(crate) fn cross_signal(cross: Cross, position: &PositionState) -> Signal {
    match cross {
        Cross::Above if position.is_flat() => Signal::Buy,
        Cross::Below if position.is_long() => Signal::Sell,
        _ => Signal::Hold,
    }
}

//largest window length accepted from an override
const MAX_WINDOW: f64 = u32::MAX as f64;

//parses a window-length override: a positive whole number no larger than MAX_WINDOW
pub(crate) fn window_param(name: &str, value: f64) -> Result<usize, BacktestError> {
    if !value.is_finite() || value < 1.0 || value > MAX_WINDOW || value.fract() != 0.0 {
        return Err(BacktestError::InvalidParameter {
            name: name.to_string(),
            reason: format!(
                "must be a whole number of bars between 1 and {}, got {}",
                u32::MAX,
                value
            ),
        });
    }
    Ok(value as usize)
}

pub(crate) fn unknown_param(strategy: &'static str, name: &str, accepted: &[&str]) -> BacktestError {
    BacktestError::UnknownParameter {
        strategy,
        name: name.to_string(),
        accepted: accepted.join(", "),
    }
}
