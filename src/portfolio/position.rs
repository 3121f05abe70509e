use serde::{Deserialize, Serialize};

//whether capital is currently deployed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSide {
    Flat,
    Long,
}

impl PositionSide {
    //0 for flat, 1 for long, as written to the equity curve export
    pub fn as_flag(&self) -> u8 {
        match self {
            PositionSide::Flat => 0,
            PositionSide::Long => 1,
        }
    }
}

//position state machine value; only the account mutates it
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PositionState {
    #[default]
    Flat,
    Long {
        entry_price: f64,
        shares: u64,
        entry_bar_index: usize,
    },
}

impl PositionState {
    pub fn side(&self) -> PositionSide {
        match self {
            PositionState::Flat => PositionSide::Flat,
            PositionState::Long { .. } => PositionSide::Long,
        }
    }

    //returns true if no shares are held
    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }

    //returns true if the position is long
    pub fn is_long(&self) -> bool {
        matches!(self, PositionState::Long { .. })
    }

    pub fn shares(&self) -> u64 {
        match self {
            PositionState::Flat => 0,
            PositionState::Long { shares, .. } => *shares,
        }
    }

    //value of the held shares at `price`
    pub fn market_value(&self, price: f64) -> f64 {
        self.shares() as f64 * price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_holds_nothing() {
        let state = PositionState::default();
        assert!(state.is_flat());
        assert_eq!(state.side(), PositionSide::Flat);
        assert_eq!(state.market_value(123.0), 0.0);
    }

    #[test]
    fn long_is_marked_to_market() {
        let state = PositionState::Long {
            entry_price: 100.0,
            shares: 10,
            entry_bar_index: 3,
        };
        assert!(state.is_long());
        assert_eq!(state.side().as_flag(), 1);
        assert_eq!(state.market_value(105.0), 1050.0);
    }
}
