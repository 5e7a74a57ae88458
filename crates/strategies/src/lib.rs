// In crates/strategies/src/lib.rs

use core_types::Side;

pub mod catalog;
pub mod configuration;
pub mod error;
pub mod factory;
pub mod generator;
pub mod ma_crossover;
pub mod macd;
pub mod mean_reversion;
pub mod momentum;
pub mod rsi;
pub mod types;

// Re-export the most important types for easy access.
pub use configuration::StrategyConfiguration;
pub use error::{Error, Result};
pub use generator::{GeneratedTrade, TradeGenerator};
pub use types::{ParamField, StrategyParams};

/// What a strategy sees when asked for its next trade direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeContext {
    /// The latest quoted price.
    pub price: f64,
    /// Price and side of the most recent trade, if any.
    pub last_trade: Option<(f64, Side)>,
}

impl TradeContext {
    /// Percentage move from the last trade's price to the current price.
    /// Zero when there is no previous trade.
    pub fn change_percent(&self) -> f64 {
        match self.last_trade {
            Some((last_price, _)) if last_price != 0.0 => (self.price - last_price) / last_price * 100.0,
            _ => 0.0,
        }
    }

    pub fn last_side(&self) -> Option<Side> {
        self.last_trade.map(|(_, side)| side)
    }

    /// The side opposite to the last trade; a buy when nothing has traded yet.
    pub fn alternate(&self) -> Side {
        self.last_side().map_or(Side::Buy, Side::opposite)
    }
}

/// The universal interface for a trade-decision rule.
///
/// A strategy may be stateful: it is shown every quote of a simulation in
/// order, even when its answer is overridden (e.g., the first trade is
/// always a buy), so indicator-based rules stay warmed up.
pub trait Strategy {
    /// The name of the strategy.
    fn name(&self) -> &'static str;

    fn decide(&mut self, ctx: &TradeContext) -> Side;
}

/// Used for strategy names that are not in the catalog.
#[derive(Debug, Default)]
pub struct Alternating;

impl Strategy for Alternating {
    fn name(&self) -> &'static str {
        "Alternating"
    }

    fn decide(&mut self, ctx: &TradeContext) -> Side {
        ctx.alternate()
    }
}
