// In crates/strategies/src/mean_reversion.rs

use crate::{Strategy, TradeContext};
use core_types::Side;

/// Buys into a sharp drop and sells otherwise.
#[derive(Debug, Clone)]
pub struct MeanReversion {
    /// How far (in percent) the price must fall since the last trade before buying.
    pub drop_trigger_percent: f64,
}

impl Default for MeanReversion {
    fn default() -> Self {
        Self { drop_trigger_percent: 2.0 }
    }
}

impl Strategy for MeanReversion {
    fn name(&self) -> &'static str {
        "MeanReversion"
    }

    fn decide(&mut self, ctx: &TradeContext) -> Side {
        if ctx.change_percent() < -self.drop_trigger_percent {
            Side::Buy
        } else {
            Side::Sell
        }
    }
}
