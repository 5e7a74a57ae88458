// In crates/strategies/src/momentum.rs

use crate::{Strategy, TradeContext};
use core_types::Side;

/// Follows the direction of the move since the last trade.
#[derive(Debug, Clone, Default)]
pub struct Momentum;

impl Strategy for Momentum {
    fn name(&self) -> &'static str {
        "Momentum"
    }

    fn decide(&mut self, ctx: &TradeContext) -> Side {
        if ctx.change_percent() > 0.0 { Side::Buy } else { Side::Sell }
    }
}
