// In crates/strategies/src/rsi.rs

use crate::{Strategy, TradeContext};
use core_types::Side;

/// Simplified RSI rule: exits on stop-loss or take-profit, otherwise
/// alternates between buying and selling.
#[derive(Debug, Clone)]
pub struct RsiStrategy {
    /// Stop-loss distance in percent.
    pub stop_loss_percent: f64,
    /// Take-profit distance in percent.
    pub take_profit_percent: f64,
}

impl RsiStrategy {
    pub fn new(stop_loss_percent: f64, take_profit_percent: f64) -> Self {
        Self { stop_loss_percent, take_profit_percent }
    }
}

impl Strategy for RsiStrategy {
    fn name(&self) -> &'static str {
        "RsiStrategy"
    }

    fn decide(&mut self, ctx: &TradeContext) -> Side {
        let change = ctx.change_percent();
        if change <= -self.stop_loss_percent || change >= self.take_profit_percent {
            return Side::Sell;
        }
        ctx.alternate()
    }
}
