// In crates/strategies/src/macd.rs

use crate::types::StrategyParams;
use crate::{Error, Result, Strategy, TradeContext};
use core_types::Side;
use ta::Next;
use ta::indicators::MovingAverageConvergenceDivergence as Macd;

/// Trades the MACD histogram against the configured thresholds.
///
/// * histogram above `buy_threshold` buys, below `sell_threshold` sells;
/// * a long whose price has fallen by `stop_loss` percent since the buy is sold;
/// * inside the band the rule alternates.
#[derive(Debug)]
pub struct MacdStrategy {
    macd: Macd,
    buy_threshold: f64,
    sell_threshold: f64,
    stop_loss: f64,
    last_histogram: f64,
}

impl MacdStrategy {
    /// Builds the indicator from the parameter set's windows.
    ///
    /// Fails if any period is not a whole number between 1 and
    /// [`MAX_INDICATOR_WINDOW`](crate::types::MAX_INDICATOR_WINDOW).
    pub fn new(params: &StrategyParams) -> Result<Self> {
        let (fast, slow, signal) = params
            .periods()
            .ok_or_else(|| Error::Indicator("MACD periods must be whole numbers within the indicator window limit".to_string()))?;
        let macd = Macd::new(fast, slow, signal).map_err(|e| Error::Indicator(format!("{e:?}")))?;

        Ok(Self {
            macd,
            buy_threshold: params.buy_threshold,
            sell_threshold: params.sell_threshold,
            stop_loss: params.stop_loss,
            last_histogram: 0.0,
        })
    }

    /// The histogram value produced by the most recent quote.
    pub fn last_histogram(&self) -> f64 {
        self.last_histogram
    }
}

impl Strategy for MacdStrategy {
    fn name(&self) -> &'static str {
        "Macd"
    }

    fn decide(&mut self, ctx: &TradeContext) -> Side {
        let output = self.macd.next(ctx.price);
        self.last_histogram = output.histogram;

        if ctx.last_side() == Some(Side::Buy) && ctx.change_percent() <= -self.stop_loss {
            tracing::debug!(change = ctx.change_percent(), "MACD stop-loss hit.");
            return Side::Sell;
        }

        if output.histogram > self.buy_threshold {
            Side::Buy
        } else if output.histogram < self.sell_threshold {
            Side::Sell
        } else {
            ctx.alternate()
        }
    }
}
