// In crates/strategies/src/ma_crossover.rs

use crate::{Strategy, TradeContext};
use core_types::Side;
use ta::Next;
use ta::indicators::ExponentialMovingAverage as Ema;

/// Fast/slow EMA crossover.
///
/// A fresh crossover decides the side. Between crossovers the rule leans
/// with the trend: buy after a rise of more than 1% since the last trade,
/// sell otherwise.
#[derive(Debug)]
pub struct MACrossover {
    fast_ema: Ema,
    slow_ema: Ema,
    last_fast_ema_val: Option<f64>,
    last_slow_ema_val: Option<f64>,
}

const TREND_BIAS_PERCENT: f64 = 1.0;

impl MACrossover {
    /// Creates the rule from already-validated window lengths.
    pub fn new(fast_period: usize, slow_period: usize) -> crate::Result<Self> {
        let build = |period| Ema::new(period).map_err(|e| crate::Error::Indicator(format!("{e:?}")));
        Ok(Self {
            fast_ema: build(fast_period)?,
            slow_ema: build(slow_period)?,
            last_fast_ema_val: None,
            last_slow_ema_val: None,
        })
    }
}

impl Strategy for MACrossover {
    fn name(&self) -> &'static str {
        "MovingAverageCrossover"
    }

    fn decide(&mut self, ctx: &TradeContext) -> Side {
        let current_fast_ema = self.fast_ema.next(ctx.price);
        let current_slow_ema = self.slow_ema.next(ctx.price);

        let crossover = match (self.last_fast_ema_val, self.last_slow_ema_val) {
            // Bullish: fast line just crossed above the slow line.
            (Some(fast), Some(slow)) if current_fast_ema > current_slow_ema && fast <= slow => Some(Side::Buy),
            // Bearish: fast line just crossed below the slow line.
            (Some(fast), Some(slow)) if current_fast_ema < current_slow_ema && fast >= slow => Some(Side::Sell),
            _ => None,
        };

        self.last_fast_ema_val = Some(current_fast_ema);
        self.last_slow_ema_val = Some(current_slow_ema);

        crossover.unwrap_or(if ctx.change_percent() > TREND_BIAS_PERCENT {
            Side::Buy
        } else {
            Side::Sell
        })
    }
}
