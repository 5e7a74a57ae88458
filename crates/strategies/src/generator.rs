// In crates/strategies/src/generator.rs

use core_types::{Side, TradeRecord};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::{Error, Result, Strategy, TradeContext};

/// Notional traded per order when nothing else is configured (₹7,500).
pub const DEFAULT_ORDER_NOTIONAL: Decimal = dec!(7500);

/// A trade proposed by the generator, not yet tied to a simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTrade {
    pub side: Side,
    pub price: Decimal,
    pub quantity: Decimal,
    pub amount: Decimal,
    pub profit_loss: Decimal,
    pub profit_loss_percent: f64,
}

/// Shares currently held and what they cost, replayed from a trade list.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Holding {
    pub quantity: Decimal,
    pub cost_basis: Decimal,
}

impl Holding {
    /// Replays trades in chronological order. Sells reduce the cost basis at
    /// the average cost and never take the holding below zero.
    pub fn from_trades(trades: &[TradeRecord]) -> Self {
        trades.iter().fold(Holding::default(), |mut holding, trade| {
            match trade.side {
                Side::Buy => {
                    holding.quantity += trade.quantity;
                    holding.cost_basis += trade.quantity * trade.price;
                }
                Side::Sell if holding.quantity > Decimal::ZERO => {
                    let sold = trade.quantity.min(holding.quantity);
                    let released = holding.average_cost() * sold;
                    holding.cost_basis -= released;
                    holding.quantity -= sold;
                }
                Side::Sell => {}
            }
            holding
        })
    }

    pub fn average_cost(&self) -> Decimal {
        if self.quantity > Decimal::ZERO {
            self.cost_basis / self.quantity
        } else {
            Decimal::ZERO
        }
    }
}

/// Produces mock trades for a running simulation.
///
/// Every order uses the same notional. Sells are capped at the shares held,
/// and a sell with nothing to sell is turned into a buy.
#[derive(Debug, Clone)]
pub struct TradeGenerator {
    order_notional: Decimal,
}

impl Default for TradeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ORDER_NOTIONAL)
    }
}

impl TradeGenerator {
    pub fn new(order_notional: Decimal) -> Self {
        Self { order_notional }
    }

    /// Generates the next trade at `price`.
    ///
    /// `previous` must be in chronological order. The strategy is always
    /// consulted, but its answer is replaced by `forced` when given and by a
    /// buy when this is the simulation's first trade.
    pub fn generate(
        &self,
        strategy: &mut dyn Strategy,
        price: Decimal,
        previous: &[TradeRecord],
        forced: Option<Side>,
    ) -> Result<GeneratedTrade> {
        if price <= Decimal::ZERO {
            return Err(Error::InvalidPrice(price));
        }

        let ctx = TradeContext {
            price: price.to_f64().unwrap_or(0.0),
            last_trade: previous
                .last()
                .map(|t| (t.price.to_f64().unwrap_or(0.0), t.side)),
        };
        let decided = strategy.decide(&ctx);

        let mut side = match forced {
            Some(side) => side,
            None if previous.is_empty() => Side::Buy,
            None => decided,
        };

        let full_quantity = (self.order_notional / price).round_dp(2);
        let holding = Holding::from_trades(previous);

        let mut quantity = full_quantity;
        if side == Side::Sell {
            quantity = full_quantity.min(holding.quantity);
            if quantity <= Decimal::ZERO {
                tracing::debug!(strategy = strategy.name(), "Nothing to sell, buying instead.");
                side = Side::Buy;
                quantity = full_quantity;
            }
        }

        let (profit_loss, profit_loss_percent) = match side {
            Side::Sell => {
                let average_cost = holding.average_cost();
                let pnl = ((price - average_cost) * quantity).round_dp(2);
                let pct = if average_cost > Decimal::ZERO {
                    ((price - average_cost) / average_cost).to_f64().unwrap_or(0.0) * 100.0
                } else {
                    0.0
                };
                (pnl, pct)
            }
            Side::Buy => (Decimal::ZERO, 0.0),
        };

        Ok(GeneratedTrade {
            side,
            price,
            quantity,
            amount: (quantity * price).round_dp(2),
            profit_loss,
            profit_loss_percent,
        })
    }
}
