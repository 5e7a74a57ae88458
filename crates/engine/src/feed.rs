// In crates/engine/src/feed.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use core_types::{MarketQuote, Symbol};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Anything that can produce the next quote for a symbol.
pub trait QuoteSource {
    fn next_quote(&mut self, symbol: &Symbol, now: DateTime<Utc>) -> MarketQuote;
}

/// Known starting prices for the mock feed, matched as substrings.
const BASE_PRICES: [(&str, f64); 4] = [
    ("RELIANCE", 2750.0),
    ("TCS", 3450.0),
    ("INFY", 1520.0),
    ("HDFC", 1680.0),
];
const DEFAULT_BASE_PRICE: f64 = 1000.0;

/// Per-step move is `(u - DRIFT_CENTER) * STEP_SCALE * price` with `u` uniform in [0, 1).
const DRIFT_CENTER: f64 = 0.48;
const STEP_SCALE: f64 = 0.005;
const MIN_PRICE: f64 = 0.01;

/// A seeded random walk standing in for a market-data provider.
///
/// Each symbol starts from its base price and then drifts slightly upward
/// on average. The same seed always yields the same sequence.
#[derive(Debug)]
pub struct MockQuoteFeed {
    rng: StdRng,
    prices: HashMap<Symbol, f64>,
}

impl MockQuoteFeed {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            prices: HashMap::new(),
        }
    }

    pub fn base_price(symbol: &Symbol) -> f64 {
        BASE_PRICES
            .iter()
            .find(|(name, _)| symbol.0.contains(name))
            .map(|(_, price)| *price)
            .unwrap_or(DEFAULT_BASE_PRICE)
    }
}

impl QuoteSource for MockQuoteFeed {
    fn next_quote(&mut self, symbol: &Symbol, now: DateTime<Utc>) -> MarketQuote {
        let previous = *self
            .prices
            .entry(symbol.clone())
            .or_insert_with(|| Self::base_price(symbol));

        let step = (self.rng.r#gen::<f64>() - DRIFT_CENTER) * previous * STEP_SCALE;
        let price = (previous + step).max(MIN_PRICE);
        self.prices.insert(symbol.clone(), price);

        let to_money = |value: f64| Decimal::from_f64(value).unwrap_or_default().round_dp(2);
        MarketQuote {
            symbol: symbol.clone(),
            price: to_money(price),
            change: to_money(price - previous),
            change_percent: (price - previous) / previous * 100.0,
            volume: self.rng.gen_range(0..10_000),
            timestamp: now,
        }
    }
}
