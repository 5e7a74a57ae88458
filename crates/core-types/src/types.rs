// In crates/core-types/src/types.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Error;

/// A tradable instrument identifier (e.g., "RELIANCE", "TCS.BSE").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl Symbol {
    /// Normalizes a user-supplied asset name into an upper-case symbol.
    pub fn normalized(name: &str) -> Self {
        Self(name.trim().to_uppercase())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The direction of a simulated trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The other side. Used by the "alternate" decision rules.
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("buy"),
            Side::Sell => f.write_str("sell"),
        }
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(Error::UnknownSide(other.to_string())),
        }
    }
}

/// The market an asset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    #[default]
    Stocks,
    Crypto,
    Forex,
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetType::Stocks => f.write_str("stocks"),
            AssetType::Crypto => f.write_str("crypto"),
            AssetType::Forex => f.write_str("forex"),
        }
    }
}

impl FromStr for AssetType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stocks" | "stock" => Ok(AssetType::Stocks),
            "crypto" => Ok(AssetType::Crypto),
            "forex" => Ok(AssetType::Forex),
            other => Err(Error::UnknownAssetType(other.to_string())),
        }
    }
}

/// Lifecycle state of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationStatus {
    Running,
    Paused,
    Completed,
    Cancelled,
}

impl SimulationStatus {
    /// Running and paused simulations both count as the user's active one.
    pub fn is_active(self) -> bool {
        matches!(self, SimulationStatus::Running | SimulationStatus::Paused)
    }

    pub fn is_terminal(self) -> bool {
        !self.is_active()
    }
}

impl fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SimulationStatus::Running => "running",
            SimulationStatus::Paused => "paused",
            SimulationStatus::Completed => "completed",
            SimulationStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// A single price observation for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketQuote {
    pub symbol: Symbol,
    pub price: Decimal,
    /// Absolute change against the previous quote.
    pub change: Decimal,
    pub change_percent: f64,
    pub volume: u64,
    pub timestamp: DateTime<Utc>,
}

/// A trade recorded against a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    pub id: u64,
    pub simulation_id: u64,
    pub symbol: Symbol,
    pub side: Side,
    pub price: Decimal,
    pub quantity: Decimal,
    /// Notional value of the trade (`quantity * price`).
    pub amount: Decimal,
    /// Realized profit or loss. Only sells realize anything.
    pub profit_loss: Decimal,
    pub profit_loss_percent: f64,
    pub timestamp: DateTime<Utc>,
}
