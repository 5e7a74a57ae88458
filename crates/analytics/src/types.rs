// In crates/analytics/src/types.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A point on a simulation's balance curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub value: Decimal,
}

/// The final performance of a simulation, computed from its trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub starting_capital: Decimal,
    pub final_value: Decimal,
    pub profit_loss: Decimal,
    pub profit_loss_percentage: f64,

    pub total_trades: u32,
    /// Trades that realized a profit.
    pub successful_trades: u32,
    pub success_rate: f64,
    pub avg_profit_per_trade: Decimal,

    pub gross_profit: Decimal,
    pub gross_loss: Decimal,
    /// Gross profit over gross loss; infinite when nothing was lost.
    pub profit_factor: f64,
    pub max_drawdown_absolute: Decimal,
    pub max_drawdown_percentage: f64,

    /// The balance after each trade, starting from the starting capital.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub equity_curve: Vec<EquityPoint>,
}

impl PerformanceSummary {
    /// An empty report for a simulation that never traded.
    pub fn untraded(starting_capital: Decimal) -> Self {
        Self {
            starting_capital,
            final_value: starting_capital,
            ..Self::default()
        }
    }
}
