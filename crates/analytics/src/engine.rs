// In crates/analytics/src/engine.rs

use crate::types::{EquityPoint, PerformanceSummary};
use core_types::TradeRecord;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

/// The engine responsible for calculating performance metrics from trade data.
#[derive(Default)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculates the final performance of a simulation.
    ///
    /// `trades` must be in chronological order; the balance curve is the
    /// starting capital plus the running sum of realized profit and loss.
    pub fn calculate(&self, starting_capital: Decimal, trades: &[TradeRecord]) -> PerformanceSummary {
        let mut report = PerformanceSummary::untraded(starting_capital);
        if trades.is_empty() {
            return report; // Nothing traded, nothing to measure.
        }

        // --- 1. Totals ---
        report.total_trades = trades.len() as u32;
        report.profit_loss = trades.iter().map(|t| t.profit_loss).sum();
        report.final_value = starting_capital + report.profit_loss;
        if starting_capital > dec!(0) {
            report.profit_loss_percentage = (report.profit_loss / starting_capital)
                .to_f64()
                .unwrap_or(0.0)
                * 100.0;
        }
        report.avg_profit_per_trade = (report.profit_loss / Decimal::from(trades.len())).round_dp(2);

        // --- 2. Success Rate & Profit Factor ---
        report.successful_trades = trades.iter().filter(|t| t.profit_loss > dec!(0)).count() as u32;
        report.success_rate = report.successful_trades as f64 / report.total_trades as f64 * 100.0;

        report.gross_profit = trades
            .iter()
            .filter(|t| t.profit_loss > dec!(0))
            .map(|t| t.profit_loss)
            .sum();
        report.gross_loss = trades
            .iter()
            .filter(|t| t.profit_loss < dec!(0))
            .map(|t| t.profit_loss)
            .sum::<Decimal>()
            .abs();
        report.profit_factor = if report.gross_loss > dec!(0) {
            (report.gross_profit / report.gross_loss).to_f64().unwrap_or(0.0)
        } else if report.gross_profit > dec!(0) {
            f64::INFINITY // Pure profit
        } else {
            0.0
        };

        // --- 3. Balance Curve & Max Drawdown ---
        let mut balance = starting_capital;
        let mut peak = starting_capital;
        let mut max_drawdown = dec!(0);
        let mut max_drawdown_peak = starting_capital;
        for trade in trades {
            balance += trade.profit_loss;
            report.equity_curve.push(EquityPoint {
                timestamp: trade.timestamp,
                value: balance,
            });
            peak = peak.max(balance);
            let drawdown = peak - balance;
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
                max_drawdown_peak = peak;
            }
        }
        report.max_drawdown_absolute = max_drawdown;
        if max_drawdown_peak > dec!(0) {
            report.max_drawdown_percentage = (max_drawdown / max_drawdown_peak).to_f64().unwrap_or(0.0) * 100.0;
        }

        report
    }
}
