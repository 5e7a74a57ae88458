// In crates/engine/src/simulation.rs

use analytics::PerformanceSummary;
use chrono::{DateTime, Utc};
use core_types::{AssetType, SimulationStatus, Symbol};
use rust_decimal::Decimal;
use serde::Serialize;
use strategies::StrategyParams;

use crate::config::SimulationRequest;
use crate::{Error, Result};

/// A simulation owned by one user, from start to its terminal state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    pub id: u64,
    pub user_id: u64,
    pub symbol: Symbol,
    pub asset_name: String,
    pub asset_type: AssetType,
    pub strategy: String,
    pub period: String,
    pub reinvest_profits: bool,
    pub strategy_params: StrategyParams,

    pub start_price: Decimal,
    pub current_price: Decimal,
    pub starting_capital: Decimal,
    /// Starting capital plus realized and unrealized profit.
    pub current_value: Decimal,

    pub status: SimulationStatus,
    /// Elapsed share of the simulation period, 0 to 100.
    pub progress: u8,
    pub started_at: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,

    pub total_trades: u32,
    pub final_value: Option<Decimal>,
    pub profit_loss: Option<Decimal>,
    pub profit_loss_percentage: Option<f64>,
    pub success_rate: Option<f64>,
}

impl Simulation {
    /// Creates a running simulation from a validated request.
    pub fn new(id: u64, user_id: u64, request: &SimulationRequest, start_price: Decimal, now: DateTime<Utc>) -> Self {
        let config = &request.config;
        Self {
            id,
            user_id,
            symbol: request.symbol.clone(),
            asset_name: config.asset_name.clone(),
            asset_type: config.asset_type,
            strategy: config.strategy.clone(),
            period: config.time_period.clone(),
            reinvest_profits: config.reinvest_profits,
            strategy_params: request.params,
            start_price,
            current_price: start_price,
            starting_capital: config.trade_amount,
            current_value: config.trade_amount,
            status: SimulationStatus::Running,
            progress: 0,
            started_at: now,
            end_time: now.checked_add_signed(request.duration).unwrap_or(DateTime::<Utc>::MAX_UTC),
            ended_at: None,
            total_trades: 0,
            final_value: None,
            profit_loss: None,
            profit_loss_percentage: None,
            success_rate: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// True once the simulation period has run out.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.end_time
    }

    /// Elapsed time over total duration as a percentage, clamped to 0..=100.
    pub fn progress_at(&self, now: DateTime<Utc>) -> u8 {
        let total = (self.end_time - self.started_at).num_milliseconds();
        if total <= 0 {
            return 100;
        }
        let elapsed = (now - self.started_at).num_milliseconds();
        (elapsed.saturating_mul(100) / total).clamp(0, 100) as u8
    }

    pub fn pause(&mut self) -> Result<()> {
        self.transition("pause", SimulationStatus::Running, SimulationStatus::Paused)
    }

    pub fn resume(&mut self) -> Result<()> {
        self.transition("resume", SimulationStatus::Paused, SimulationStatus::Running)
    }

    /// Pauses a running simulation or resumes a paused one.
    pub fn toggle_pause(&mut self) -> Result<SimulationStatus> {
        match self.status {
            SimulationStatus::Running => self.pause()?,
            _ => self.resume()?,
        }
        Ok(self.status)
    }

    /// Moves an active simulation to `Completed` and records its final figures.
    pub fn complete(&mut self, now: DateTime<Utc>, summary: &PerformanceSummary) -> Result<()> {
        self.finish("complete", SimulationStatus::Completed, now)?;
        self.total_trades = summary.total_trades;
        self.final_value = Some(summary.final_value);
        self.profit_loss = Some(summary.profit_loss);
        self.profit_loss_percentage = Some(summary.profit_loss_percentage);
        self.success_rate = Some(summary.success_rate);
        self.current_value = summary.final_value;
        Ok(())
    }

    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.finish("cancel", SimulationStatus::Cancelled, now)
    }

    fn finish(&mut self, action: &'static str, to: SimulationStatus, now: DateTime<Utc>) -> Result<()> {
        if self.status.is_terminal() {
            return Err(Error::InvalidTransition { action, status: self.status });
        }
        tracing::info!(simulation_id = self.id, from = %self.status, to = %to, "Simulation finished.");
        self.status = to;
        self.ended_at = Some(now);
        self.progress = self.progress_at(now);
        Ok(())
    }

    fn transition(&mut self, action: &'static str, from: SimulationStatus, to: SimulationStatus) -> Result<()> {
        if self.status != from {
            return Err(Error::InvalidTransition { action, status: self.status });
        }
        tracing::info!(simulation_id = self.id, from = %from, to = %to, "Simulation status changed.");
        self.status = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;
    use strategies::StrategyConfiguration;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap()
    }

    fn simulation() -> Simulation {
        let request =
            SimulationRequest::build(SimulationConfig::default(), &StrategyConfiguration::new()).unwrap();
        Simulation::new(1, 7, &request, dec!(2750), start())
    }

    #[test]
    fn starts_running_with_end_time_from_period() {
        let sim = simulation();
        assert_eq!(sim.status, SimulationStatus::Running);
        assert_eq!(sim.end_time, start() + Duration::hours(24));
        assert_eq!(sim.starting_capital, dec!(10000));
        assert_eq!(sim.current_price, dec!(2750));
    }

    #[test]
    fn end_time_saturates_instead_of_overflowing() {
        let mut request =
            SimulationRequest::build(SimulationConfig::default(), &StrategyConfiguration::new()).unwrap();
        request.duration = Duration::weeks(100_000_000);

        let sim = Simulation::new(1, 7, &request, dec!(2750), start());
        assert_eq!(sim.end_time, DateTime::<Utc>::MAX_UTC);
        assert!(!sim.is_due(start()));
    }

    #[test]
    fn progress_is_clamped() {
        let sim = simulation();
        assert_eq!(sim.progress_at(start() - Duration::hours(1)), 0);
        assert_eq!(sim.progress_at(start() + Duration::hours(6)), 25);
        assert_eq!(sim.progress_at(start() + Duration::hours(30)), 100);
        assert!(sim.is_due(start() + Duration::hours(24)));
        assert!(!sim.is_due(start() + Duration::hours(23)));
    }

    #[test]
    fn pause_and_resume_toggle() {
        let mut sim = simulation();
        assert_eq!(sim.toggle_pause().unwrap(), SimulationStatus::Paused);
        assert_eq!(sim.toggle_pause().unwrap(), SimulationStatus::Running);
        assert_eq!(
            sim.resume(),
            Err(Error::InvalidTransition { action: "resume", status: SimulationStatus::Running })
        );
    }

    #[test]
    fn terminal_states_are_final() {
        let mut sim = simulation();
        sim.pause().unwrap();
        sim.cancel(start() + Duration::hours(1)).unwrap();
        assert_eq!(sim.status, SimulationStatus::Cancelled);
        assert_eq!(sim.ended_at, Some(start() + Duration::hours(1)));

        let summary = PerformanceSummary::untraded(dec!(10000));
        assert!(sim.complete(start(), &summary).is_err());
        assert!(sim.toggle_pause().is_err());
        assert!(sim.cancel(start()).is_err());
    }

    #[test]
    fn completion_records_final_figures() {
        let mut sim = simulation();
        let summary = PerformanceSummary {
            final_value: dec!(10250),
            profit_loss: dec!(250),
            profit_loss_percentage: 2.5,
            total_trades: 4,
            success_rate: 50.0,
            ..PerformanceSummary::untraded(dec!(10000))
        };
        sim.complete(start() + Duration::hours(12), &summary).unwrap();

        assert_eq!(sim.status, SimulationStatus::Completed);
        assert_eq!(sim.progress, 50);
        assert_eq!(sim.final_value, Some(dec!(10250)));
        assert_eq!(sim.total_trades, 4);
        assert_eq!(sim.success_rate, Some(50.0));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(simulation()).unwrap();
        assert_eq!(json["userId"], 7);
        assert_eq!(json["status"], "running");
        assert_eq!(json["strategyParams"]["slowPeriod"], 26.0);
        assert!(json["endedAt"].is_null());
    }
}
