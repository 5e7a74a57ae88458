// In crates/engine/src/store.rs

use std::collections::{BTreeMap, HashMap};

use analytics::PerformanceSummary;
use chrono::{DateTime, Utc};
use core_types::{SimulationStatus, TradeRecord};
use rust_decimal::Decimal;
use serde::Serialize;
use strategies::GeneratedTrade;

use crate::config::SimulationRequest;
use crate::simulation::Simulation;
use crate::{Error, Result};

/// A simulation together with its trades and, once completed, its report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResults<'a> {
    pub simulation: &'a Simulation,
    pub trades: &'a [TradeRecord],
    pub performance_report: Option<&'a PerformanceSummary>,
}

/// In-memory storage for simulations, their trades and final reports.
///
/// Ids start at 1 and are never reused. A user has at most one active
/// (running or paused) simulation at a time.
#[derive(Debug)]
pub struct SimulationStore {
    simulations: BTreeMap<u64, Simulation>,
    trades: HashMap<u64, Vec<TradeRecord>>,
    reports: HashMap<u64, PerformanceSummary>,
    next_simulation_id: u64,
    next_trade_id: u64,
}

impl Default for SimulationStore {
    fn default() -> Self {
        Self {
            simulations: BTreeMap::new(),
            trades: HashMap::new(),
            reports: HashMap::new(),
            next_simulation_id: 1,
            next_trade_id: 1,
        }
    }
}

impl SimulationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a running simulation for `user_id`.
    pub fn create(
        &mut self,
        user_id: u64,
        request: &SimulationRequest,
        start_price: Decimal,
        now: DateTime<Utc>,
    ) -> Result<&Simulation> {
        if self.active_for(user_id).is_some() {
            return Err(Error::AlreadyActive { user_id });
        }

        let id = self.next_simulation_id;
        self.next_simulation_id += 1;

        let simulation = Simulation::new(id, user_id, request, start_price, now);
        tracing::info!(simulation_id = id, user_id, symbol = %simulation.symbol, "Simulation created.");
        Ok(self.simulations.entry(id).or_insert(simulation))
    }

    pub fn get(&self, id: u64) -> Option<&Simulation> {
        self.simulations.get(&id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Simulation> {
        self.simulations.get_mut(&id)
    }

    /// The user's running or paused simulation, if any.
    pub fn active_for(&self, user_id: u64) -> Option<&Simulation> {
        self.simulations
            .values()
            .find(|s| s.user_id == user_id && s.is_active())
    }

    pub fn active_for_mut(&mut self, user_id: u64) -> Option<&mut Simulation> {
        self.simulations
            .values_mut()
            .find(|s| s.user_id == user_id && s.is_active())
    }

    /// Ids of every running simulation, across users.
    pub fn running_ids(&self) -> Vec<u64> {
        self.simulations
            .values()
            .filter(|s| s.status == SimulationStatus::Running)
            .map(|s| s.id)
            .collect()
    }

    /// The user's completed simulations, most recent first.
    pub fn completed_for(&self, user_id: u64) -> Vec<&Simulation> {
        let mut completed: Vec<&Simulation> = self
            .simulations
            .values()
            .filter(|s| s.user_id == user_id && s.status == SimulationStatus::Completed)
            .collect();
        completed.sort_by(|a, b| b.ended_at.cmp(&a.ended_at).then(b.id.cmp(&a.id)));
        completed
    }

    /// Records a generated trade against a simulation.
    pub fn add_trade(&mut self, simulation_id: u64, trade: GeneratedTrade, now: DateTime<Utc>) -> Result<&TradeRecord> {
        let simulation = self
            .simulations
            .get_mut(&simulation_id)
            .ok_or(Error::NotFound(simulation_id))?;
        simulation.total_trades += 1;

        let record = TradeRecord {
            id: self.next_trade_id,
            simulation_id,
            symbol: simulation.symbol.clone(),
            side: trade.side,
            price: trade.price,
            quantity: trade.quantity,
            amount: trade.amount,
            profit_loss: trade.profit_loss,
            profit_loss_percent: trade.profit_loss_percent,
            timestamp: now,
        };
        self.next_trade_id += 1;

        let trades = self.trades.entry(simulation_id).or_default();
        trades.push(record);
        Ok(&trades[trades.len() - 1])
    }

    /// Trades of a simulation in the order they were made.
    pub fn trades(&self, simulation_id: u64) -> &[TradeRecord] {
        self.trades.get(&simulation_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The user's most recent trades across all of their simulations.
    pub fn recent_trades(&self, user_id: u64, limit: usize) -> Vec<&TradeRecord> {
        let mut trades: Vec<&TradeRecord> = self
            .simulations
            .values()
            .filter(|s| s.user_id == user_id)
            .flat_map(|s| self.trades(s.id))
            .collect();
        trades.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        trades.truncate(limit);
        trades
    }

    /// Everything recorded for one of the user's simulations.
    ///
    /// Another user's simulation is reported as not found.
    pub fn results(&self, user_id: u64, simulation_id: u64) -> Result<SimulationResults<'_>> {
        let simulation = self
            .simulations
            .get(&simulation_id)
            .filter(|s| s.user_id == user_id)
            .ok_or(Error::NotFound(simulation_id))?;
        Ok(SimulationResults {
            simulation,
            trades: self.trades(simulation_id),
            performance_report: self.reports.get(&simulation_id),
        })
    }

    pub fn save_report(&mut self, simulation_id: u64, report: PerformanceSummary) {
        self.reports.insert(simulation_id, report);
    }

    pub fn report(&self, simulation_id: u64) -> Option<&PerformanceSummary> {
        self.reports.get(&simulation_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use chrono::{Duration, TimeZone};
    use core_types::Side;
    use rust_decimal_macros::dec;
    use strategies::StrategyConfiguration;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap()
    }

    fn request() -> SimulationRequest {
        SimulationRequest::build(SimulationConfig::default(), &StrategyConfiguration::new()).unwrap()
    }

    fn buy(price: Decimal) -> GeneratedTrade {
        GeneratedTrade {
            side: Side::Buy,
            price,
            quantity: dec!(1),
            amount: price,
            profit_loss: Decimal::ZERO,
            profit_loss_percent: 0.0,
        }
    }

    #[test]
    fn one_active_simulation_per_user() {
        let mut store = SimulationStore::new();
        let first = store.create(7, &request(), dec!(100), now()).unwrap().id;
        assert_eq!(first, 1);

        assert_eq!(
            store.create(7, &request(), dec!(100), now()).unwrap_err(),
            Error::AlreadyActive { user_id: 7 }
        );
        // Another user is unaffected.
        assert_eq!(store.create(8, &request(), dec!(100), now()).unwrap().id, 2);

        // Once finished, the user can start again.
        store.get_mut(first).unwrap().cancel(now()).unwrap();
        assert_eq!(store.create(7, &request(), dec!(100), now()).unwrap().id, 3);
    }

    #[test]
    fn paused_simulation_still_blocks_a_new_start() {
        let mut store = SimulationStore::new();
        store.create(7, &request(), dec!(100), now()).unwrap();
        store.active_for_mut(7).unwrap().pause().unwrap();

        assert!(store.create(7, &request(), dec!(100), now()).is_err());
        assert!(store.running_ids().is_empty());
    }

    #[test]
    fn trades_get_sequential_ids_and_bump_the_count() {
        let mut store = SimulationStore::new();
        let id = store.create(7, &request(), dec!(100), now()).unwrap().id;

        let first = store.add_trade(id, buy(dec!(100)), now()).unwrap().id;
        let second = store.add_trade(id, buy(dec!(101)), now()).unwrap().id;

        assert_eq!((first, second), (1, 2));
        assert_eq!(store.trades(id).len(), 2);
        assert_eq!(store.trades(id)[1].symbol.0, "RELIANCE");
        assert_eq!(store.get(id).unwrap().total_trades, 2);
        assert_eq!(store.add_trade(99, buy(dec!(1)), now()).unwrap_err(), Error::NotFound(99));
        assert!(store.trades(99).is_empty());
    }

    #[test]
    fn history_lists_completed_simulations_newest_first() {
        let mut store = SimulationStore::new();
        let summary = PerformanceSummary::untraded(dec!(10000));

        for hours in [1, 3] {
            let id = store.create(7, &request(), dec!(100), now()).unwrap().id;
            store
                .get_mut(id)
                .unwrap()
                .complete(now() + Duration::hours(hours), &summary)
                .unwrap();
        }
        let cancelled = store.create(7, &request(), dec!(100), now()).unwrap().id;
        store.get_mut(cancelled).unwrap().cancel(now()).unwrap();

        let ids: Vec<u64> = store.completed_for(7).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(store.completed_for(8).is_empty());
    }

    #[test]
    fn reports_are_kept_per_simulation() {
        let mut store = SimulationStore::new();
        store.save_report(4, PerformanceSummary::untraded(dec!(500)));
        assert_eq!(store.report(4).unwrap().final_value, dec!(500));
        assert!(store.report(5).is_none());
    }

    #[test]
    fn recent_trades_span_the_users_simulations_newest_first() {
        let mut store = SimulationStore::new();
        let first = store.create(7, &request(), dec!(100), now()).unwrap().id;
        store.add_trade(first, buy(dec!(100)), now()).unwrap();
        store.add_trade(first, buy(dec!(101)), now() + Duration::minutes(5)).unwrap();
        store.get_mut(first).unwrap().cancel(now()).unwrap();

        let second = store.create(7, &request(), dec!(100), now()).unwrap().id;
        store.add_trade(second, buy(dec!(102)), now() + Duration::minutes(10)).unwrap();
        let other = store.create(8, &request(), dec!(100), now()).unwrap().id;
        store.add_trade(other, buy(dec!(999)), now() + Duration::hours(1)).unwrap();

        let prices: Vec<Decimal> = store.recent_trades(7, 10).iter().map(|t| t.price).collect();
        assert_eq!(prices, vec![dec!(102), dec!(101), dec!(100)]);
        assert_eq!(store.recent_trades(7, 2).len(), 2);
        assert!(store.recent_trades(9, 5).is_empty());
    }

    #[test]
    fn results_are_scoped_to_the_owner() {
        let mut store = SimulationStore::new();
        let id = store.create(7, &request(), dec!(100), now()).unwrap().id;
        store.add_trade(id, buy(dec!(100)), now()).unwrap();

        let results = store.results(7, id).unwrap();
        assert_eq!(results.simulation.id, id);
        assert_eq!(results.trades.len(), 1);
        assert!(results.performance_report.is_none());

        store.save_report(id, PerformanceSummary::untraded(dec!(10000)));
        assert!(store.results(7, id).unwrap().performance_report.is_some());

        assert_eq!(store.results(8, id).unwrap_err(), Error::NotFound(id));
        assert_eq!(store.results(7, 42).unwrap_err(), Error::NotFound(42));
    }
}
