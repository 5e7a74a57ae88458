// In crates/engine/src/runner.rs

use std::collections::HashMap;

use analytics::{AnalyticsEngine, PerformanceSummary};
use chrono::{DateTime, Utc};
use core_types::{SimulationStatus, TradeRecord};
use rust_decimal::Decimal;
use strategies::generator::{DEFAULT_ORDER_NOTIONAL, Holding};
use strategies::{Strategy, TradeGenerator, factory};

use crate::config::SimulationRequest;
use crate::feed::QuoteSource;
use crate::simulation::Simulation;
use crate::store::SimulationStore;
use crate::{Error, Result};

/// Knobs for the mock trading loop.
#[derive(Debug, Clone)]
pub struct RunnerSettings {
    /// Notional of every order before any reinvested profit.
    pub order_notional: Decimal,
    /// Take-profit distance in percent, used by the RSI rule.
    pub take_profit_percent: f64,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            order_notional: DEFAULT_ORDER_NOTIONAL,
            take_profit_percent: 5.0,
        }
    }
}

/// Drives simulations: start, one trade per tick, pause, stop.
///
/// Owns the store, the quote source and one strategy instance per active
/// simulation. Everything runs on the caller's thread.
pub struct SimulationRunner<Q: QuoteSource> {
    store: SimulationStore,
    feed: Q,
    settings: RunnerSettings,
    strategies: HashMap<u64, Box<dyn Strategy + Send>>,
    analytics: AnalyticsEngine,
}

impl<Q: QuoteSource> SimulationRunner<Q> {
    pub fn new(feed: Q, settings: RunnerSettings) -> Self {
        Self {
            store: SimulationStore::new(),
            feed,
            settings,
            strategies: HashMap::new(),
            analytics: AnalyticsEngine::new(),
        }
    }

    pub fn store(&self) -> &SimulationStore {
        &self.store
    }

    /// Starts a simulation for `user_id` at the current quote.
    pub fn start(&mut self, user_id: u64, request: &SimulationRequest, now: DateTime<Utc>) -> Result<&Simulation> {
        if self.store.active_for(user_id).is_some() {
            return Err(Error::AlreadyActive { user_id });
        }

        let strategy = factory::create_strategy(
            &request.config.strategy,
            &request.params,
            self.settings.take_profit_percent,
        )?;
        let quote = self.feed.next_quote(&request.symbol, now);

        let simulation = self.store.create(user_id, request, quote.price, now)?;
        tracing::info!(
            simulation_id = simulation.id,
            strategy = strategy.name(),
            start_price = %quote.price,
            "Simulation started."
        );
        self.strategies.insert(simulation.id, strategy);
        Ok(simulation)
    }

    /// Pauses the user's running simulation or resumes a paused one.
    pub fn toggle_pause(&mut self, user_id: u64) -> Result<SimulationStatus> {
        self.store
            .active_for_mut(user_id)
            .ok_or(Error::NoActiveSimulation { user_id })?
            .toggle_pause()
    }

    /// Advances the user's simulation by one quote.
    ///
    /// Returns the trade made, or `None` when the simulation is paused or
    /// has just been completed because its period ran out.
    pub fn tick(&mut self, user_id: u64, now: DateTime<Utc>) -> Result<Option<TradeRecord>> {
        let simulation = self
            .store
            .active_for(user_id)
            .ok_or(Error::NoActiveSimulation { user_id })?;
        let simulation_id = simulation.id;

        if simulation.status == SimulationStatus::Paused {
            return Ok(None);
        }
        if simulation.is_due(now) {
            tracing::info!(simulation_id, "Simulation period has ended.");
            self.finish(simulation_id, now)?;
            return Ok(None);
        }

        let symbol = simulation.symbol.clone();
        let starting_capital = simulation.starting_capital;
        let reinvest_profits = simulation.reinvest_profits;
        let quote = self.feed.next_quote(&symbol, now);

        self.ensure_strategy(simulation_id)?;
        let previous = self.store.trades(simulation_id);
        let realized: Decimal = previous.iter().map(|t| t.profit_loss).sum();
        let notional = if reinvest_profits && realized > Decimal::ZERO {
            self.settings.order_notional + realized
        } else {
            self.settings.order_notional
        };

        let strategy = self
            .strategies
            .get_mut(&simulation_id)
            .ok_or(Error::NotFound(simulation_id))?;
        let generated = TradeGenerator::new(notional).generate(strategy.as_mut(), quote.price, previous, None)?;
        tracing::debug!(
            simulation_id,
            side = %generated.side,
            price = %generated.price,
            quantity = %generated.quantity,
            "Trade generated."
        );

        let trade = self.store.add_trade(simulation_id, generated, now)?.clone();

        // Mark the position to the latest quote.
        let trades = self.store.trades(simulation_id);
        let holding = Holding::from_trades(trades);
        let realized: Decimal = trades.iter().map(|t| t.profit_loss).sum();
        let unrealized = holding.quantity * quote.price - holding.cost_basis;

        let simulation = self
            .store
            .get_mut(simulation_id)
            .ok_or(Error::NotFound(simulation_id))?;
        simulation.current_price = quote.price;
        simulation.current_value = (starting_capital + realized + unrealized).round_dp(2);
        simulation.progress = simulation.progress_at(now);

        Ok(Some(trade))
    }

    /// Runs [`tick`](Self::tick) for every running simulation.
    pub fn tick_all(&mut self, now: DateTime<Utc>) -> Vec<Result<Option<TradeRecord>>> {
        let users: Vec<u64> = self
            .store
            .running_ids()
            .into_iter()
            .filter_map(|id| self.store.get(id).map(|s| s.user_id))
            .collect();
        users.into_iter().map(|user_id| self.tick(user_id, now)).collect()
    }

    /// Stops the user's simulation, computes its performance and saves the report.
    pub fn stop(&mut self, user_id: u64, now: DateTime<Utc>) -> Result<PerformanceSummary> {
        let simulation_id = self
            .store
            .active_for(user_id)
            .ok_or(Error::NoActiveSimulation { user_id })?
            .id;
        self.finish(simulation_id, now)
    }

    /// Cancels the user's simulation without producing a report.
    pub fn cancel(&mut self, user_id: u64, now: DateTime<Utc>) -> Result<()> {
        let simulation = self
            .store
            .active_for_mut(user_id)
            .ok_or(Error::NoActiveSimulation { user_id })?;
        let simulation_id = simulation.id;
        simulation.cancel(now)?;
        self.strategies.remove(&simulation_id);
        Ok(())
    }

    fn finish(&mut self, simulation_id: u64, now: DateTime<Utc>) -> Result<PerformanceSummary> {
        let simulation = self.store.get(simulation_id).ok_or(Error::NotFound(simulation_id))?;
        let summary = self
            .analytics
            .calculate(simulation.starting_capital, self.store.trades(simulation_id));

        self.store
            .get_mut(simulation_id)
            .ok_or(Error::NotFound(simulation_id))?
            .complete(now, &summary)?;
        self.store.save_report(simulation_id, summary.clone());
        self.strategies.remove(&simulation_id);
        Ok(summary)
    }

    /// Rebuilds the strategy of a simulation that has none loaded.
    fn ensure_strategy(&mut self, simulation_id: u64) -> Result<()> {
        if self.strategies.contains_key(&simulation_id) {
            return Ok(());
        }
        let simulation = self.store.get(simulation_id).ok_or(Error::NotFound(simulation_id))?;
        let strategy = factory::create_strategy(
            &simulation.strategy,
            &simulation.strategy_params,
            self.settings.take_profit_percent,
        )?;
        self.strategies.insert(simulation_id, strategy);
        Ok(())
    }
}
