// In crates/app-config/src/types.rs

use std::collections::BTreeMap;

use core_types::AssetType;
use engine::{RunnerSettings, SimulationConfig};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use strategies::ParamField;
use strategies::generator::DEFAULT_ORDER_NOTIONAL;

use crate::Result;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Defaults for new simulations.
    #[serde(default)]
    pub simulation: SimulationSettings,
    /// Initial strategy parameter edits.
    #[serde(default)]
    pub strategy: StrategySettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationSettings {
    pub asset_type: AssetType,
    pub asset_name: String,
    pub time_period: String,
    pub strategy: String,
    pub trade_amount: Decimal,
    pub reinvest_profits: bool,
    /// Notional of each mock order.
    pub order_notional: Decimal,
    pub take_profit_percent: f64,
    /// User the CLI runs simulations as.
    pub user_id: u64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        let config = SimulationConfig::default();
        let runner = RunnerSettings::default();
        Self {
            asset_type: config.asset_type,
            asset_name: config.asset_name,
            time_period: config.time_period,
            strategy: config.strategy,
            trade_amount: config.trade_amount,
            reinvest_profits: config.reinvest_profits,
            order_notional: runner.order_notional,
            take_profit_percent: runner.take_profit_percent,
            user_id: 1,
        }
    }
}

impl SimulationSettings {
    pub fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            asset_type: self.asset_type,
            asset_name: self.asset_name.clone(),
            time_period: self.time_period.clone(),
            strategy: self.strategy.clone(),
            trade_amount: self.trade_amount,
            reinvest_profits: self.reinvest_profits,
        }
    }

    /// Runner knobs, falling back to the default notional when the configured
    /// one is not positive.
    pub fn runner_settings(&self) -> RunnerSettings {
        let order_notional = if self.order_notional > dec!(0) {
            self.order_notional
        } else {
            DEFAULT_ORDER_NOTIONAL
        };
        RunnerSettings {
            order_notional,
            take_profit_percent: self.take_profit_percent,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct StrategySettings {
    /// Edits applied on top of the default parameters, keyed by field name
    /// in any accepted spelling.
    #[serde(default)]
    pub param_overrides: BTreeMap<String, f64>,
}

impl StrategySettings {
    /// The overrides keyed by field, in field order.
    pub fn param_edits(&self) -> Result<BTreeMap<ParamField, f64>> {
        parse_edits(&self.param_overrides)
    }
}

/// Resolves field names. Fails on the first name that is not a parameter.
pub(crate) fn parse_edits(raw: &BTreeMap<String, f64>) -> Result<BTreeMap<ParamField, f64>> {
    raw.iter()
        .map(|(name, value)| -> Result<(ParamField, f64)> { Ok((name.parse()?, *value)) })
        .collect()
}
