// In crates/strategies/src/factory.rs

use crate::macd::MacdStrategy;
use crate::ma_crossover::MACrossover;
use crate::mean_reversion::MeanReversion;
use crate::momentum::Momentum;
use crate::rsi::RsiStrategy;
use crate::types::StrategyParams;
use crate::{Alternating, Error, Result, Strategy, catalog};

/// Builds the decision rule for a strategy name from the simulation's
/// parameters.
///
/// Names are resolved through the catalog (slug or display name). An
/// unknown name falls back to alternating buys and sells, matching how
/// unrecognised strategies were traded before; use [`create_strict`] to
/// reject them instead.
pub fn create_strategy(
    name: &str,
    params: &StrategyParams,
    take_profit_percent: f64,
) -> Result<Box<dyn Strategy + Send>> {
    match create_strict(name, params, take_profit_percent) {
        Err(Error::UnknownStrategy(unknown)) => {
            tracing::warn!(strategy = %unknown, "Unknown strategy, alternating buys and sells.");
            Ok(Box::new(Alternating))
        }
        other => other,
    }
}

/// Like [`create_strategy`] but fails with [`Error::UnknownStrategy`].
pub fn create_strict(
    name: &str,
    params: &StrategyParams,
    take_profit_percent: f64,
) -> Result<Box<dyn Strategy + Send>> {
    let descriptor = catalog::find(name).ok_or_else(|| Error::UnknownStrategy(name.to_string()))?;

    let strategy_instance: Box<dyn Strategy + Send> = match descriptor.slug {
        "mean_reversion" => Box::new(MeanReversion::default()),
        "momentum" => Box::new(Momentum),
        "rsi" => Box::new(RsiStrategy::new(params.stop_loss, take_profit_percent)),
        "ma_crossover" => {
            let (fast, slow, _) = params
                .periods()
                .ok_or_else(|| Error::Indicator("Moving average periods must be whole numbers within the indicator window limit".to_string()))?;
            Box::new(MACrossover::new(fast, slow)?)
        }
        "macd" => Box::new(MacdStrategy::new(params)?),
        unknown => return Err(Error::UnknownStrategy(unknown.to_string())),
    };

    Ok(strategy_instance)
}
