// In crates/engine/src/config.rs

use chrono::Duration;
use core_types::{AssetType, Symbol};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use strategies::{StrategyConfiguration, StrategyParams};

use crate::{Error, Result};

/// What to simulate: the asset, for how long, and with which strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    pub asset_type: AssetType,
    pub asset_name: String,
    /// Period label such as "24h", "48h" or "1w".
    pub time_period: String,
    pub strategy: String,
    /// Starting capital for the simulation.
    pub trade_amount: Decimal,
    /// Grow each order by the profit realized so far.
    pub reinvest_profits: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            asset_type: AssetType::Stocks,
            asset_name: "reliance".to_string(),
            time_period: "24h".to_string(),
            strategy: "macd".to_string(),
            trade_amount: dec!(10000),
            reinvest_profits: false,
        }
    }
}

impl SimulationConfig {
    /// Checks every field and reports the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.asset_name.trim().is_empty() {
            return Err(Error::InvalidConfig("asset name is required".to_string()));
        }
        if self.strategy.trim().is_empty() {
            return Err(Error::InvalidConfig("strategy is required".to_string()));
        }
        if self.trade_amount < dec!(1) {
            return Err(Error::InvalidConfig(format!(
                "trade amount must be at least 1 (got {})",
                self.trade_amount
            )));
        }
        parse_duration(&self.time_period)?;
        Ok(())
    }

    /// The quote symbol for the configured asset. Crypto assets are quoted
    /// against the rupee.
    pub fn symbol(&self) -> Symbol {
        let base = Symbol::normalized(&self.asset_name);
        match self.asset_type {
            AssetType::Crypto => Symbol(format!("{}-INR", base.0)),
            AssetType::Stocks | AssetType::Forex => base,
        }
    }
}

/// Longest simulation period accepted, in days.
pub const MAX_PERIOD_DAYS: i64 = 366;

/// Parses a period label into a duration.
///
/// Accepts a positive whole number followed by `m` (minutes), `h` (hours),
/// `d` (days) or `w` (weeks), up to [`MAX_PERIOD_DAYS`].
pub fn parse_duration(label: &str) -> Result<Duration> {
    let invalid = || Error::InvalidDuration(label.to_string());
    let trimmed = label.trim().to_ascii_lowercase();
    let unit = trimmed.chars().last().ok_or_else(invalid)?;

    let count: i64 = trimmed[..trimmed.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| invalid())?;
    if count <= 0 {
        return Err(invalid());
    }

    let duration = match unit {
        'm' => Duration::try_minutes(count),
        'h' => Duration::try_hours(count),
        'd' => Duration::try_days(count),
        'w' => Duration::try_weeks(count),
        _ => None,
    };
    duration
        .filter(|d| *d <= Duration::days(MAX_PERIOD_DAYS))
        .ok_or_else(invalid)
}

/// A validated request to start a simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequest {
    pub config: SimulationConfig,
    pub params: StrategyParams,
    pub symbol: Symbol,
    pub duration: Duration,
}

impl SimulationRequest {
    /// Validates the configuration and takes a snapshot of the strategy
    /// parameters. Fails if any parameter is in violation.
    pub fn build(config: SimulationConfig, strategy: &StrategyConfiguration) -> Result<Self> {
        config.validate()?;
        let params = strategy.validated()?;
        let duration = parse_duration(&config.time_period)?;

        Ok(Self {
            symbol: config.symbol(),
            config,
            params,
            duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strategies::ParamField;

    #[test]
    fn presets_parse() {
        assert_eq!(parse_duration("24h").unwrap(), Duration::hours(24));
        assert_eq!(parse_duration("48H").unwrap(), Duration::hours(48));
        assert_eq!(parse_duration(" 1w ").unwrap(), Duration::weeks(1));
        assert_eq!(parse_duration("90m").unwrap(), Duration::minutes(90));
        assert_eq!(parse_duration("3d").unwrap(), Duration::days(3));
    }

    #[test]
    fn bad_periods_are_rejected() {
        for label in ["", "h", "custom", "0h", "-5h", "12y", "1.5h", "53w", "100000000w"] {
            assert_eq!(
                parse_duration(label),
                Err(Error::InvalidDuration(label.to_string())),
                "accepted {label:?}"
            );
        }
    }

    #[test]
    fn longest_period_is_a_year() {
        assert_eq!(parse_duration("366d").unwrap(), Duration::days(366));
        assert!(parse_duration("367d").is_err());
        assert!(parse_duration("52w").is_ok());
    }

    #[test]
    fn overlong_period_is_refused_before_a_simulation_exists() {
        let config = SimulationConfig { time_period: "100000000w".to_string(), ..Default::default() };
        assert!(matches!(config.validate(), Err(Error::InvalidDuration(_))));
        assert!(matches!(
            SimulationRequest::build(config, &StrategyConfiguration::new()),
            Err(Error::InvalidDuration(_))
        ));
    }

    #[test]
    fn default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn config_rules() {
        let blank_asset = SimulationConfig { asset_name: "  ".to_string(), ..Default::default() };
        assert!(matches!(blank_asset.validate(), Err(Error::InvalidConfig(_))));

        let tiny = SimulationConfig { trade_amount: dec!(0.5), ..Default::default() };
        assert!(matches!(tiny.validate(), Err(Error::InvalidConfig(_))));

        let no_strategy = SimulationConfig { strategy: String::new(), ..Default::default() };
        assert!(matches!(no_strategy.validate(), Err(Error::InvalidConfig(_))));

        let bad_period = SimulationConfig { time_period: "custom".to_string(), ..Default::default() };
        assert!(matches!(bad_period.validate(), Err(Error::InvalidDuration(_))));
    }

    #[test]
    fn crypto_symbols_are_quoted_in_rupees() {
        let config = SimulationConfig {
            asset_type: AssetType::Crypto,
            asset_name: "btc".to_string(),
            ..Default::default()
        };
        assert_eq!(config.symbol(), Symbol("BTC-INR".to_string()));
        assert_eq!(SimulationConfig::default().symbol(), Symbol("RELIANCE".to_string()));
    }

    #[test]
    fn request_snapshots_valid_params() {
        let mut strategy = StrategyConfiguration::new();
        strategy.update(ParamField::FastPeriod, 5.0).unwrap();

        let request = SimulationRequest::build(SimulationConfig::default(), &strategy).unwrap();
        assert_eq!(request.params.fast_period, 5.0);
        assert_eq!(request.duration, Duration::hours(24));
        assert_eq!(request.symbol, Symbol("RELIANCE".to_string()));
    }

    #[test]
    fn request_refuses_params_in_violation() {
        let mut strategy = StrategyConfiguration::new();
        let _ = strategy.update(ParamField::SlowPeriod, 5.0);

        let err = SimulationRequest::build(SimulationConfig::default(), &strategy).unwrap_err();
        assert!(matches!(err, Error::Strategy(strategies::Error::InvalidParams(_))));
    }
}
