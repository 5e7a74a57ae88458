// In crates/app-config/src/lib.rs

use std::collections::BTreeMap;
use std::path::Path;

use config::{Config, Environment, File};
use strategies::ParamField;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AppSettings, Settings, SimulationSettings, StrategySettings};

/// Loads the application settings from the `config/` directory.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings() -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());
    load_settings_from(Path::new("config"), &environment)
}

/// Same layering as [`load_settings`], rooted at `dir`.
pub fn load_settings_from(dir: &Path, environment: &str) -> Result<Settings> {
    let base = dir.join("base");
    let overlay = dir.join(environment);

    let settings = Config::builder()
        .add_source(File::with_name(&base.to_string_lossy()))
        .add_source(File::with_name(&overlay.to_string_lossy()).required(false))
        // e.g. `APP__SIMULATION__TRADE_AMOUNT=5000`.
        .add_source(Environment::with_prefix("APP").separator("__").try_parsing(true))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Reads a TOML file of `field = value` parameter edits.
///
/// Keys may use any spelling the field names accept (`fast_period`,
/// `fastPeriod`, `fast-period`). The edits come back in field order.
pub fn load_param_edits(path: impl AsRef<Path>) -> Result<BTreeMap<ParamField, f64>> {
    let content = std::fs::read_to_string(path)?;
    let raw: BTreeMap<String, f64> = toml::from_str(&content)?;
    types::parse_edits(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::AssetType;
    use rust_decimal_macros::dec;
    use std::fs;

    const BASE: &str = r#"
[app]
environment = "test"
log_level = "info"

[simulation]
asset_name = "tcs"
time_period = "48h"
strategy = "momentum"
trade_amount = 25000

[strategy.param_overrides]
fast_period = 8
"#;

    #[test]
    fn base_file_fills_settings_and_defaults_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), BASE).unwrap();

        let settings = load_settings_from(dir.path(), "missing").unwrap();
        assert_eq!(settings.app.log_level, "info");
        assert_eq!(settings.simulation.asset_name, "tcs");
        assert_eq!(settings.simulation.asset_type, AssetType::Stocks);
        assert_eq!(settings.simulation.trade_amount, dec!(25000));
        assert_eq!(settings.simulation.order_notional, dec!(7500));

        let config = settings.simulation.simulation_config();
        assert_eq!(config.time_period, "48h");
        assert!(config.validate().is_ok());

        let edits = settings.strategy.param_edits().unwrap();
        assert_eq!(edits.get(&ParamField::FastPeriod), Some(&8.0));
    }

    #[test]
    fn environment_file_overrides_base() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), BASE).unwrap();
        fs::write(
            dir.path().join("staging.toml"),
            "[simulation]\nasset_type = \"crypto\"\nasset_name = \"btc\"\nreinvest_profits = true\n",
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), "staging").unwrap();
        assert_eq!(settings.simulation.asset_type, AssetType::Crypto);
        assert!(settings.simulation.reinvest_profits);
        // Untouched keys keep the base value.
        assert_eq!(settings.simulation.strategy, "momentum");
    }

    #[test]
    fn missing_base_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_settings_from(dir.path(), "development"),
            Err(Error::LoadError(_))
        ));
    }

    #[test]
    fn non_positive_notional_falls_back_to_default() {
        let settings = SimulationSettings { order_notional: dec!(0), ..Default::default() };
        assert_eq!(settings.runner_settings().order_notional, dec!(7500));
    }

    #[test]
    fn param_edit_files_accept_any_spelling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edits.toml");
        fs::write(&path, "slowPeriod = 30\nstop-loss = 1.5\nbuy_threshold = 0.75\n").unwrap();

        let edits = load_param_edits(&path).unwrap();
        let fields: Vec<ParamField> = edits.keys().copied().collect();
        assert_eq!(
            fields,
            vec![ParamField::SlowPeriod, ParamField::BuyThreshold, ParamField::StopLoss]
        );
        assert_eq!(edits[&ParamField::StopLoss], 1.5);
    }

    #[test]
    fn unknown_fields_and_bad_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let unknown = dir.path().join("unknown.toml");
        fs::write(&unknown, "lookback = 3\n").unwrap();
        assert!(matches!(
            load_param_edits(&unknown),
            Err(Error::Strategy(strategies::Error::UnknownField(_)))
        ));

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "fast_period = \"twelve\"\n").unwrap();
        assert!(matches!(load_param_edits(&broken), Err(Error::TomlError(_))));

        assert!(matches!(
            load_param_edits(dir.path().join("absent.toml")),
            Err(Error::IoError(_))
        ));
    }
}
