// In crates/strategies/src/configuration.rs

use std::collections::BTreeMap;

use crate::types::{ParamField, StrategyParams};
use crate::{Error, Result};

/// A live, editable set of strategy parameters plus the validation error
/// currently recorded against each field.
///
/// Edits go through [`StrategyConfiguration::update`] one field at a time.
/// A value that breaks its field's rule is still stored; the error map is
/// the source of truth for whether the stored set is usable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyConfiguration {
    params: StrategyParams,
    errors: BTreeMap<ParamField, String>,
}

impl StrategyConfiguration {
    /// Creates a configuration holding the default parameters and no errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// The live parameter set, including any values currently in violation.
    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    /// Validates and applies a single-field edit.
    ///
    /// * A non-finite `proposed` value returns [`Error::InvalidNumber`] and
    ///   changes nothing.
    /// * A value that breaks the field's rule is stored, its message is
    ///   recorded and [`Error::ConstraintViolation`] is returned.
    /// * Otherwise the value is stored and the field's error is cleared.
    ///
    /// The slow period is checked against the fast period held right now.
    pub fn update(&mut self, field: ParamField, proposed: f64) -> Result<()> {
        if !proposed.is_finite() {
            tracing::debug!(%field, value = proposed, "Ignoring non-numeric parameter edit.");
            return Err(Error::InvalidNumber { field });
        }

        let outcome = field.check(proposed, self.params.fast_period);
        self.params.set(field, proposed);

        match outcome {
            Ok(()) => {
                self.errors.remove(&field);
                tracing::debug!(%field, value = proposed, "Parameter edit accepted.");
                Ok(())
            }
            Err(message) => {
                tracing::warn!(%field, value = proposed, %message, "Parameter edit violates its rule.");
                self.errors.insert(field, message.clone());
                Err(Error::ConstraintViolation { field, message })
            }
        }
    }

    /// Applies an edit the way a numeric form input delivers it: a field name
    /// and the raw text of the box.
    ///
    /// Text that does not parse as a number is treated like a non-finite
    /// value and discarded. The whole trimmed text must be a number: `"7abc"`
    /// is rejected rather than read as 7, which is stricter than a browser's
    /// `parseFloat`.
    pub fn update_raw(&mut self, field_name: &str, text: &str) -> Result<()> {
        let field: ParamField = field_name.parse()?;
        let proposed = text
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::InvalidNumber { field })?;
        self.update(field, proposed)
    }

    /// Restores the default parameters and clears every recorded error.
    pub fn reset(&mut self) {
        self.params = StrategyParams::default();
        self.errors.clear();
        tracing::debug!("Strategy parameters reset to defaults.");
    }

    /// A snapshot of the fields currently in violation and their messages.
    pub fn current_errors(&self) -> BTreeMap<ParamField, String> {
        self.errors.clone()
    }

    pub fn error_for(&self, field: ParamField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the parameters if they can be used to run a simulation.
    ///
    /// Recorded errors are reported first. Because only the edited field is
    /// checked on each update, the whole set is re-checked as well: raising
    /// the fast period above an earlier slow period records nothing but
    /// still makes the set unusable.
    pub fn validated(&self) -> Result<StrategyParams> {
        if !self.errors.is_empty() {
            return Err(Error::InvalidParams(self.errors.clone()));
        }
        self.params.validate().map_err(Error::InvalidParams)?;
        Ok(self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_defaults_without_errors() {
        let config = StrategyConfiguration::new();
        assert_eq!(*config.params(), StrategyParams::default());
        assert!(config.current_errors().is_empty());
        assert!(config.is_valid());
    }

    #[test]
    fn valid_edit_is_stored_and_clears_previous_error() {
        let mut config = StrategyConfiguration::new();
        assert!(config.update(ParamField::StopLoss, -3.0).is_err());
        assert!(config.error_for(ParamField::StopLoss).is_some());

        config.update(ParamField::StopLoss, 4.5).unwrap();
        assert_eq!(config.params().stop_loss, 4.5);
        assert_eq!(config.error_for(ParamField::StopLoss), None);
    }

    #[test]
    fn slow_period_below_fast_is_recorded_but_stored() {
        let mut config = StrategyConfiguration::new();
        let err = config.update(ParamField::SlowPeriod, 5.0).unwrap_err();

        assert!(matches!(
            err,
            Error::ConstraintViolation { field: ParamField::SlowPeriod, .. }
        ));
        assert_eq!(config.params().slow_period, 5.0);
        assert_eq!(
            config.error_for(ParamField::SlowPeriod),
            Some("Slow period must be greater than fast period (12)")
        );
    }

    #[test]
    fn slow_period_uses_live_fast_period() {
        let mut config = StrategyConfiguration::new();
        config.update(ParamField::FastPeriod, 3.0).unwrap();
        config.update(ParamField::SlowPeriod, 5.0).unwrap();
        assert!(config.is_valid());
    }

    #[test]
    fn non_finite_edit_changes_nothing() {
        let mut config = StrategyConfiguration::new();
        config.update(ParamField::BuyThreshold, -1.0).unwrap_err();
        let before = config.clone();

        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = config.update(ParamField::BuyThreshold, value).unwrap_err();
            assert_eq!(err, Error::InvalidNumber { field: ParamField::BuyThreshold });
        }
        assert_eq!(config, before);
    }

    #[test]
    fn raw_text_edits_follow_the_same_rules() {
        let mut config = StrategyConfiguration::new();
        config.update_raw("signalPeriod", " 7 ").unwrap();
        assert_eq!(config.params().signal_period, 7.0);

        assert_eq!(
            config.update_raw("signal_period", "abc"),
            Err(Error::InvalidNumber { field: ParamField::SignalPeriod })
        );
        assert_eq!(
            config.update_raw("signal_period", "NaN"),
            Err(Error::InvalidNumber { field: ParamField::SignalPeriod })
        );
        // No numeric-prefix parsing.
        assert_eq!(
            config.update_raw("signal_period", "9abc"),
            Err(Error::InvalidNumber { field: ParamField::SignalPeriod })
        );
        assert_eq!(config.params().signal_period, 7.0);

        assert!(matches!(
            config.update_raw("leverage", "3"),
            Err(Error::UnknownField(_))
        ));
    }

    #[test]
    fn reset_restores_defaults_and_clears_errors() {
        let mut config = StrategyConfiguration::new();
        config.update(ParamField::SlowPeriod, 5.0).unwrap_err();
        config.update(ParamField::SellThreshold, 1.0).unwrap_err();
        config.update(ParamField::FastPeriod, 4.0).unwrap();

        config.reset();
        assert_eq!(*config.params(), StrategyParams::default());
        assert!(config.current_errors().is_empty());
    }

    #[test]
    fn validated_rejects_recorded_errors() {
        let mut config = StrategyConfiguration::new();
        config.update(ParamField::SellThreshold, 0.2).unwrap_err();
        match config.validated() {
            Err(Error::InvalidParams(errors)) => {
                assert_eq!(errors.keys().copied().collect::<Vec<_>>(), vec![ParamField::SellThreshold]);
            }
            other => panic!("expected InvalidParams, got {other:?}"),
        }
    }

    #[test]
    fn validated_catches_stale_slow_period() {
        let mut config = StrategyConfiguration::new();
        config.update(ParamField::FastPeriod, 40.0).unwrap();
        assert!(config.is_valid());
        assert!(matches!(config.validated(), Err(Error::InvalidParams(_))));
    }

    #[test]
    fn validated_returns_a_copy_of_good_params() {
        let mut config = StrategyConfiguration::new();
        config.update(ParamField::FastPeriod, 8.0).unwrap();
        let params = config.validated().unwrap();
        assert_eq!(params.fast_period, 8.0);
    }
}
