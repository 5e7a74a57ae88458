// In crates/strategies/src/types.rs

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

pub const DEFAULT_FAST_PERIOD: f64 = 12.0;
pub const DEFAULT_SLOW_PERIOD: f64 = 26.0;
pub const DEFAULT_SIGNAL_PERIOD: f64 = 9.0;
pub const DEFAULT_BUY_THRESHOLD: f64 = 0.5;
pub const DEFAULT_SELL_THRESHOLD: f64 = -0.5;
pub const DEFAULT_STOP_LOSS: f64 = 2.0;

/// Largest lookback window handed to an indicator.
pub const MAX_INDICATOR_WINDOW: u32 = u32::MAX;

/// The six numeric parameters governing a strategy's lookback windows and
/// signal thresholds.
///
/// Every field is kept as an `f64` so that a value which breaks its rule can
/// still be held exactly as it was entered. Use [`StrategyParams::validate`]
/// or [`StrategyParams::periods`] before handing the set to anything that
/// needs whole-number windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyParams {
    pub fast_period: f64,
    pub slow_period: f64,
    pub signal_period: f64,
    pub buy_threshold: f64,
    pub sell_threshold: f64,
    /// Stop-loss distance in percent (2.0 means 2%).
    pub stop_loss: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            fast_period: DEFAULT_FAST_PERIOD,
            slow_period: DEFAULT_SLOW_PERIOD,
            signal_period: DEFAULT_SIGNAL_PERIOD,
            buy_threshold: DEFAULT_BUY_THRESHOLD,
            sell_threshold: DEFAULT_SELL_THRESHOLD,
            stop_loss: DEFAULT_STOP_LOSS,
        }
    }
}

impl StrategyParams {
    pub fn get(&self, field: ParamField) -> f64 {
        match field {
            ParamField::FastPeriod => self.fast_period,
            ParamField::SlowPeriod => self.slow_period,
            ParamField::SignalPeriod => self.signal_period,
            ParamField::BuyThreshold => self.buy_threshold,
            ParamField::SellThreshold => self.sell_threshold,
            ParamField::StopLoss => self.stop_loss,
        }
    }

    pub fn set(&mut self, field: ParamField, value: f64) {
        match field {
            ParamField::FastPeriod => self.fast_period = value,
            ParamField::SlowPeriod => self.slow_period = value,
            ParamField::SignalPeriod => self.signal_period = value,
            ParamField::BuyThreshold => self.buy_threshold = value,
            ParamField::SellThreshold => self.sell_threshold = value,
            ParamField::StopLoss => self.stop_loss = value,
        }
    }

    /// Checks the whole set at once and returns every violation.
    ///
    /// The slow period is checked against this set's own fast period.
    pub fn validate(&self) -> Result<(), BTreeMap<ParamField, String>> {
        let violations: BTreeMap<ParamField, String> = ParamField::ALL
            .iter()
            .filter_map(|&field| {
                field
                    .check(self.get(field), self.fast_period)
                    .err()
                    .map(|message| (field, message))
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// The `(fast, slow, signal)` windows, if all three are usable whole numbers
    /// no larger than [`MAX_INDICATOR_WINDOW`].
    pub fn periods(&self) -> Option<(usize, usize, usize)> {
        let window = |value: f64| {
            (value.is_finite() && (1.0..=MAX_INDICATOR_WINDOW as f64).contains(&value) && value.fract() == 0.0)
                .then_some(value as usize)
        };
        Some((
            window(self.fast_period)?,
            window(self.slow_period)?,
            window(self.signal_period)?,
        ))
    }
}

/// Identifies one field of [`StrategyParams`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamField {
    FastPeriod,
    SlowPeriod,
    SignalPeriod,
    BuyThreshold,
    SellThreshold,
    StopLoss,
}

impl ParamField {
    pub const ALL: [ParamField; 6] = [
        ParamField::FastPeriod,
        ParamField::SlowPeriod,
        ParamField::SignalPeriod,
        ParamField::BuyThreshold,
        ParamField::SellThreshold,
        ParamField::StopLoss,
    ];

    /// The camelCase key used in forms and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            ParamField::FastPeriod => "fastPeriod",
            ParamField::SlowPeriod => "slowPeriod",
            ParamField::SignalPeriod => "signalPeriod",
            ParamField::BuyThreshold => "buyThreshold",
            ParamField::SellThreshold => "sellThreshold",
            ParamField::StopLoss => "stopLoss",
        }
    }

    /// Human-readable label used at the start of error messages.
    pub fn label(self) -> &'static str {
        match self {
            ParamField::FastPeriod => "Fast period",
            ParamField::SlowPeriod => "Slow period",
            ParamField::SignalPeriod => "Signal period",
            ParamField::BuyThreshold => "Buy threshold",
            ParamField::SellThreshold => "Sell threshold",
            ParamField::StopLoss => "Stop loss",
        }
    }

    pub fn is_period(self) -> bool {
        matches!(
            self,
            ParamField::FastPeriod | ParamField::SlowPeriod | ParamField::SignalPeriod
        )
    }

    /// Evaluates this field's rule for `value`.
    ///
    /// `fast_period` is only consulted for the slow period, which must sit
    /// strictly above it. Returns the message to show next to the field.
    pub fn check(self, value: f64, fast_period: f64) -> Result<(), String> {
        if !value.is_finite() {
            return Err(format!("{} must be a number", self.label()));
        }
        if self.is_period() {
            if value.fract() != 0.0 {
                return Err(format!("{} must be a whole number", self.label()));
            }
            if value < 1.0 {
                return Err(format!("{} must be at least 1", self.label()));
            }
        }

        match self {
            ParamField::SlowPeriod if value <= fast_period => Err(format!(
                "{} must be greater than fast period ({})",
                self.label(),
                fast_period
            )),
            ParamField::BuyThreshold | ParamField::StopLoss if value <= 0.0 => {
                Err(format!("{} must be greater than 0", self.label()))
            }
            ParamField::SellThreshold if value >= 0.0 => {
                Err(format!("{} must be less than 0", self.label()))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamField {
    type Err = Error;

    /// Accepts `fastPeriod`, `fast_period` and `fast-period` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "fastperiod" => Ok(ParamField::FastPeriod),
            "slowperiod" => Ok(ParamField::SlowPeriod),
            "signalperiod" => Ok(ParamField::SignalPeriod),
            "buythreshold" => Ok(ParamField::BuyThreshold),
            "sellthreshold" => Ok(ParamField::SellThreshold),
            "stoploss" => Ok(ParamField::StopLoss),
            _ => Err(Error::UnknownField(s.trim().to_string())),
        }
    }
}
