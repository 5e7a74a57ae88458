// In crates/strategies/src/error.rs

use std::collections::BTreeMap;

use thiserror::Error;

use crate::types::ParamField;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The proposed value was not a finite number. Nothing was changed.
    #[error("{field} is not a valid number")]
    InvalidNumber { field: ParamField },

    /// The value was stored, but it breaks the field's rule.
    #[error("{message}")]
    ConstraintViolation { field: ParamField, message: String },

    #[error("Unknown strategy parameter: {0}")]
    UnknownField(String),

    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("Strategy parameters are invalid: {}", describe(.0))]
    InvalidParams(BTreeMap<ParamField, String>),

    #[error("Failed to build indicator: {0}")]
    Indicator(String),

    #[error("Cannot trade at a non-positive price: {0}")]
    InvalidPrice(rust_decimal::Decimal),
}

fn describe(errors: &BTreeMap<ParamField, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, Error>;
