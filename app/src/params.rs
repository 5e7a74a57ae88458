// In app/src/params.rs

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;
use strategies::{Error, ParamField, StrategyConfiguration, StrategyParams};

/// Parses a `field=value` command-line edit.
pub fn parse_edit(s: &str) -> std::result::Result<(String, String), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{s}`"))?;
    Ok((field.trim().to_string(), value.trim().to_string()))
}

/// The parameter set and its error map as printed by the CLI.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamsReport {
    pub params: StrategyParams,
    pub errors: BTreeMap<ParamField, String>,
    pub valid: bool,
}

impl From<&StrategyConfiguration> for ParamsReport {
    fn from(config: &StrategyConfiguration) -> Self {
        Self {
            params: *config.params(),
            errors: config.current_errors(),
            valid: config.is_valid(),
        }
    }
}

/// Applies a raw text edit. Only an unknown field name is fatal.
pub fn apply_raw(config: &mut StrategyConfiguration, field: &str, value: &str) -> Result<()> {
    tolerate(config.update_raw(field, value)).with_context(|| format!("Cannot apply `{field}={value}`"))
}

/// Applies numeric edits in field order.
pub fn apply_all(config: &mut StrategyConfiguration, edits: &BTreeMap<ParamField, f64>) {
    for (field, value) in edits {
        match config.update(*field, *value) {
            Ok(()) | Err(Error::ConstraintViolation { .. }) => {}
            Err(Error::InvalidNumber { field }) => {
                tracing::warn!(%field, "Edit is not a number and was ignored.");
            }
            Err(other) => tracing::warn!(error = %other, "Edit was not applied."),
        }
    }
}

// Non-numeric edits are dropped and violations live in the error map, so
// neither stops a batch of edits.
fn tolerate(result: strategies::Result<()>) -> strategies::Result<()> {
    match result {
        Err(Error::InvalidNumber { field }) => {
            tracing::warn!(%field, "Edit is not a number and was ignored.");
            Ok(())
        }
        Err(Error::ConstraintViolation { .. }) => Ok(()),
        other => other,
    }
}
