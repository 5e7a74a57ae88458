// In crates/engine/src/error.rs

use core_types::SimulationStatus;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid simulation configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid simulation period: {0} (expected e.g. 24h, 48h, 1w)")]
    InvalidDuration(String),

    #[error("Strategy error: {0}")]
    Strategy(#[from] strategies::Error),

    #[error("A simulation is already running for user {user_id}. Stop it before starting a new one.")]
    AlreadyActive { user_id: u64 },

    #[error("No active simulation found for user {user_id}")]
    NoActiveSimulation { user_id: u64 },

    #[error("Simulation {0} not found")]
    NotFound(u64),

    #[error("Cannot {action} a simulation that is {status}")]
    InvalidTransition {
        action: &'static str,
        status: SimulationStatus,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
