// In crates/engine/src/lib.rs

//! Simulated trading sessions: configuration, lifecycle, storage and the
//! tick loop that feeds quotes through a strategy.

pub mod config;
pub mod error;
pub mod feed;
pub mod runner;
pub mod simulation;
pub mod store;

pub use config::{SimulationConfig, SimulationRequest, parse_duration};
pub use error::{Error, Result};
pub use feed::{MockQuoteFeed, QuoteSource};
pub use runner::{RunnerSettings, SimulationRunner};
pub use simulation::Simulation;
pub use store::{SimulationResults, SimulationStore};
