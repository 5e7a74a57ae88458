// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Unknown asset type: {0} (expected stocks, crypto or forex)")]
    UnknownAssetType(String),

    #[error("Unknown trade side: {0} (expected buy or sell)")]
    UnknownSide(String),
}

pub type Result<T> = std::result::Result<T, Error>;
