//! Error types shared by the pricing, scenario and aggregation modules.

use crate::core::scenario::ScenarioId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Scenario index {index} is out of range ({len} saved)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(ScenarioId),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Failed to decode scenario collection: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
