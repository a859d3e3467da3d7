use crate::schema::Source;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconError {
    #[error("Invalid month {0}: must be between 1 and 12")]
    InvalidMonth(u32),

    #[error("Invalid year {0}: expected a 4-digit year")]
    InvalidYear(i32),

    #[error("Conservation violation for {origin:?} records: series sum to {actual} but accepted input sums to {expected}")]
    ConservationViolation {
        origin: Source,
        expected: u64,
        actual: u64,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReconError>;
