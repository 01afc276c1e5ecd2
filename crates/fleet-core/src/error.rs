//! Error types for the fleet data model.

use thiserror::Error;

/// Result type alias for data-model operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while building or decoding pool snapshots.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("duplicate machine id in pool snapshot: {0}")]
    DuplicateMachine(String),

    #[error("invalid membership status: {0}")]
    InvalidMembershipStatus(String),
}
