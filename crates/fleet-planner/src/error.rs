//! Planner error types.

use thiserror::Error;

/// Result type alias for planning operations.
pub type ResizeResult<T> = Result<T, ResizeError>;

/// Errors that can occur while computing a resize plan.
///
/// Only malformed input is an error. A plan that cannot fully reach the
/// desired size is still returned as a plan.
#[derive(Debug, Error)]
pub enum ResizeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
