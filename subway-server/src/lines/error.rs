//! Line service error types.

use crate::domain::{InvalidLine, LineId, PathError};
use crate::stations::StationError;

/// Errors that can occur when managing lines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    /// No line with this id exists
    #[error("line {0} does not exist")]
    NotFound(LineId),

    /// Another line already uses this name
    #[error("a line named {0} already exists")]
    DuplicateName(String),

    /// Name or color failed validation
    #[error(transparent)]
    Invalid(#[from] InvalidLine),

    /// A referenced station could not be resolved
    #[error(transparent)]
    Station(#[from] StationError),

    /// The segment path rejected the edit
    #[error(transparent)]
    Path(#[from] PathError),
}
