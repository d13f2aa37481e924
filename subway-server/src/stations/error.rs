//! Station registry error types.

use crate::domain::{InvalidStationName, StationId};

/// Errors that can occur when creating or looking up stations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StationError {
    /// No station with this id exists
    #[error("station {0} does not exist")]
    NotFound(StationId),

    /// Name failed validation
    #[error(transparent)]
    InvalidName(#[from] InvalidStationName),

    /// Another station already uses this name
    #[error("a station named {0} already exists")]
    DuplicateName(String),
}
