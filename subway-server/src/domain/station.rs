//! Station identity types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a station name fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station name: {reason}")]
pub struct InvalidStationName {
    reason: &'static str,
}

/// Opaque identity of a station.
///
/// Two stations are the same station exactly when their ids are equal.
/// The engine never looks past the id; names live with the registry.
///
/// # Examples
///
/// ```
/// use subway_server::domain::StationId;
///
/// let a = StationId::new(1);
/// assert_eq!(a, StationId::new(1));
/// assert_ne!(a, StationId::new(2));
/// assert_eq!(a.to_string(), "1");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(u64);

impl StationId {
    pub const fn new(raw: u64) -> Self {
        StationId(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
}

impl Station {
    /// Create a station, trimming the name.
    ///
    /// The name must contain at least one non-whitespace character.
    pub fn new(id: StationId, name: &str) -> Result<Self, InvalidStationName> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InvalidStationName {
                reason: "must not be blank",
            });
        }
        Ok(Station {
            id,
            name: name.to_string(),
        })
    }
}
