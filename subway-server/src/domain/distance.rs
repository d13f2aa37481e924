//! Distance between adjacent stations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a distance would not be strictly positive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid distance: {reason}")]
pub struct InvalidDistance {
    reason: &'static str,
}

impl InvalidDistance {
    pub(crate) const fn new(reason: &'static str) -> Self {
        InvalidDistance { reason }
    }

    /// A station already sits at the requested offset along the line.
    pub(crate) const fn occupied() -> Self {
        InvalidDistance::new("a segment of equal or greater length already exists at that point")
    }

    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

/// A strictly positive distance.
///
/// Every `Distance` value is greater than zero. Arithmetic that would
/// produce zero or less fails instead of yielding an invalid value.
///
/// Requested distances are at most [`Distance::MAX_REQUEST`]. Segments
/// built by merging may exceed it; the `u64` store keeps any sum of a
/// line's segments representable.
///
/// # Examples
///
/// ```
/// use subway_server::domain::Distance;
///
/// let ten = Distance::new(10).unwrap();
/// let three = Distance::new(3).unwrap();
/// assert_eq!(ten.checked_sub(three).unwrap().get(), 7);
/// assert!(three.checked_sub(ten).is_err());
/// assert!(Distance::new(0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u64")]
pub struct Distance(u64);

impl Distance {
    /// Largest distance a caller may request for a single segment.
    pub const MAX_REQUEST: i64 = u32::MAX as i64;

    /// Construct a distance from a requested raw value.
    pub fn new(value: i64) -> Result<Self, InvalidDistance> {
        if value > Self::MAX_REQUEST {
            return Err(InvalidDistance::new("too large"));
        }
        u64::try_from(value)
            .map_err(|_| InvalidDistance::new("must be greater than zero"))
            .and_then(Distance::positive)
    }

    /// Construct from an already computed length, without the request cap.
    pub(crate) fn positive(value: u64) -> Result<Self, InvalidDistance> {
        if value == 0 {
            return Err(InvalidDistance::new("must be greater than zero"));
        }
        Ok(Distance(value))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// Sum of two distances.
    pub fn checked_add(self, other: Distance) -> Result<Distance, InvalidDistance> {
        self.0
            .checked_add(other.0)
            .map(Distance)
            .ok_or(InvalidDistance::new("too large"))
    }

    /// Difference of two distances; fails unless `self > other`.
    pub fn checked_sub(self, other: Distance) -> Result<Distance, InvalidDistance> {
        if self.0 <= other.0 {
            return Err(InvalidDistance::occupied());
        }
        Ok(Distance(self.0 - other.0))
    }
}

impl TryFrom<i64> for Distance {
    type Error = InvalidDistance;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Distance::new(value)
    }
}

impl From<Distance> for u64 {
    fn from(d: Distance) -> u64 {
        d.0
    }
}

impl fmt::Debug for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Distance({})", self.0)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(v: i64) -> Distance {
        Distance::new(v).unwrap()
    }

    #[test]
    fn rejects_non_positive() {
        assert!(Distance::new(0).is_err());
        assert!(Distance::new(-1).is_err());
        assert!(Distance::new(i64::MIN).is_err());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Distance::new(Distance::MAX_REQUEST).is_ok());
        assert!(Distance::new(Distance::MAX_REQUEST + 1).is_err());
        assert!(Distance::new(i64::MAX).is_err());
    }

    #[test]
    fn subtraction_must_stay_positive() {
        assert_eq!(d(10).checked_sub(d(4)).unwrap(), d(6));
        let err = d(4).checked_sub(d(4)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid distance: a segment of equal or greater length already exists at that point"
        );
        assert!(d(4).checked_sub(d(9)).is_err());
    }

    #[test]
    fn addition() {
        assert_eq!(d(3).checked_add(d(4)).unwrap(), d(7));
        let max = d(Distance::MAX_REQUEST);
        assert_eq!(max.checked_add(max).unwrap().get(), 2 * u64::from(u32::MAX));
        assert!(Distance::positive(u64::MAX).unwrap().checked_add(d(1)).is_err());
    }

    #[test]
    fn serde_goes_through_validation() {
        let ok: Distance = serde_json::from_str("12").unwrap();
        assert_eq!(ok.get(), 12);
        assert!(serde_json::from_str::<Distance>("0").is_err());
        assert!(serde_json::from_str::<Distance>("-3").is_err());
        assert_eq!(serde_json::to_string(&d(9)).unwrap(), "9");
    }
}
