//! Domain error types.
//!
//! These errors represent validation failures and structural
//! inconsistencies in the segment path. They are distinct from
//! lookup and transport errors.

use super::{InvalidDistance, InvalidSegment, StationId};

/// Errors raised by the segment path engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Candidate segment failed construction checks
    #[error(transparent)]
    InvalidSegment(#[from] InvalidSegment),

    /// Both candidate stations are already on the line
    #[error("up and down stations already exist on the line ({up}, {down})")]
    DuplicateSegment { up: StationId, down: StationId },

    /// Neither candidate station is on the line
    #[error("neither station is part of the existing line ({up}, {down})")]
    DisjointSegment { up: StationId, down: StationId },

    /// A split would leave a segment with no length
    #[error(transparent)]
    InvalidDistance(#[from] InvalidDistance),

    /// Station to remove is not on the line
    #[error("station {0} is not part of the line")]
    NotFound(StationId),

    /// Removal would leave the line without segments
    #[error("cannot remove a station from a line with a single segment")]
    LastSegment,

    /// A path must hold at least one segment
    #[error("a line must consist of at least one segment")]
    EmptyPath,

    /// Segments do not form a single simple chain
    #[error("segments do not form a single path: {0}")]
    InconsistentPath(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Distance;

    #[test]
    fn error_display() {
        let a = StationId::new(1);
        let b = StationId::new(2);

        let err = PathError::DuplicateSegment { up: a, down: b };
        assert_eq!(
            err.to_string(),
            "up and down stations already exist on the line (1, 2)"
        );

        let err = PathError::DisjointSegment { up: a, down: b };
        assert_eq!(
            err.to_string(),
            "neither station is part of the existing line (1, 2)"
        );

        let err = PathError::NotFound(a);
        assert_eq!(err.to_string(), "station 1 is not part of the line");

        let err = PathError::LastSegment;
        assert_eq!(
            err.to_string(),
            "cannot remove a station from a line with a single segment"
        );

        let err = PathError::InconsistentPath("no head station");
        assert_eq!(
            err.to_string(),
            "segments do not form a single path: no head station"
        );
    }

    #[test]
    fn wrapped_errors_are_transparent() {
        let distance_err = Distance::new(0).unwrap_err();
        let err = PathError::from(distance_err.clone());
        assert_eq!(err.to_string(), distance_err.to_string());

        let segment_err = InvalidSegment::SameStation(StationId::new(3));
        let err = PathError::from(segment_err.clone());
        assert_eq!(err.to_string(), segment_err.to_string());
    }
}
