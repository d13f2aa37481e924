//! Directed segment between two stations.

use serde::Serialize;

use super::{Distance, InvalidDistance, StationId};

/// Error returned when a segment cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidSegment {
    /// Up and down station are the same station
    #[error("up and down stations must differ (both are {0})")]
    SameStation(StationId),

    /// Distance is not strictly positive
    #[error(transparent)]
    Distance(#[from] InvalidDistance),
}

/// One directed, distance-weighted edge of a line.
///
/// Segments are values: the structural operations below return a new
/// segment rather than mutating in place, and the path engine decides
/// which one applies.
///
/// # Invariants
///
/// - `up != down`
/// - `distance > 0` (carried by [`Distance`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    up: StationId,
    down: StationId,
    distance: Distance,
}

impl Segment {
    /// Construct a segment from validated parts.
    ///
    /// # Examples
    ///
    /// ```
    /// use subway_server::domain::{Distance, Segment, StationId};
    ///
    /// let a = StationId::new(1);
    /// let b = StationId::new(2);
    /// let seg = Segment::new(a, b, Distance::new(5).unwrap()).unwrap();
    /// assert_eq!(seg.up(), a);
    /// assert_eq!(seg.down(), b);
    ///
    /// assert!(Segment::new(a, a, Distance::new(5).unwrap()).is_err());
    /// ```
    pub fn new(up: StationId, down: StationId, distance: Distance) -> Result<Self, InvalidSegment> {
        if up == down {
            return Err(InvalidSegment::SameStation(up));
        }
        Ok(Segment { up, down, distance })
    }

    /// Construct a segment from a raw distance value.
    pub fn try_new(up: StationId, down: StationId, distance: i64) -> Result<Self, InvalidSegment> {
        Segment::new(up, down, Distance::new(distance)?)
    }

    pub fn up(&self) -> StationId {
        self.up
    }

    pub fn down(&self) -> StationId {
        self.down
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    /// Both endpoints, up first.
    pub fn stations(&self) -> [StationId; 2] {
        [self.up, self.down]
    }

    pub fn contains_station(&self, station: StationId) -> bool {
        self.up == station || self.down == station
    }

    /// Remainder after `inserted` is carved off the front of this segment.
    ///
    /// `inserted` runs from this segment's up station to a new station;
    /// the result runs from that new station to this segment's down station.
    pub fn shrunk_from_front(&self, inserted: &Segment) -> Result<Segment, InvalidDistance> {
        let distance = self.distance.checked_sub(inserted.distance)?;
        Ok(Segment {
            up: inserted.down,
            down: self.down,
            distance,
        })
    }

    /// Remainder after `inserted` is carved off the back of this segment.
    ///
    /// `inserted` runs from a new station to this segment's down station;
    /// the result runs from this segment's up station to that new station.
    pub fn shrunk_from_back(&self, inserted: &Segment) -> Result<Segment, InvalidDistance> {
        let distance = self.distance.checked_sub(inserted.distance)?;
        Ok(Segment {
            up: self.up,
            down: inserted.up,
            distance,
        })
    }

    /// Absorb the segment immediately upstream of this one.
    ///
    /// Requires `upstream.down() == self.up()`; the shared station vanishes
    /// and the distances add.
    pub fn merged_with_upstream(&self, upstream: &Segment) -> Result<Segment, InvalidSegment> {
        debug_assert_eq!(upstream.down, self.up);
        let distance = self.distance.checked_add(upstream.distance)?;
        Segment::new(upstream.up, self.down, distance)
    }
}
