//! Segment path engine.
//!
//! A `Path` owns the segments of one line and keeps them arranged as a
//! single simple directed chain: one head, one tail, no branches and no
//! cycles. Order is never stored; it is derived by walking from the head
//! whenever it is needed, so structural edits only ever touch the one or
//! two segments involved.
//!
//! Every operation validates before it mutates. A failed call leaves the
//! path exactly as it was.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::{Distance, InvalidDistance, PathError, Segment, StationId};

/// Structural change made by [`Path::remove_station`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The station was the head or tail; its only segment was dropped.
    Trimmed { removed: Segment },

    /// The station was interior; its two segments were fused into `merged`.
    Merged {
        upstream: Segment,
        downstream: Segment,
        merged: Segment,
    },
}

/// The segments of one line, guaranteed to form one simple chain.
///
/// # Invariants
///
/// - At least one segment
/// - Every station is the up station of at most one segment and the
///   down station of at most one segment
/// - Walking from the unique head visits every segment exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    segments: Vec<Segment>,
}

/// Head station plus the outgoing segment index of every up station.
struct Links {
    head: StationId,
    outgoing: HashMap<StationId, usize>,
}

impl Path {
    /// Create a path from its first segment.
    pub fn new(seed: Segment) -> Self {
        Path {
            segments: vec![seed],
        }
    }

    /// Rebuild a path from stored segments, in any order.
    ///
    /// # Errors
    ///
    /// - [`PathError::EmptyPath`] if `segments` is empty
    /// - [`PathError::InconsistentPath`] if they do not form one chain
    pub fn from_segments(segments: Vec<Segment>) -> Result<Self, PathError> {
        if segments.is_empty() {
            return Err(PathError::EmptyPath);
        }
        let path = Path { segments };
        path.chain()?;
        Ok(path)
    }

    /// Number of segments (always at least one).
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Segments in storage order (not path order).
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn contains_station(&self, station: StationId) -> bool {
        self.segments.iter().any(|s| s.contains_station(station))
    }

    /// Sum of all segment distances.
    pub fn total_distance(&self) -> u64 {
        self.segments
            .iter()
            .map(|s| s.distance().get())
            .sum()
    }

    /// Stations from head to tail.
    ///
    /// The chain is checked up front, so the returned iterator yields
    /// exactly `segment_count() + 1` stations. It is lazy and can be
    /// cloned to restart the walk.
    ///
    /// # Examples
    ///
    /// ```
    /// use subway_server::domain::{Path, Segment, StationId};
    ///
    /// let s = StationId::new;
    /// let mut path = Path::new(Segment::try_new(s(2), s(3), 4).unwrap());
    /// path.add_segment(Segment::try_new(s(1), s(2), 3).unwrap()).unwrap();
    ///
    /// let stations: Vec<_> = path.ordered_stations().unwrap().collect();
    /// assert_eq!(stations, vec![s(1), s(2), s(3)]);
    /// ```
    pub fn ordered_stations(&self) -> Result<Stations<'_>, PathError> {
        let links = self.links()?;
        self.walk(&links)?;
        Ok(Stations {
            segments: &self.segments,
            outgoing: links.outgoing,
            current: Some(links.head),
            remaining: self.segments.len() + 1,
        })
    }

    /// Admit a new segment into the path.
    ///
    /// Exactly one of the candidate's stations must already be on the line.
    /// The other station is placed `candidate.distance()` away from the
    /// known one, walking downstream (known up station) or upstream (known
    /// down station). If that point falls inside an existing segment, the
    /// segment is split; past the end of the line, the line is extended.
    ///
    /// Returns the segment that was actually stored, which differs from
    /// `candidate` whenever the new station lands beyond the first
    /// segment adjacent to the known station.
    ///
    /// # Errors
    ///
    /// - [`PathError::DuplicateSegment`] if both stations are on the line
    /// - [`PathError::DisjointSegment`] if neither station is on the line
    /// - [`PathError::InvalidDistance`] if the new station would coincide
    ///   with an existing one
    pub fn add_segment(&mut self, candidate: Segment) -> Result<Segment, PathError> {
        let has_up = self.contains_station(candidate.up());
        let has_down = self.contains_station(candidate.down());

        match (has_up, has_down) {
            (true, true) => Err(PathError::DuplicateSegment {
                up: candidate.up(),
                down: candidate.down(),
            }),
            (false, false) => Err(PathError::DisjointSegment {
                up: candidate.up(),
                down: candidate.down(),
            }),
            (true, false) => self.insert_downstream(candidate),
            (false, true) => self.insert_upstream(candidate),
        }
    }

    /// Place `candidate.down()` downstream of the known `candidate.up()`.
    fn insert_downstream(&mut self, candidate: Segment) -> Result<Segment, PathError> {
        let order = self.chain()?;
        let ahead: Vec<usize> = order
            .iter()
            .copied()
            .skip_while(|&idx| self.segments[idx].up() != candidate.up())
            .collect();

        if ahead.is_empty() {
            debug!(up = %candidate.up(), down = %candidate.down(), "extending line past tail");
            self.segments.push(candidate);
            return Ok(candidate);
        }

        let target = candidate.distance().get();
        let mut travelled = 0u64;
        for idx in ahead {
            let current = self.segments[idx];
            let reach = travelled + current.distance().get();
            if target < reach {
                let inserted = Segment::new(
                    current.up(),
                    candidate.down(),
                    offset(target, travelled)?,
                )?;
                let remainder = current.shrunk_from_front(&inserted)?;
                debug!(
                    split_up = %current.up(),
                    split_down = %current.down(),
                    new_station = %candidate.down(),
                    "splitting segment from the front"
                );
                self.segments[idx] = remainder;
                self.segments.push(inserted);
                return Ok(inserted);
            }
            if target == reach {
                return Err(InvalidDistance::occupied().into());
            }
            travelled = reach;
        }

        let tail = self.segments[order[order.len() - 1]].down();
        let extension = Segment::new(tail, candidate.down(), offset(target, travelled)?)?;
        debug!(tail = %tail, new_station = %candidate.down(), "candidate overshoots tail, extending");
        self.segments.push(extension);
        Ok(extension)
    }

    /// Place `candidate.up()` upstream of the known `candidate.down()`.
    fn insert_upstream(&mut self, candidate: Segment) -> Result<Segment, PathError> {
        let order = self.chain()?;
        let behind: Vec<usize> = order
            .iter()
            .rev()
            .copied()
            .skip_while(|&idx| self.segments[idx].down() != candidate.down())
            .collect();

        if behind.is_empty() {
            debug!(up = %candidate.up(), down = %candidate.down(), "extending line before head");
            self.segments.push(candidate);
            return Ok(candidate);
        }

        let target = candidate.distance().get();
        let mut travelled = 0u64;
        for idx in behind {
            let current = self.segments[idx];
            let reach = travelled + current.distance().get();
            if target < reach {
                let inserted = Segment::new(
                    candidate.up(),
                    current.down(),
                    offset(target, travelled)?,
                )?;
                let remainder = current.shrunk_from_back(&inserted)?;
                debug!(
                    split_up = %current.up(),
                    split_down = %current.down(),
                    new_station = %candidate.up(),
                    "splitting segment from the back"
                );
                self.segments[idx] = remainder;
                self.segments.push(inserted);
                return Ok(inserted);
            }
            if target == reach {
                return Err(InvalidDistance::occupied().into());
            }
            travelled = reach;
        }

        let head = self.segments[order[0]].up();
        let extension = Segment::new(candidate.up(), head, offset(target, travelled)?)?;
        debug!(head = %head, new_station = %candidate.up(), "candidate overshoots head, extending");
        self.segments.push(extension);
        Ok(extension)
    }

    /// Remove a station, fusing its neighbours if it was interior.
    ///
    /// # Errors
    ///
    /// - [`PathError::NotFound`] if the station is not on the line
    /// - [`PathError::LastSegment`] if only one segment remains
    pub fn remove_station(&mut self, station: StationId) -> Result<Removal, PathError> {
        if !self.contains_station(station) {
            return Err(PathError::NotFound(station));
        }
        if self.segments.len() == 1 {
            return Err(PathError::LastSegment);
        }

        let incoming = self.segments.iter().position(|s| s.down() == station);
        let outgoing = self.segments.iter().position(|s| s.up() == station);

        match (incoming, outgoing) {
            (Some(up_idx), Some(down_idx)) => {
                let upstream = self.segments[up_idx];
                let downstream = self.segments[down_idx];
                let merged = downstream.merged_with_upstream(&upstream)?;
                debug!(station = %station, merged_up = %merged.up(), merged_down = %merged.down(), "merging segments");
                self.segments[down_idx] = merged;
                self.segments.swap_remove(up_idx);
                Ok(Removal::Merged {
                    upstream,
                    downstream,
                    merged,
                })
            }
            (Some(idx), None) | (None, Some(idx)) => {
                let removed = self.segments.swap_remove(idx);
                debug!(station = %station, "trimming end segment");
                Ok(Removal::Trimmed { removed })
            }
            (None, None) => Err(PathError::NotFound(station)),
        }
    }

    /// Validate degrees and locate the unique head.
    fn links(&self) -> Result<Links, PathError> {
        let mut outgoing = HashMap::with_capacity(self.segments.len());
        let mut incoming = HashSet::with_capacity(self.segments.len());

        for (idx, segment) in self.segments.iter().enumerate() {
            if outgoing.insert(segment.up(), idx).is_some() {
                return Err(PathError::InconsistentPath(
                    "station has more than one outgoing segment",
                ));
            }
            if !incoming.insert(segment.down()) {
                return Err(PathError::InconsistentPath(
                    "station has more than one incoming segment",
                ));
            }
        }

        let mut heads = outgoing.keys().filter(|s| !incoming.contains(*s));
        let head = match (heads.next(), heads.next()) {
            (Some(head), None) => *head,
            (None, _) => return Err(PathError::InconsistentPath("no head station")),
            (Some(_), Some(_)) => {
                return Err(PathError::InconsistentPath("more than one head station"));
            }
        };

        Ok(Links { head, outgoing })
    }

    /// Segment indices in path order; checks that every segment is reached.
    fn chain(&self) -> Result<Vec<usize>, PathError> {
        let links = self.links()?;
        self.walk(&links)
    }

    fn walk(&self, links: &Links) -> Result<Vec<usize>, PathError> {
        let mut order = Vec::with_capacity(self.segments.len());
        let mut current = links.head;

        while let Some(&idx) = links.outgoing.get(&current) {
            if order.len() == self.segments.len() {
                return Err(PathError::InconsistentPath("cycle detected"));
            }
            order.push(idx);
            current = self.segments[idx].down();
        }

        if order.len() != self.segments.len() {
            return Err(PathError::InconsistentPath("segments are not connected"));
        }
        Ok(order)
    }
}

/// Distance still to cover once `travelled` of `target` is behind us.
fn offset(target: u64, travelled: u64) -> Result<Distance, InvalidDistance> {
    Distance::positive(target.saturating_sub(travelled))
}

/// Lazy head-to-tail walk over a path's stations.
#[derive(Clone)]
pub struct Stations<'a> {
    segments: &'a [Segment],
    outgoing: HashMap<StationId, usize>,
    current: Option<StationId>,
    remaining: usize,
}

impl Iterator for Stations<'_> {
    type Item = StationId;

    fn next(&mut self) -> Option<StationId> {
        if self.remaining == 0 {
            return None;
        }
        let station = self.current?;
        self.remaining -= 1;
        self.current = self
            .outgoing
            .get(&station)
            .map(|&idx| self.segments[idx].down());
        Some(station)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Stations<'_> {}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// One attempted edit: which station to anchor on, which side, how far.
    #[derive(Debug, Clone)]
    enum Op {
        Add { anchor: usize, downstream: bool, distance: i64 },
        Remove { pick: usize },
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0usize..64, any::<bool>(), 1i64..40)
                .prop_map(|(anchor, downstream, distance)| Op::Add { anchor, downstream, distance }),
            1 => (0usize..64).prop_map(|pick| Op::Remove { pick }),
        ]
    }

    fn check_chain(path: &Path) -> Result<(), TestCaseError> {
        let stations: Vec<_> = path.ordered_stations().unwrap().collect();
        prop_assert_eq!(stations.len(), path.segment_count() + 1);
        let distinct: HashSet<_> = stations.iter().copied().collect();
        prop_assert_eq!(distinct.len(), stations.len());
        prop_assert!(Path::from_segments(path.segments().to_vec()).is_ok());
        Ok(())
    }

    proptest! {
        /// Any sequence of edits keeps one simple chain, and distance is
        /// conserved by splits and merges
        #[test]
        fn edits_preserve_chain(seed in 1i64..40, ops in prop::collection::vec(op(), 0..40)) {
            let mut path = Path::new(Segment::try_new(StationId::new(0), StationId::new(1), seed).unwrap());
            let mut next_id = 2u64;

            for op in ops {
                let before = path.clone();
                let known: Vec<StationId> = path.ordered_stations().unwrap().collect();
                let head = known[0];
                let tail = known[known.len() - 1];

                match op {
                    Op::Add { anchor, downstream, distance } => {
                        let anchor = known[anchor % known.len()];
                        let fresh = StationId::new(next_id);
                        let candidate = if downstream {
                            Segment::try_new(anchor, fresh, distance).unwrap()
                        } else {
                            Segment::try_new(fresh, anchor, distance).unwrap()
                        };
                        match path.add_segment(candidate) {
                            Ok(stored) => {
                                next_id += 1;
                                prop_assert_eq!(path.segment_count(), before.segment_count() + 1);
                                let extended = stored.up() == tail || stored.down() == head;
                                let added = if extended { stored.distance().get() } else { 0 };
                                prop_assert_eq!(path.total_distance(), before.total_distance() + added);
                            }
                            Err(PathError::InvalidDistance(_)) => prop_assert_eq!(&path, &before),
                            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
                        }
                    }
                    Op::Remove { pick } => {
                        let station = known[pick % known.len()];
                        match path.remove_station(station) {
                            Ok(Removal::Merged { upstream, downstream, merged }) => {
                                prop_assert_eq!(
                                    merged.distance().get(),
                                    upstream.distance().get() + downstream.distance().get()
                                );
                                prop_assert_eq!(path.total_distance(), before.total_distance());
                            }
                            Ok(Removal::Trimmed { removed }) => {
                                prop_assert!(station == head || station == tail);
                                prop_assert_eq!(
                                    path.total_distance(),
                                    before.total_distance() - removed.distance().get()
                                );
                            }
                            Err(PathError::LastSegment) => prop_assert_eq!(before.segment_count(), 1),
                            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
                        }
                    }
                }
                check_chain(&path)?;
            }
        }

        /// Re-adding any adjacent pair fails in both orientations
        #[test]
        fn adjacent_pair_is_duplicate(
            distances in prop::collection::vec(1i64..20, 1..8),
            pick in 0usize..8,
            d in 1i64..50,
        ) {
            let segments: Vec<Segment> = distances
                .iter()
                .enumerate()
                .map(|(i, &dist)| {
                    Segment::try_new(StationId::new(i as u64), StationId::new(i as u64 + 1), dist).unwrap()
                })
                .collect();
            let mut path = Path::from_segments(segments.clone()).unwrap();
            let pair = segments[pick % segments.len()];

            let forward = path.add_segment(Segment::try_new(pair.up(), pair.down(), d).unwrap());
            let is_duplicate = matches!(forward, Err(PathError::DuplicateSegment { .. }));
            prop_assert!(is_duplicate);
            let backward = path.add_segment(Segment::try_new(pair.down(), pair.up(), d).unwrap());
            let is_duplicate = matches!(backward, Err(PathError::DuplicateSegment { .. }));
            prop_assert!(is_duplicate);
        }

        /// A single-segment path refuses removal of either endpoint
        #[test]
        fn single_segment_never_shrinks(up in 0u64..100, gap in 1u64..100, d in 1i64..100, pick_up in any::<bool>()) {
            let down = up + gap;
            let mut path = Path::new(Segment::try_new(StationId::new(up), StationId::new(down), d).unwrap());
            let station = StationId::new(if pick_up { up } else { down });
            prop_assert_eq!(path.remove_station(station), Err(PathError::LastSegment));
            prop_assert_eq!(path.segment_count(), 1);
        }
    }
}
