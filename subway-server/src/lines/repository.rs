//! In-memory line storage.
//!
//! Lines are kept the way a relational store would keep them: metadata
//! plus an unordered set of segment rows. Every read reassembles the
//! path from those rows, so a corrupted record surfaces as
//! [`PathError::InconsistentPath`](crate::domain::PathError) instead of a
//! silently wrong order.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::domain::{Line, LineId, Path, Segment};

use super::error::LineError;

/// One stored line.
#[derive(Debug, Clone)]
struct LineRecord {
    id: LineId,
    name: String,
    color: String,
    /// Storage order, not path order.
    segments: Vec<Segment>,
    created_at: NaiveDateTime,
    modified_at: NaiveDateTime,
}

impl LineRecord {
    fn from_line(line: &Line) -> Self {
        LineRecord {
            id: line.id(),
            name: line.name().to_string(),
            color: line.color().to_string(),
            segments: line.path().segments().to_vec(),
            created_at: line.created_at(),
            modified_at: line.modified_at(),
        }
    }

    fn load(&self) -> Result<Line, LineError> {
        let path = Path::from_segments(self.segments.clone())?;
        Ok(Line::restore(
            self.id,
            &self.name,
            &self.color,
            path,
            self.created_at,
            self.modified_at,
        )?)
    }
}

type LineCell = Arc<Mutex<LineRecord>>;

#[derive(Default)]
struct Inner {
    lines: BTreeMap<LineId, LineCell>,
    /// Line name → id, for uniqueness checks without locking every line.
    names: HashMap<String, LineId>,
    next_id: u64,
}

/// Thread-safe line store.
///
/// Lock order is always the index first, then an individual line.
/// Structural edits release the index before locking the line, so edits
/// to different lines run concurrently while edits to one line queue up.
#[derive(Clone, Default)]
pub struct LineRepository {
    inner: Arc<RwLock<Inner>>,
}

impl LineRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and store a new line seeded with one segment.
    pub async fn create(
        &self,
        name: &str,
        color: &str,
        seed: Segment,
        now: NaiveDateTime,
    ) -> Result<Line, LineError> {
        let mut guard = self.inner.write().await;
        let id = LineId::new(guard.next_id + 1);
        let line = Line::new(id, name, color, seed, now)?;

        if guard.names.contains_key(line.name()) {
            return Err(LineError::DuplicateName(line.name().to_string()));
        }

        guard.next_id += 1;
        guard.names.insert(line.name().to_string(), id);
        guard
            .lines
            .insert(id, Arc::new(Mutex::new(LineRecord::from_line(&line))));
        Ok(line)
    }

    /// Snapshot of one line.
    pub async fn get(&self, id: LineId) -> Result<Line, LineError> {
        let cell = self.cell(id).await?;
        let record = cell.lock().await;
        record.load()
    }

    /// Snapshots of all lines, ordered by id.
    pub async fn list(&self) -> Result<Vec<Line>, LineError> {
        let cells: Vec<LineCell> = {
            let guard = self.inner.read().await;
            guard.lines.values().cloned().collect()
        };

        let mut lines = Vec::with_capacity(cells.len());
        for cell in cells {
            lines.push(cell.lock().await.load()?);
        }
        Ok(lines)
    }

    /// Apply a structural edit to one line.
    ///
    /// `edit` runs against a working copy. The copy replaces the stored
    /// line only if `edit` succeeds, so a failed edit is never observable.
    /// Returns the edit's result and the committed line.
    pub async fn mutate<T, F>(&self, id: LineId, edit: F) -> Result<(T, Line), LineError>
    where
        F: FnOnce(&mut Line) -> Result<T, LineError>,
    {
        let cell = self.cell(id).await?;
        let mut stored = cell.lock().await;

        let mut working = stored.load()?;
        let outcome = edit(&mut working)?;
        *stored = LineRecord::from_line(&working);
        debug!(line = %id, segments = stored.segments.len(), "line committed");
        Ok((outcome, working))
    }

    /// Change a line's name and color, keeping names unique.
    pub async fn rename(
        &self,
        id: LineId,
        name: &str,
        color: &str,
        now: NaiveDateTime,
    ) -> Result<Line, LineError> {
        let mut guard = self.inner.write().await;
        let cell = guard.lines.get(&id).cloned().ok_or(LineError::NotFound(id))?;
        let mut stored = cell.lock().await;

        let mut working = stored.load()?;
        working.update(name, color, now)?;

        if let Some(&owner) = guard.names.get(working.name()) {
            if owner != id {
                return Err(LineError::DuplicateName(working.name().to_string()));
            }
        }

        guard.names.remove(&stored.name);
        guard.names.insert(working.name().to_string(), id);
        *stored = LineRecord::from_line(&working);
        Ok(working)
    }

    /// Delete a line.
    pub async fn delete(&self, id: LineId) -> Result<(), LineError> {
        let mut guard = self.inner.write().await;
        let cell = guard.lines.remove(&id).ok_or(LineError::NotFound(id))?;
        let record = cell.lock().await;
        guard.names.remove(&record.name);
        Ok(())
    }

    async fn cell(&self, id: LineId) -> Result<LineCell, LineError> {
        let guard = self.inner.read().await;
        guard.lines.get(&id).cloned().ok_or(LineError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PathError, StationId};
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn seg(up: u64, down: u64, distance: i64) -> Segment {
        Segment::try_new(StationId::new(up), StationId::new(down), distance).unwrap()
    }

    #[tokio::test]
    async fn create_get_list() {
        let repo = LineRepository::new();
        let green = repo.create("Line 2", "green", seg(1, 2, 10), at(9)).await.unwrap();
        let blue = repo.create("Line 4", "blue", seg(3, 4, 5), at(9)).await.unwrap();

        assert_eq!(green.id(), LineId::new(1));
        assert_eq!(blue.id(), LineId::new(2));
        assert_eq!(repo.get(green.id()).await.unwrap().name(), "Line 2");

        let names: Vec<String> = repo.list().await.unwrap().iter().map(|l| l.name().to_string()).collect();
        assert_eq!(names, vec!["Line 2", "Line 4"]);
    }

    #[tokio::test]
    async fn duplicate_name_on_create() {
        let repo = LineRepository::new();
        repo.create("Line 2", "green", seg(1, 2, 10), at(9)).await.unwrap();
        let err = repo
            .create("Line 2", "red", seg(3, 4, 10), at(9))
            .await
            .unwrap_err();
        assert_eq!(err, LineError::DuplicateName("Line 2".into()));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_mutation_is_not_committed() {
        let repo = LineRepository::new();
        let line = repo.create("Line 2", "green", seg(1, 2, 10), at(9)).await.unwrap();

        let err = repo
            .mutate(line.id(), |l| {
                l.add_segment(seg(1, 3, 4), at(10))?;
                l.add_segment(seg(8, 9, 1), at(10))?;
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LineError::Path(PathError::DisjointSegment { .. })));

        let stored = repo.get(line.id()).await.unwrap();
        assert_eq!(stored.path().segment_count(), 1);
        assert_eq!(stored.modified_at(), at(9));
    }

    #[tokio::test]
    async fn successful_mutation_commits() {
        let repo = LineRepository::new();
        let line = repo.create("Line 2", "green", seg(1, 2, 10), at(9)).await.unwrap();

        let (stored, committed) = repo
            .mutate(line.id(), |l| Ok(l.add_segment(seg(2, 3, 4), at(10))?))
            .await
            .unwrap();
        assert_eq!(stored, seg(2, 3, 4));
        assert_eq!(committed.path().segment_count(), 2);
        assert_eq!(repo.get(line.id()).await.unwrap().path().segment_count(), 2);
    }

    #[tokio::test]
    async fn committed_segments_reload_in_path_order() {
        let repo = LineRepository::new();
        let line = repo.create("Line 2", "green", seg(1, 2, 10), at(9)).await.unwrap();
        repo.mutate(line.id(), |l| {
            l.add_segment(seg(3, 1, 2), at(10))?;
            l.add_segment(seg(1, 4, 3), at(10))?;
            Ok(())
        })
        .await
        .unwrap();

        let stored = repo.get(line.id()).await.unwrap();
        let stations: Vec<u64> = stored
            .path()
            .ordered_stations()
            .unwrap()
            .map(StationId::get)
            .collect();
        assert_eq!(stations, vec![3, 1, 4, 2]);
        assert_eq!(stored.created_at(), at(9));
        assert_eq!(stored.modified_at(), at(10));
    }

    #[tokio::test]
    async fn corrupted_rows_are_reported() {
        let repo = LineRepository::new();
        let line = repo.create("Line 2", "green", seg(1, 2, 10), at(9)).await.unwrap();
        {
            let guard = repo.inner.read().await;
            let mut record = guard.lines[&line.id()].lock().await;
            record.segments.push(seg(1, 3, 4));
        }

        let err = repo.get(line.id()).await.unwrap_err();
        assert!(matches!(err, LineError::Path(PathError::InconsistentPath(_))));
        assert!(repo.list().await.is_err());

        let err = repo
            .mutate(line.id(), |l| Ok(l.add_segment(seg(2, 5, 1), at(10))?))
            .await
            .unwrap_err();
        assert!(matches!(err, LineError::Path(PathError::InconsistentPath(_))));

        {
            let guard = repo.inner.read().await;
            guard.lines[&line.id()].lock().await.segments.clear();
        }
        assert_eq!(
            repo.get(line.id()).await.unwrap_err(),
            LineError::Path(PathError::EmptyPath)
        );
    }

    #[tokio::test]
    async fn rename_checks_other_lines() {
        let repo = LineRepository::new();
        let green = repo.create("Line 2", "green", seg(1, 2, 10), at(9)).await.unwrap();
        repo.create("Line 4", "blue", seg(3, 4, 5), at(9)).await.unwrap();

        let err = repo.rename(green.id(), "Line 4", "green", at(10)).await.unwrap_err();
        assert_eq!(err, LineError::DuplicateName("Line 4".into()));

        // Keeping its own name is fine
        let renamed = repo.rename(green.id(), "Line 2", "lime", at(10)).await.unwrap();
        assert_eq!(renamed.color(), "lime");

        let renamed = repo.rename(green.id(), "Line 9", "lime", at(11)).await.unwrap();
        assert_eq!(renamed.name(), "Line 9");

        // Old name is free again
        repo.create("Line 2", "green", seg(5, 6, 1), at(12)).await.unwrap();
    }

    #[tokio::test]
    async fn delete_frees_name() {
        let repo = LineRepository::new();
        let line = repo.create("Line 2", "green", seg(1, 2, 10), at(9)).await.unwrap();
        repo.delete(line.id()).await.unwrap();

        assert_eq!(repo.get(line.id()).await.unwrap_err(), LineError::NotFound(line.id()));
        assert_eq!(repo.delete(line.id()).await, Err(LineError::NotFound(line.id())));
        repo.create("Line 2", "green", seg(1, 2, 10), at(9)).await.unwrap();
    }
}
