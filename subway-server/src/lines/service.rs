//! Line application service.

use chrono::{Local, NaiveDateTime};
use tracing::info;

use crate::domain::{Line, LineId, PathError, Removal, Segment, Station, StationId};
use crate::stations::StationRegistry;

use super::error::LineError;
use super::repository::LineRepository;

/// Request to create a line with its first segment.
#[derive(Debug, Clone)]
pub struct NewLine {
    pub name: String,
    pub color: String,
    pub up_station: StationId,
    pub down_station: StationId,
    pub distance: i64,
}

/// A line together with its stations in path order.
#[derive(Debug, Clone)]
pub struct LineDetails {
    pub line: Line,
    pub stations: Vec<Station>,
}

/// Outcome of inserting a segment.
#[derive(Debug, Clone)]
pub struct SegmentAdded {
    /// The segment actually stored; a shortened piece of the request
    /// when it split an existing segment.
    pub stored: Segment,
    /// The committed line.
    pub line: LineDetails,
}

/// Coordinates the station registry and the line repository.
#[derive(Clone, Default)]
pub struct LineService {
    stations: StationRegistry,
    lines: LineRepository,
}

impl LineService {
    pub fn new(stations: StationRegistry, lines: LineRepository) -> Self {
        Self { stations, lines }
    }

    pub fn stations(&self) -> &StationRegistry {
        &self.stations
    }

    /// Create a line seeded with one segment between two known stations.
    pub async fn create_line(&self, request: NewLine) -> Result<LineDetails, LineError> {
        let seed = self
            .candidate(request.up_station, request.down_station, request.distance)
            .await?;
        let line = self
            .lines
            .create(&request.name, &request.color, seed, now())
            .await?;
        info!(line = %line.id(), name = line.name(), "line created");
        self.details(line).await
    }

    /// All lines, ordered by id.
    pub async fn lines(&self) -> Result<Vec<LineDetails>, LineError> {
        let mut details = Vec::new();
        for line in self.lines.list().await? {
            details.push(self.details(line).await?);
        }
        Ok(details)
    }

    /// One line with its ordered stations.
    pub async fn line(&self, id: LineId) -> Result<LineDetails, LineError> {
        let line = self.lines.get(id).await?;
        self.details(line).await
    }

    /// Change a line's name and color.
    pub async fn update_line(
        &self,
        id: LineId,
        name: &str,
        color: &str,
    ) -> Result<LineDetails, LineError> {
        let line = self.lines.rename(id, name, color, now()).await?;
        info!(line = %id, name = line.name(), "line updated");
        self.details(line).await
    }

    pub async fn delete_line(&self, id: LineId) -> Result<(), LineError> {
        self.lines.delete(id).await?;
        info!(line = %id, "line deleted");
        Ok(())
    }

    /// Insert a segment into a line.
    pub async fn add_segment(
        &self,
        id: LineId,
        up: StationId,
        down: StationId,
        distance: i64,
    ) -> Result<SegmentAdded, LineError> {
        let candidate = self.candidate(up, down, distance).await?;
        let (stored, line) = self
            .lines
            .mutate(id, |line| Ok(line.add_segment(candidate, now())?))
            .await?;
        info!(
            line = %id,
            up = %stored.up(),
            down = %stored.down(),
            distance = %stored.distance(),
            "segment added"
        );
        Ok(SegmentAdded {
            stored,
            line: self.details(line).await?,
        })
    }

    /// Remove a station from a line.
    pub async fn remove_station(&self, id: LineId, station: StationId) -> Result<Removal, LineError> {
        self.stations.get(station).await?;
        let (removal, _) = self
            .lines
            .mutate(id, |line| Ok(line.remove_station(station, now())?))
            .await?;
        match removal {
            Removal::Trimmed { removed } => {
                info!(line = %id, station = %station, removed_distance = %removed.distance(), "end station removed");
            }
            Removal::Merged { merged, .. } => {
                info!(line = %id, station = %station, merged_distance = %merged.distance(), "interior station removed");
            }
        }
        Ok(removal)
    }

    /// Validate both stations exist and build the candidate segment.
    async fn candidate(
        &self,
        up: StationId,
        down: StationId,
        distance: i64,
    ) -> Result<Segment, LineError> {
        self.stations.get(up).await?;
        self.stations.get(down).await?;
        Segment::try_new(up, down, distance).map_err(|e| LineError::Path(PathError::from(e)))
    }

    async fn details(&self, line: Line) -> Result<LineDetails, LineError> {
        let order: Vec<StationId> = line.path().ordered_stations()?.collect();
        let stations = self.stations.resolve(order).await?;
        Ok(LineDetails { line, stations })
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
