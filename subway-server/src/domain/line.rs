//! Subway line aggregate.
//!
//! A `Line` carries its display metadata and exclusively owns one
//! [`Path`]. Structural edits go straight to the path; the line only
//! records when it last changed.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Path, PathError, Removal, Segment, StationId};

/// Error returned when line metadata fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid line: {reason}")]
pub struct InvalidLine {
    reason: &'static str,
}

/// Identity of a line.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(u64);

impl LineId {
    pub const fn new(raw: u64) -> Self {
        LineId(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A subway line.
///
/// # Invariants
///
/// - `name` and `color` are non-blank
/// - `path` holds at least one segment for as long as the line exists
#[derive(Debug, Clone)]
pub struct Line {
    id: LineId,
    name: String,
    color: String,
    path: Path,
    created_at: NaiveDateTime,
    modified_at: NaiveDateTime,
}

impl Line {
    /// Create a line with its first segment.
    pub fn new(
        id: LineId,
        name: &str,
        color: &str,
        seed: Segment,
        now: NaiveDateTime,
    ) -> Result<Self, InvalidLine> {
        let (name, color) = validate_details(name, color)?;
        Ok(Line {
            id,
            name,
            color,
            path: Path::new(seed),
            created_at: now,
            modified_at: now,
        })
    }

    /// Reassemble a line from stored parts.
    pub fn restore(
        id: LineId,
        name: &str,
        color: &str,
        path: Path,
        created_at: NaiveDateTime,
        modified_at: NaiveDateTime,
    ) -> Result<Self, InvalidLine> {
        let (name, color) = validate_details(name, color)?;
        Ok(Line {
            id,
            name,
            color,
            path,
            created_at,
            modified_at,
        })
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn modified_at(&self) -> NaiveDateTime {
        self.modified_at
    }

    /// Replace the name and color.
    pub fn update(&mut self, name: &str, color: &str, now: NaiveDateTime) -> Result<(), InvalidLine> {
        let (name, color) = validate_details(name, color)?;
        self.name = name;
        self.color = color;
        self.modified_at = now;
        Ok(())
    }

    /// Forward to [`Path::add_segment`], stamping the line on success.
    pub fn add_segment(&mut self, candidate: Segment, now: NaiveDateTime) -> Result<Segment, PathError> {
        let stored = self.path.add_segment(candidate)?;
        self.modified_at = now;
        Ok(stored)
    }

    /// Forward to [`Path::remove_station`], stamping the line on success.
    pub fn remove_station(&mut self, station: StationId, now: NaiveDateTime) -> Result<Removal, PathError> {
        let removal = self.path.remove_station(station)?;
        self.modified_at = now;
        Ok(removal)
    }
}

fn validate_details(name: &str, color: &str) -> Result<(String, String), InvalidLine> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InvalidLine {
            reason: "name must not be blank",
        });
    }
    let color = color.trim();
    if color.is_empty() {
        return Err(InvalidLine {
            reason: "color must not be blank",
        });
    }
    Ok((name.to_string(), color.to_string()))
}
