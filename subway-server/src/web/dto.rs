//! Data transfer objects for web requests and responses.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{LineId, Station, StationId};
use crate::lines::LineDetails;

/// Request to register a station.
#[derive(Debug, Deserialize)]
pub struct StationRequest {
    /// Display name
    pub name: String,
}

/// A station in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationResponse {
    pub id: StationId,
    pub name: String,
}

/// Request to create a line with its first segment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRequest {
    pub name: String,
    pub color: String,
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    /// Raw distance; validated by the domain
    pub distance: i64,
}

/// Request to change a line's name and color.
#[derive(Debug, Deserialize)]
pub struct UpdateLineRequest {
    pub name: String,
    pub color: String,
}

/// A line with its stations in path order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineResponse {
    pub id: LineId,
    pub name: String,
    pub color: String,
    pub stations: Vec<StationResponse>,
    pub created_date: NaiveDateTime,
    pub modified_date: NaiveDateTime,
}

/// Request to add a segment to a line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRequest {
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    /// Raw distance; validated by the domain
    pub distance: i64,
}

/// Query for removing a station from a line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveStationQuery {
    pub station_id: StationId,
}

/// Error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Error message
    pub error_message: String,
}

// Conversion implementations

impl StationResponse {
    /// Create from a domain Station.
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id,
            name: station.name.clone(),
        }
    }
}

impl LineResponse {
    /// Create from a line and its resolved stations.
    pub fn from_details(details: &LineDetails) -> Self {
        let line = &details.line;
        Self {
            id: line.id(),
            name: line.name().to_string(),
            color: line.color().to_string(),
            stations: details
                .stations
                .iter()
                .map(StationResponse::from_station)
                .collect(),
            created_date: line.created_at(),
            modified_date: line.modified_at(),
        }
    }
}
