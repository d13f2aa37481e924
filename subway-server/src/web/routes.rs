//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{error, warn};

use crate::domain::{LineId, PathError, StationId};
use crate::lines::{LineError, NewLine};
use crate::stations::StationError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", post(create_station).get(list_stations))
        .route("/stations/:id", get(get_station))
        .route("/lines", post(create_line).get(list_lines))
        .route(
            "/lines/:id",
            get(get_line).put(update_line).delete(delete_line),
        )
        .route(
            "/lines/:id/sections",
            post(add_section).delete(remove_station),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn create_station(
    State(state): State<AppState>,
    Json(req): Json<StationRequest>,
) -> Result<(StatusCode, Json<StationResponse>), AppError> {
    let station = state.service.stations().create(&req.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(StationResponse::from_station(&station)),
    ))
}

async fn list_stations(State(state): State<AppState>) -> Json<Vec<StationResponse>> {
    let stations = state.service.stations().list().await;
    Json(stations.iter().map(StationResponse::from_station).collect())
}

async fn get_station(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<StationResponse>, AppError> {
    let station = state.service.stations().get(StationId::new(id)).await?;
    Ok(Json(StationResponse::from_station(&station)))
}

async fn create_line(
    State(state): State<AppState>,
    Json(req): Json<LineRequest>,
) -> Result<(StatusCode, Json<LineResponse>), AppError> {
    let details = state
        .service
        .create_line(NewLine {
            name: req.name,
            color: req.color,
            up_station: req.up_station_id,
            down_station: req.down_station_id,
            distance: req.distance,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(LineResponse::from_details(&details)),
    ))
}

async fn list_lines(State(state): State<AppState>) -> Result<Json<Vec<LineResponse>>, AppError> {
    let lines = state.service.lines().await?;
    Ok(Json(lines.iter().map(LineResponse::from_details).collect()))
}

async fn get_line(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<LineResponse>, AppError> {
    let details = state.service.line(LineId::new(id)).await?;
    Ok(Json(LineResponse::from_details(&details)))
}

async fn update_line(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateLineRequest>,
) -> Result<Json<LineResponse>, AppError> {
    let details = state
        .service
        .update_line(LineId::new(id), &req.name, &req.color)
        .await?;
    Ok(Json(LineResponse::from_details(&details)))
}

async fn delete_line(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    state.service.delete_line(LineId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Insert a segment; responds with the whole line in path order.
async fn add_section(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<SectionRequest>,
) -> Result<(StatusCode, Json<LineResponse>), AppError> {
    let added = state
        .service
        .add_segment(
            LineId::new(id),
            req.up_station_id,
            req.down_station_id,
            req.distance,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(LineResponse::from_details(&added.line)),
    ))
}

async fn remove_station(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<RemoveStationQuery>,
) -> Result<StatusCode, AppError> {
    state
        .service
        .remove_station(LineId::new(id), query.station_id)
        .await?;
    Ok(StatusCode::OK)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<StationError> for AppError {
    fn from(e: StationError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<LineError> for AppError {
    fn from(e: LineError) -> Self {
        match e {
            LineError::Path(PathError::InconsistentPath(_)) => AppError::Internal {
                message: e.to_string(),
            },
            _ => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => {
                warn!(error = %message, "rejected request");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Internal { message } => {
                error!(error = %message, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let body = Json(ErrorResponse {
            error_message: message,
        });
        (status, body).into_response()
    }
}
