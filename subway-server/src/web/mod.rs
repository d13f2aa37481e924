//! Web layer for the subway line service.
//!
//! Provides JSON endpoints for managing stations, lines and the segments
//! that make up each line.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
