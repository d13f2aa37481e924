//! Application state for the web layer.

use crate::lines::LineService;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Line and station operations
    pub service: LineService,
}

impl AppState {
    /// Create a new app state.
    pub fn new(service: LineService) -> Self {
        Self { service }
    }
}
