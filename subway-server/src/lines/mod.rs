//! Line storage and application service.
//!
//! The repository keeps each line behind its own lock so that structural
//! edits to one line are applied one at a time, while different lines
//! never contend. The service resolves station ids, forwards edits to the
//! line's segment path and renders the result.

mod error;
mod repository;
mod service;

pub use error::LineError;
pub use repository::LineRepository;
pub use service::{LineDetails, LineService, NewLine, SegmentAdded};
