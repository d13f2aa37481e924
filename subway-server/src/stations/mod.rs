//! Station registry.
//!
//! Issues station identities and resolves them back to named stations.
//! The segment path engine only ever sees the ids handed out here.

mod error;
mod registry;

pub use error::StationError;
pub use registry::StationRegistry;
