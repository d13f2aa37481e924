//! Domain types for the subway line service.
//!
//! This module contains the validated value types and the segment path
//! engine. All types enforce their invariants at construction time, so
//! code that receives these types can trust their validity. Nothing here
//! performs I/O.

mod distance;
mod error;
mod line;
mod path;
mod segment;
mod station;

pub use distance::{Distance, InvalidDistance};
pub use error::PathError;
pub use line::{InvalidLine, Line, LineId};
pub use path::{Path, Removal, Stations};
pub use segment::{InvalidSegment, Segment};
pub use station::{InvalidStationName, Station, StationId};
