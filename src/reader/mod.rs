//! Input reading
//!
//! - BoundaryTracker: finds where complete markup ends in a partial buffer
//! - StreamingReader: chunked reads from any `Read`, scanned prefix by prefix

pub mod boundary;
pub mod streaming;

pub use streaming::{StreamingReader, DEFAULT_CHUNK_SIZE};
