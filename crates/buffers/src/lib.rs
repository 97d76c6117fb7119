//! amqp-buffers - byte plumbing for the AMQP 1.0 codec.
//!
//! [`ChunkedCursor`] reads across the non-contiguous chunks a socket delivers,
//! and [`Writer`] produces big-endian output for the encoder.

mod chunked_cursor;
mod error;
mod writer;

pub use chunked_cursor::{ChunkedCursor, Mark};
pub use error::BufferError;
pub use writer::Writer;
