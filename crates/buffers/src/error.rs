use thiserror::Error;

/// Errors raised by [`crate::ChunkedCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("buffer underflow: needed {needed} bytes, {available} available")]
    Underflow { needed: usize, available: usize },
    #[error("mark refers to bytes that were already released")]
    StaleMark,
}
