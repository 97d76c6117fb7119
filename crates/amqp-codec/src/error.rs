use amqp_buffers::{BufferError, ChunkedCursor, Mark};
use thiserror::Error;

use crate::AmqpType;

/// Permanent decode failures. The input is a protocol violation and the
/// connection that produced it should be closed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("decode error at offset {offset}: {reason}")]
    Malformed { reason: String, offset: usize },
    #[error("unknown type code 0x{code:02x} at offset {offset}")]
    UnknownType { code: u8, offset: usize },
    #[error("nesting depth exceeds limit of {limit} at offset {offset}")]
    DepthExceeded { limit: usize, offset: usize },
}

impl DecodeError {
    pub(crate) fn malformed(reason: impl Into<String>, offset: usize) -> Self {
        DecodeError::Malformed {
            reason: reason.into(),
            offset,
        }
    }

    /// Absolute stream offset at which the failure was detected.
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::Malformed { offset, .. }
            | DecodeError::UnknownType { offset, .. }
            | DecodeError::DepthExceeded { offset, .. } => *offset,
        }
    }
}

/// Values the encoder cannot represent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("{what} of {len} exceeds the 32-bit wire limit")]
    TooLarge { what: &'static str, len: usize },
    #[error("array element {index} is {found}, expected {expected}")]
    ArrayElementMismatch {
        index: usize,
        expected: AmqpType,
        found: AmqpType,
    },
    #[error("arrays cannot hold {0} elements")]
    InvalidArrayElement(AmqpType),
    #[error("symbol is not ASCII: {0:?}")]
    InvalidSymbol(String),
}

/// Why a decode step stopped before producing a value.
#[derive(Debug)]
pub(crate) enum Halt {
    /// The input is a valid prefix; retry once more bytes arrive.
    NeedMoreData,
    Failed(DecodeError),
}

impl From<DecodeError> for Halt {
    fn from(err: DecodeError) -> Self {
        Halt::Failed(err)
    }
}

/// Returns `cursor` to `mark`, taken earlier on the same cursor with no
/// release in between.
pub(crate) fn rewind(cursor: &mut ChunkedCursor, mark: Mark) {
    let reset = cursor.reset(mark);
    debug_assert!(reset.is_ok(), "stale mark at {}", mark.position());
}

/// Classifies a cursor shortage: transient while the stream may still grow,
/// permanent once it is finished.
pub(crate) trait OrHalt<T> {
    fn or_halt(self, cursor: &ChunkedCursor, what: &str) -> Result<T, Halt>;
}

impl<T> OrHalt<T> for Result<T, BufferError> {
    fn or_halt(self, cursor: &ChunkedCursor, what: &str) -> Result<T, Halt> {
        self.map_err(|err| match err {
            BufferError::Underflow { .. } if !cursor.is_finished() => Halt::NeedMoreData,
            BufferError::Underflow { needed, available } => Halt::Failed(DecodeError::malformed(
                format!(
                    "cannot construct {what}: insufficient input data \
                     (needed {needed}, available {available})"
                ),
                cursor.position(),
            )),
            BufferError::StaleMark => Halt::Failed(DecodeError::malformed(
                format!("cannot construct {what}: cursor mark released"),
                cursor.position(),
            )),
        })
    }
}
