//! Stream-level decoder: feed socket chunks, pull complete values.

use amqp_buffers::ChunkedCursor;
use bytes::Bytes;

use crate::{AmqpValue, DecodeError, DecoderConfig, ValueHandler};

/// Decodes a sequence of values from bytes arriving in arbitrary chunks.
///
/// ```
/// use amqp_codec::{AmqpValue, StreamingDecoder};
///
/// let mut decoder = StreamingDecoder::new();
/// decoder.push(vec![0xa1, 0x02, b'o']);
/// assert_eq!(decoder.next_value(), Ok(None));
/// decoder.push(vec![b'k', 0x41]);
/// assert_eq!(decoder.next_value(), Ok(Some(AmqpValue::String("ok".into()))));
/// assert_eq!(decoder.next_value(), Ok(Some(AmqpValue::Boolean(true))));
/// assert_eq!(decoder.next_value(), Ok(None));
/// ```
pub struct StreamingDecoder {
    cursor: ChunkedCursor,
    handler: ValueHandler<'static>,
}

impl Default for StreamingDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingDecoder {
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            cursor: ChunkedCursor::new(),
            handler: ValueHandler::with_config(config),
        }
    }

    /// Appends a chunk of received bytes.
    pub fn push(&mut self, chunk: impl Into<Bytes>) {
        self.cursor.push(chunk);
    }

    /// Marks the end of the stream. Values cut short by it become errors.
    pub fn finish(&mut self) {
        self.cursor.finish();
    }

    /// Bytes buffered but not yet decoded.
    pub fn buffered(&self) -> usize {
        self.cursor.remaining()
    }

    /// Absolute stream offset of the next undecoded byte.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Decodes the next complete value.
    ///
    /// `Ok(None)` means more bytes are needed, or that a finished stream has
    /// been fully consumed. Errors are permanent for this stream.
    pub fn next_value(&mut self) -> Result<Option<AmqpValue>, DecodeError> {
        if self.cursor.is_finished() && self.cursor.remaining() == 0 {
            return Ok(None);
        }
        let value = self.handler.decode(&mut self.cursor)?;
        if value.is_some() {
            self.cursor.release();
        }
        Ok(value)
    }
}
