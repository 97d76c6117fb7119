//! Decode driver: reads a type code, resolves its constructor and runs it.

use amqp_buffers::ChunkedCursor;

use crate::error::{rewind, DecodeError, Halt, OrHalt};
use crate::{AmqpValue, DecoderConfig, TypeRegistry};

/// Entry point for decoding values from a [`ChunkedCursor`].
///
/// A handler borrows a [`TypeRegistry`] and carries the decoder limits. It
/// holds no per-stream state and is cheap to copy, so one handler can serve
/// any number of streams.
///
/// ```
/// use amqp_buffers::ChunkedCursor;
/// use amqp_codec::{AmqpValue, ValueHandler};
///
/// let handler = ValueHandler::new();
/// let mut cursor = ChunkedCursor::new();
/// cursor.push(vec![0x81, 0x7f, 0xff, 0xff, 0xff]);
/// assert_eq!(handler.decode(&mut cursor), Ok(None));
///
/// cursor.push(vec![0xff, 0xff, 0xff, 0xff]);
/// assert_eq!(handler.decode(&mut cursor), Ok(Some(AmqpValue::Long(i64::MAX))));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ValueHandler<'r> {
    registry: &'r TypeRegistry,
    config: DecoderConfig,
}

impl Default for ValueHandler<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueHandler<'static> {
    /// Handler over the global registry with default limits.
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self::with_registry(TypeRegistry::global(), config)
    }
}

impl<'r> ValueHandler<'r> {
    pub fn with_registry(registry: &'r TypeRegistry, config: DecoderConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Decodes one value starting at the cursor position.
    ///
    /// Returns `Ok(None)` when the buffered bytes are a valid but incomplete
    /// prefix and the cursor is not finished. The cursor is then left where it
    /// was, so the call can be repeated after pushing more bytes. On `Err` the
    /// cursor is also left unmoved.
    pub fn decode(&self, cursor: &mut ChunkedCursor) -> Result<Option<AmqpValue>, DecodeError> {
        let mark = cursor.mark();
        let mut budget = Budget::new(&self.config);
        match self.read_value(cursor, 0, &mut budget) {
            Ok(value) => Ok(Some(value)),
            Err(Halt::NeedMoreData) => {
                rewind(cursor, mark);
                tracing::trace!(
                    position = mark.position(),
                    buffered = cursor.remaining(),
                    "need more data"
                );
                Ok(None)
            }
            Err(Halt::Failed(err)) => {
                rewind(cursor, mark);
                tracing::debug!(error = %err, "decode failed");
                Err(err)
            }
        }
    }

    /// Decodes a complete encoding held in one slice. Missing or trailing
    /// bytes are errors.
    pub fn decode_slice(&self, bytes: &[u8]) -> Result<AmqpValue, DecodeError> {
        let mut cursor = ChunkedCursor::from_slice(bytes);
        let value = self.decode(&mut cursor)?.ok_or_else(|| {
            DecodeError::malformed("incomplete value", cursor.position())
        })?;
        if cursor.remaining() != 0 {
            return Err(DecodeError::malformed(
                format!("{} trailing bytes after value", cursor.remaining()),
                cursor.position(),
            ));
        }
        Ok(value)
    }

    /// Reads a type code and the value it introduces. `depth` counts the
    /// compound and described values enclosing this one.
    pub(crate) fn read_value(
        &self,
        cursor: &mut ChunkedCursor,
        depth: usize,
        budget: &mut Budget,
    ) -> Result<AmqpValue, Halt> {
        self.check_depth(depth, cursor.position())?;
        let at = cursor.position();
        let code = cursor.u8().or_halt(cursor, "type code")?;
        let ctor = self.registry.resolve(code, at)?;
        ctor.decode(self, cursor, depth, budget)
    }

    /// Fails when a value at `depth` would exceed `max_depth`.
    pub(crate) fn check_depth(&self, depth: usize, offset: usize) -> Result<(), Halt> {
        if depth > self.config.max_depth {
            return Err(DecodeError::DepthExceeded {
                limit: self.config.max_depth,
                offset,
            }
            .into());
        }
        Ok(())
    }
}

/// Work allowance shared by every value produced in one `decode` call.
///
/// Zero-width array elements cost no input bytes, so the total across all
/// arrays in the value, nested or sibling, is capped by `max_array_len`.
#[derive(Debug)]
pub(crate) struct Budget {
    limit: usize,
    zero_width_left: usize,
}

impl Budget {
    pub(crate) fn new(config: &DecoderConfig) -> Self {
        Self {
            limit: config.max_array_len,
            zero_width_left: config.max_array_len,
        }
    }

    /// Charges `count` zero-width elements of an array starting at `offset`.
    pub(crate) fn spend_zero_width(&mut self, count: usize, offset: usize) -> Result<(), Halt> {
        match self.zero_width_left.checked_sub(count) {
            Some(left) => {
                self.zero_width_left = left;
                Ok(())
            }
            None => Err(DecodeError::malformed(
                format!(
                    "{count} more zero-width array elements exceed the limit of {} per value",
                    self.limit
                ),
                offset,
            )
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested_lists(levels: usize) -> Vec<u8> {
        // Each level is list8 with one element; innermost element is null.
        let mut bytes = vec![0x40];
        for _ in 0..levels {
            let mut outer = vec![0xc0, (bytes.len() + 1) as u8, 0x01];
            outer.extend_from_slice(&bytes);
            bytes = outer;
        }
        bytes
    }

    #[test]
    fn unknown_type_code() {
        let handler = ValueHandler::new();
        assert_eq!(
            handler.decode_slice(&[0x99]),
            Err(DecodeError::UnknownType { code: 0x99, offset: 0 })
        );
    }

    #[test]
    fn unknown_type_inside_list_reports_absolute_offset() {
        let handler = ValueHandler::new();
        assert_eq!(
            handler.decode_slice(&[0xc0, 0x03, 0x02, 0x40, 0x02]),
            Err(DecodeError::UnknownType { code: 0x02, offset: 4 })
        );
    }

    #[test]
    fn empty_cursor_needs_data() {
        let handler = ValueHandler::new();
        let mut cursor = ChunkedCursor::new();
        assert_eq!(handler.decode(&mut cursor), Ok(None));
        cursor.finish();
        assert!(handler.decode(&mut cursor).is_err());
    }

    #[test]
    fn trailing_bytes_rejected_by_decode_slice() {
        let handler = ValueHandler::new();
        let err = handler.decode_slice(&[0x40, 0x40]).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { offset: 1, .. }));
    }

    #[test]
    fn failure_leaves_cursor_unmoved() {
        let handler = ValueHandler::new();
        let mut cursor = ChunkedCursor::new();
        cursor.push(vec![0xc0, 0x02, 0x01, 0xff]);
        assert!(handler.decode(&mut cursor).is_err());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn depth_limit() {
        let config = DecoderConfig::default().with_max_depth(3);
        let handler = ValueHandler::with_config(config);
        // Three lists around a null: the null sits at depth 3.
        assert!(handler.decode_slice(&nested_lists(3)).is_ok());
        assert!(matches!(
            handler.decode_slice(&nested_lists(4)),
            Err(DecodeError::DepthExceeded { limit: 3, offset: 12 })
        ));
    }

    #[test]
    fn budget_is_shared_across_arrays() {
        let mut budget = Budget::new(&DecoderConfig::default().with_max_array_len(5));
        assert!(budget.spend_zero_width(3, 0).is_ok());
        assert!(budget.spend_zero_width(2, 4).is_ok());
        assert!(matches!(
            budget.spend_zero_width(1, 9),
            Err(Halt::Failed(DecodeError::Malformed { offset: 9, .. }))
        ));
    }

    #[test]
    fn custom_registry() {
        let registry = TypeRegistry::new();
        let handler = ValueHandler::with_registry(&registry, DecoderConfig::default());
        assert_eq!(handler.decode_slice(&[0x43]), Ok(AmqpValue::Uint(0)));
        assert_eq!(handler.config().max_depth, DecoderConfig::DEFAULT_MAX_DEPTH);
    }
}
