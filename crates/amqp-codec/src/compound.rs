//! List, map and array constructors.
//!
//! All three share a frame: a size field counting every byte after itself,
//! then a count field of the same width. The whole declared span must be
//! buffered before any element is decoded; elements are then read from a
//! finished sub-cursor over exactly that span, so an element overrunning the
//! span or bytes left over after the declared count are framing errors.

use amqp_buffers::ChunkedCursor;

use crate::constants::TypeCode;
use crate::error::{rewind, DecodeError, Halt, OrHalt};
use crate::handler::{Budget, ValueHandler};
use crate::primitive::read_width;
use crate::registry::{Constructor, Width};
use crate::value::AmqpArray;
use crate::AmqpValue;

/// Reads size and count and splits off the declared span.
fn frame(
    cursor: &mut ChunkedCursor,
    width: Width,
    what: &str,
) -> Result<(ChunkedCursor, usize), Halt> {
    let mark = cursor.mark();
    let size = read_width(cursor, width, what)?;
    if size < width.bytes() {
        return Err(DecodeError::malformed(
            format!("{what} size {size} is smaller than its count field"),
            mark.position(),
        )
        .into());
    }
    let mut body = match cursor.take(size).or_halt(cursor, what) {
        Ok(body) => body,
        Err(halt) => {
            rewind(cursor, mark);
            return Err(halt);
        }
    };
    let count = read_width(&mut body, width, what)?;
    Ok((body, count))
}

/// Fails when elements did not consume the declared span exactly.
fn expect_consumed(body: &ChunkedCursor, what: &str) -> Result<(), Halt> {
    if body.remaining() != 0 {
        return Err(DecodeError::malformed(
            format!(
                "{what} declared size exceeds its elements by {} bytes",
                body.remaining()
            ),
            body.position(),
        )
        .into());
    }
    Ok(())
}

pub(crate) fn list(
    handler: &ValueHandler<'_>,
    cursor: &mut ChunkedCursor,
    width: Width,
    depth: usize,
    budget: &mut Budget,
) -> Result<AmqpValue, Halt> {
    let (mut body, count) = frame(cursor, width, "list")?;
    let mut items = Vec::with_capacity(count.min(body.remaining()));
    for _ in 0..count {
        items.push(handler.read_value(&mut body, depth + 1, budget)?);
    }
    expect_consumed(&body, "list")?;
    Ok(AmqpValue::List(items))
}

pub(crate) fn map(
    handler: &ValueHandler<'_>,
    cursor: &mut ChunkedCursor,
    width: Width,
    depth: usize,
    budget: &mut Budget,
) -> Result<AmqpValue, Halt> {
    let at = cursor.position();
    let (mut body, count) = frame(cursor, width, "map")?;
    if count % 2 != 0 {
        return Err(DecodeError::malformed(
            format!("map has an odd number of elements ({count})"),
            at,
        )
        .into());
    }
    let mut pairs = Vec::with_capacity((count / 2).min(body.remaining()));
    for _ in 0..count / 2 {
        let key = handler.read_value(&mut body, depth + 1, budget)?;
        let value = handler.read_value(&mut body, depth + 1, budget)?;
        pairs.push((key, value));
    }
    expect_consumed(&body, "map")?;
    Ok(AmqpValue::Map(pairs))
}

pub(crate) fn array(
    handler: &ValueHandler<'_>,
    cursor: &mut ChunkedCursor,
    width: Width,
    depth: usize,
    budget: &mut Budget,
) -> Result<AmqpValue, Halt> {
    let at = cursor.position();
    let (mut body, count) = frame(cursor, width, "array")?;
    let (descriptor, ctor) = element_constructor(handler, &mut body, depth, budget)?;
    if count > 0 {
        // Elements carry no type code, so they never pass through `read_value`.
        handler.check_depth(depth + 1, body.position())?;
    }

    let capacity = if ctor.is_zero_width() {
        budget.spend_zero_width(count, at)?;
        count
    } else {
        count.min(body.remaining())
    };

    let mut items = Vec::with_capacity(capacity);
    for _ in 0..count {
        items.push(ctor.decode(handler, &mut body, depth + 1, budget)?);
    }
    expect_consumed(&body, "array")?;
    Ok(AmqpValue::Array(AmqpArray {
        descriptor,
        element_type: ctor.amqp_type(),
        items,
    }))
}

/// Reads the single constructor shared by all array elements, optionally
/// preceded by a descriptor.
fn element_constructor(
    handler: &ValueHandler<'_>,
    body: &mut ChunkedCursor,
    depth: usize,
    budget: &mut Budget,
) -> Result<(Option<Box<AmqpValue>>, Constructor), Halt> {
    let mut at = body.position();
    let mut code = body.u8().or_halt(body, "array element constructor")?;
    let mut descriptor = None;
    if code == TypeCode::DESCRIBED {
        descriptor = Some(Box::new(handler.read_value(body, depth + 1, budget)?));
        at = body.position();
        code = body.u8().or_halt(body, "array element constructor")?;
    }
    let ctor = handler.registry().resolve(code, at)?;
    if ctor == Constructor::Described {
        return Err(
            DecodeError::malformed("nested described array element constructor", at).into(),
        );
    }
    Ok((descriptor, ctor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AmqpType;

    fn decode(bytes: &[u8]) -> Result<Option<AmqpValue>, DecodeError> {
        let mut cursor = ChunkedCursor::from_slice(bytes);
        ValueHandler::new().decode(&mut cursor)
    }

    #[test]
    fn list8_of_mixed_types() {
        let bytes = [0xc0, 0x05, 0x02, 0x41, 0xa1, 0x01, b'x'];
        assert_eq!(
            decode(&bytes).unwrap(),
            Some(AmqpValue::List(vec![
                AmqpValue::Boolean(true),
                AmqpValue::String("x".into())
            ]))
        );
    }

    #[test]
    fn list_size_smaller_than_count_field() {
        let err = decode(&[0xd0, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00]).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { offset: 1, .. }));
    }

    #[test]
    fn list_with_trailing_bytes_in_span() {
        // size 3 covers count + one element + one stray byte.
        let err = decode(&[0xc0, 0x03, 0x01, 0x40, 0x40]).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { offset: 4, .. }));
    }

    #[test]
    fn list_element_overrunning_span() {
        // size 2 covers count + the code of a uint whose payload lies outside.
        let err = decode(&[0xc0, 0x02, 0x01, 0x70, 0x00, 0x00, 0x00, 0x01]).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { .. }));
    }

    #[test]
    fn map_with_odd_count() {
        let err = decode(&[0xc1, 0x02, 0x01, 0x40]).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { offset: 1, .. }));
    }

    #[test]
    fn map_keeps_duplicate_keys() {
        let bytes = [0xc1, 0x07, 0x04, 0x53, 0x01, 0x41, 0x53, 0x01, 0x42];
        assert_eq!(
            decode(&bytes).unwrap(),
            Some(AmqpValue::Map(vec![
                (AmqpValue::Ulong(1), AmqpValue::Boolean(true)),
                (AmqpValue::Ulong(1), AmqpValue::Boolean(false)),
            ]))
        );
    }

    #[test]
    fn array_of_small_uints() {
        let bytes = [0xe0, 0x05, 0x03, 0x52, 0x01, 0x02, 0x03];
        assert_eq!(
            decode(&bytes).unwrap(),
            Some(AmqpValue::Array(AmqpArray::new(
                AmqpType::Uint,
                vec![AmqpValue::Uint(1), AmqpValue::Uint(2), AmqpValue::Uint(3)]
            )))
        );
    }

    #[test]
    fn array_with_described_element_constructor() {
        let bytes = [0xe0, 0x06, 0x02, 0x00, 0x53, 0x07, 0x50, 0x0a, 0x0b];
        // size 6 leaves the last element outside the span.
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { .. }));

        let bytes = [0xe0, 0x07, 0x02, 0x00, 0x53, 0x07, 0x50, 0x0a, 0x0b];
        assert_eq!(
            decode(&bytes).unwrap(),
            Some(AmqpValue::Array(AmqpArray::described(
                AmqpValue::Ulong(7),
                AmqpType::Ubyte,
                vec![AmqpValue::Ubyte(10), AmqpValue::Ubyte(11)]
            )))
        );
    }

    #[test]
    fn array_rejects_nested_described_constructor() {
        let bytes = [0xe0, 0x05, 0x01, 0x00, 0x40, 0x00, 0x40];
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { offset: 5, .. }));
    }

    #[test]
    fn zero_width_array_limit() {
        let bytes = [0xf0, 0x00, 0x00, 0x00, 0x05, 0x00, 0x00, 0x01, 0x00, 0x40];
        let config = crate::DecoderConfig::default().with_max_array_len(10);
        let handler = ValueHandler::with_config(config);
        let mut cursor = ChunkedCursor::from_slice(&bytes);
        assert!(handler.decode(&mut cursor).is_err());

        let bytes = [0xe0, 0x02, 0x03, 0x40];
        assert_eq!(
            decode(&bytes).unwrap(),
            Some(AmqpValue::Array(AmqpArray::new(
                AmqpType::Null,
                vec![AmqpValue::Null; 3]
            )))
        );
    }

    #[test]
    fn zero_width_limit_spans_nested_arrays() {
        // array8 of three array8s, each holding 200 nulls.
        let bytes = [
            0xe0, 0x0b, 0x03, 0xe0, 0x02, 0xc8, 0x40, 0x02, 0xc8, 0x40, 0x02, 0xc8, 0x40,
        ];
        let config = crate::DecoderConfig::default();
        let tight = ValueHandler::with_config(config.with_max_array_len(500));
        let err = tight.decode_slice(&bytes).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { offset: 10, .. }), "{err}");

        let roomy = ValueHandler::with_config(config.with_max_array_len(600));
        let inner = AmqpValue::Array(AmqpArray::new(AmqpType::Null, vec![AmqpValue::Null; 200]));
        assert_eq!(
            roomy.decode_slice(&bytes),
            Ok(AmqpValue::Array(AmqpArray::new(AmqpType::Array, vec![inner; 3])))
        );
    }

    #[test]
    fn array_elements_count_towards_depth() {
        // array8 holding one array8 holding one empty list.
        let bytes = [0xe0, 0x05, 0x01, 0xe0, 0x02, 0x01, 0x45];
        let config = crate::DecoderConfig::default();
        let shallow = ValueHandler::with_config(config.with_max_depth(1));
        let err = shallow.decode_slice(&bytes).unwrap_err();
        assert_eq!(err, DecodeError::DepthExceeded { limit: 1, offset: 7 });

        let deep = ValueHandler::with_config(config.with_max_depth(2));
        assert!(deep.decode_slice(&bytes).is_ok());
    }

    #[test]
    fn compound_waits_for_whole_span() {
        let mut cursor = ChunkedCursor::new();
        cursor.push(vec![0xc0, 0x03, 0x02, 0x41]);
        let handler = ValueHandler::new();
        assert_eq!(handler.decode(&mut cursor), Ok(None));
        assert_eq!(cursor.position(), 0);
        cursor.push(vec![0x42]);
        assert_eq!(
            handler.decode(&mut cursor),
            Ok(Some(AmqpValue::List(vec![
                AmqpValue::Boolean(true),
                AmqpValue::Boolean(false)
            ])))
        );
    }
}
