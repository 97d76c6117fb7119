//! Scalar constructors: fixed-width and length-prefixed primitives.

use amqp_buffers::{BufferError, ChunkedCursor};
use uuid::Uuid;

use crate::error::{rewind, DecodeError, Halt, OrHalt};
use crate::registry::Width;
use crate::value::Symbol;
use crate::AmqpValue;

#[inline]
fn fixed<T>(
    cursor: &mut ChunkedCursor,
    what: &str,
    read: fn(&mut ChunkedCursor) -> Result<T, BufferError>,
) -> Result<T, Halt> {
    read(cursor).or_halt(cursor, what)
}

pub(crate) fn boolean(cursor: &mut ChunkedCursor) -> Result<AmqpValue, Halt> {
    let at = cursor.position();
    match fixed(cursor, "boolean", ChunkedCursor::u8)? {
        0x00 => Ok(AmqpValue::Boolean(false)),
        0x01 => Ok(AmqpValue::Boolean(true)),
        other => {
            Err(DecodeError::malformed(format!("invalid boolean byte 0x{other:02x}"), at).into())
        }
    }
}

pub(crate) fn ubyte(cursor: &mut ChunkedCursor) -> Result<AmqpValue, Halt> {
    fixed(cursor, "ubyte", ChunkedCursor::u8).map(AmqpValue::Ubyte)
}

pub(crate) fn ushort(cursor: &mut ChunkedCursor) -> Result<AmqpValue, Halt> {
    fixed(cursor, "ushort", ChunkedCursor::u16).map(AmqpValue::Ushort)
}

pub(crate) fn uint(cursor: &mut ChunkedCursor) -> Result<AmqpValue, Halt> {
    fixed(cursor, "uint", ChunkedCursor::u32).map(AmqpValue::Uint)
}

pub(crate) fn small_uint(cursor: &mut ChunkedCursor) -> Result<AmqpValue, Halt> {
    fixed(cursor, "smalluint", ChunkedCursor::u8).map(|v| AmqpValue::Uint(v as u32))
}

pub(crate) fn ulong(cursor: &mut ChunkedCursor) -> Result<AmqpValue, Halt> {
    fixed(cursor, "ulong", ChunkedCursor::u64).map(AmqpValue::Ulong)
}

pub(crate) fn small_ulong(cursor: &mut ChunkedCursor) -> Result<AmqpValue, Halt> {
    fixed(cursor, "smallulong", ChunkedCursor::u8).map(|v| AmqpValue::Ulong(v as u64))
}

pub(crate) fn byte(cursor: &mut ChunkedCursor) -> Result<AmqpValue, Halt> {
    fixed(cursor, "byte", ChunkedCursor::i8).map(AmqpValue::Byte)
}

pub(crate) fn short(cursor: &mut ChunkedCursor) -> Result<AmqpValue, Halt> {
    fixed(cursor, "short", ChunkedCursor::i16).map(AmqpValue::Short)
}

pub(crate) fn int(cursor: &mut ChunkedCursor) -> Result<AmqpValue, Halt> {
    fixed(cursor, "int", ChunkedCursor::i32).map(AmqpValue::Int)
}

pub(crate) fn small_int(cursor: &mut ChunkedCursor) -> Result<AmqpValue, Halt> {
    fixed(cursor, "smallint", ChunkedCursor::i8).map(|v| AmqpValue::Int(v as i32))
}

pub(crate) fn long(cursor: &mut ChunkedCursor) -> Result<AmqpValue, Halt> {
    fixed(cursor, "long", ChunkedCursor::i64).map(AmqpValue::Long)
}

pub(crate) fn small_long(cursor: &mut ChunkedCursor) -> Result<AmqpValue, Halt> {
    fixed(cursor, "smalllong", ChunkedCursor::i8).map(|v| AmqpValue::Long(v as i64))
}

pub(crate) fn float(cursor: &mut ChunkedCursor) -> Result<AmqpValue, Halt> {
    fixed(cursor, "float", ChunkedCursor::f32).map(AmqpValue::Float)
}

pub(crate) fn double(cursor: &mut ChunkedCursor) -> Result<AmqpValue, Halt> {
    fixed(cursor, "double", ChunkedCursor::f64).map(AmqpValue::Double)
}

pub(crate) fn decimal32(cursor: &mut ChunkedCursor) -> Result<AmqpValue, Halt> {
    fixed(cursor, "decimal32", ChunkedCursor::u32).map(AmqpValue::Decimal32)
}

pub(crate) fn decimal64(cursor: &mut ChunkedCursor) -> Result<AmqpValue, Halt> {
    fixed(cursor, "decimal64", ChunkedCursor::u64).map(AmqpValue::Decimal64)
}

pub(crate) fn decimal128(cursor: &mut ChunkedCursor) -> Result<AmqpValue, Halt> {
    fixed(cursor, "decimal128", ChunkedCursor::array::<16>)
        .map(|raw| AmqpValue::Decimal128(u128::from_be_bytes(raw)))
}

pub(crate) fn character(cursor: &mut ChunkedCursor) -> Result<AmqpValue, Halt> {
    let at = cursor.position();
    let raw = fixed(cursor, "char", ChunkedCursor::u32)?;
    char::from_u32(raw).map(AmqpValue::Char).ok_or_else(|| {
        DecodeError::malformed(format!("invalid UTF-32 code point 0x{raw:08x}"), at).into()
    })
}

pub(crate) fn timestamp(cursor: &mut ChunkedCursor) -> Result<AmqpValue, Halt> {
    fixed(cursor, "timestamp", ChunkedCursor::i64).map(AmqpValue::Timestamp)
}

pub(crate) fn uuid(cursor: &mut ChunkedCursor) -> Result<AmqpValue, Halt> {
    fixed(cursor, "uuid", ChunkedCursor::array::<16>)
        .map(|raw| AmqpValue::Uuid(Uuid::from_bytes(raw)))
}

/// Reads a 1- or 4-byte unsigned length, size or count field.
pub(crate) fn read_width(
    cursor: &mut ChunkedCursor,
    width: Width,
    what: &str,
) -> Result<usize, Halt> {
    match width {
        Width::One => cursor.u8().map(usize::from).or_halt(cursor, what),
        Width::Four => cursor.u32().map(|v| v as usize).or_halt(cursor, what),
    }
}

/// Reads a length prefix and its payload. Both must be available, otherwise
/// nothing is consumed.
fn length_prefixed(
    cursor: &mut ChunkedCursor,
    width: Width,
    what: &str,
) -> Result<bytes::Bytes, Halt> {
    let mark = cursor.mark();
    let len = read_width(cursor, width, what)?;
    match cursor.bytes(len).or_halt(cursor, what) {
        Ok(payload) => Ok(payload),
        Err(halt) => {
            rewind(cursor, mark);
            Err(halt)
        }
    }
}

pub(crate) fn binary(cursor: &mut ChunkedCursor, width: Width) -> Result<AmqpValue, Halt> {
    length_prefixed(cursor, width, "binary").map(AmqpValue::Binary)
}

pub(crate) fn string(cursor: &mut ChunkedCursor, width: Width) -> Result<AmqpValue, Halt> {
    let at = cursor.position() + width.bytes();
    let payload = length_prefixed(cursor, width, "string")?;
    match std::str::from_utf8(&payload) {
        Ok(s) => Ok(AmqpValue::String(s.to_owned())),
        Err(err) => {
            Err(DecodeError::malformed(format!("invalid UTF-8 in string: {err}"), at).into())
        }
    }
}

pub(crate) fn symbol(cursor: &mut ChunkedCursor, width: Width) -> Result<AmqpValue, Halt> {
    let at = cursor.position() + width.bytes();
    let payload = length_prefixed(cursor, width, "symbol")?;
    if !payload.is_ascii() {
        return Err(DecodeError::malformed("symbol contains non-ASCII bytes", at).into());
    }
    // ASCII is valid UTF-8.
    let text = String::from_utf8_lossy(&payload).into_owned();
    Ok(AmqpValue::Symbol(Symbol::new(text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(bytes: &[u8]) -> ChunkedCursor {
        let mut cursor = ChunkedCursor::new();
        cursor.push(bytes.to_vec());
        cursor
    }

    #[test]
    fn fixed_width_needs_all_bytes() {
        let mut cursor = open(&[0x7f, 0xff, 0xff, 0xff]);
        assert!(matches!(long(&mut cursor), Err(Halt::NeedMoreData)));
        assert_eq!(cursor.position(), 0);
        cursor.push(vec![0xff, 0xff, 0xff, 0xff]);
        assert_eq!(long(&mut cursor).unwrap(), AmqpValue::Long(i64::MAX));
    }

    #[test]
    fn boolean_rejects_other_bytes() {
        let mut cursor = open(&[0x02]);
        assert!(matches!(
            boolean(&mut cursor),
            Err(Halt::Failed(DecodeError::Malformed { offset: 0, .. }))
        ));
    }

    #[test]
    fn small_encodings_widen() {
        assert_eq!(small_uint(&mut open(&[0xff])).unwrap(), AmqpValue::Uint(255));
        assert_eq!(small_int(&mut open(&[0xff])).unwrap(), AmqpValue::Int(-1));
        assert_eq!(small_long(&mut open(&[0x80])).unwrap(), AmqpValue::Long(-128));
        assert_eq!(small_ulong(&mut open(&[0x07])).unwrap(), AmqpValue::Ulong(7));
    }

    #[test]
    fn char_rejects_surrogates() {
        let mut cursor = open(&[0x00, 0x00, 0xd8, 0x00]);
        assert!(matches!(character(&mut cursor), Err(Halt::Failed(_))));
        let mut cursor = open(&[0x00, 0x01, 0xf6, 0x00]);
        assert_eq!(character(&mut cursor).unwrap(), AmqpValue::Char('\u{1f600}'));
    }

    #[test]
    fn length_prefixed_is_all_or_nothing() {
        let mut cursor = open(&[0x03, b'a', b'b']);
        assert!(matches!(
            string(&mut cursor, Width::One),
            Err(Halt::NeedMoreData)
        ));
        assert_eq!(cursor.position(), 0);
        cursor.push(vec![b'c']);
        assert_eq!(
            string(&mut cursor, Width::One).unwrap(),
            AmqpValue::String("abc".into())
        );
    }

    #[test]
    fn string_rejects_invalid_utf8() {
        let mut cursor = open(&[0x00, 0x00, 0x00, 0x02, 0xc3, 0x28]);
        match string(&mut cursor, Width::Four) {
            Err(Halt::Failed(DecodeError::Malformed { offset, .. })) => assert_eq!(offset, 4),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn symbol_must_be_ascii() {
        let mut cursor = open(&[0x02, 0xc3, 0xa9]);
        assert!(matches!(symbol(&mut cursor, Width::One), Err(Halt::Failed(_))));
        let mut cursor = open(&[0x04, b'a', b'm', b'q', b'p']);
        assert_eq!(
            symbol(&mut cursor, Width::One).unwrap(),
            AmqpValue::Symbol(Symbol::from("amqp"))
        );
    }

    #[test]
    fn empty_binary() {
        let mut cursor = open(&[0x00]);
        assert_eq!(
            binary(&mut cursor, Width::One).unwrap(),
            AmqpValue::Binary(bytes::Bytes::new())
        );
    }
}
