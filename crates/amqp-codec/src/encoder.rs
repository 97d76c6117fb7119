//! `AmqpEncoder`: writes values using the smallest encoding that decodes back
//! to the same value.
//!
//! Compound sizes are prefixed, so a value is first measured into a [`Plan`]
//! tree holding every constructor and content length, then written in a
//! second pass that only reads the plan.

use amqp_buffers::Writer;

use crate::constants::TypeCode;
use crate::error::EncodeError;
use crate::registry::{Constructor, Width};
use crate::value::AmqpArray;
use crate::{AmqpType, AmqpValue};

pub struct AmqpEncoder {
    pub writer: Writer,
}

impl Default for AmqpEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl AmqpEncoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    pub fn encode(&mut self, value: &AmqpValue) -> Result<Vec<u8>, EncodeError> {
        self.writer.reset();
        match self.write_any(value) {
            Ok(()) => Ok(self.writer.flush()),
            Err(err) => {
                self.writer.reset();
                tracing::debug!(error = %err, "encode failed");
                Err(err)
            }
        }
    }

    /// Appends the encoding of `value`. On error the writer may hold a
    /// partial encoding; [`encode`](Self::encode) and [`encode_into`] discard
    /// it.
    pub fn write_any(&mut self, value: &AmqpValue) -> Result<(), EncodeError> {
        let plan = Plan::of(value)?;
        self.write_planned(value, &plan)
    }

    fn write_planned(&mut self, value: &AmqpValue, plan: &Plan) -> Result<(), EncodeError> {
        self.writer.u8(plan.ctor.code());
        self.write_payload(value, plan)
    }

    /// Writes the bytes following the type code of `plan.ctor`.
    fn write_payload(&mut self, value: &AmqpValue, plan: &Plan) -> Result<(), EncodeError> {
        let (ctor, content) = (plan.ctor, plan.content);
        match value {
            AmqpValue::Null => {}
            AmqpValue::Boolean(b) => {
                if ctor == Constructor::Boolean {
                    self.writer.u8(*b as u8);
                }
            }
            AmqpValue::Ubyte(v) => self.writer.u8(*v),
            AmqpValue::Ushort(v) => self.writer.u16(*v),
            AmqpValue::Uint(v) => match ctor {
                Constructor::Uint => self.writer.u32(*v),
                Constructor::SmallUint => self.writer.u8(*v as u8),
                _ => {}
            },
            AmqpValue::Ulong(v) => match ctor {
                Constructor::Ulong => self.writer.u64(*v),
                Constructor::SmallUlong => self.writer.u8(*v as u8),
                _ => {}
            },
            AmqpValue::Byte(v) => self.writer.i8(*v),
            AmqpValue::Short(v) => self.writer.i16(*v),
            AmqpValue::Int(v) => match ctor {
                Constructor::SmallInt => self.writer.i8(*v as i8),
                _ => self.writer.i32(*v),
            },
            AmqpValue::Long(v) => match ctor {
                Constructor::SmallLong => self.writer.i8(*v as i8),
                _ => self.writer.i64(*v),
            },
            AmqpValue::Float(v) => self.writer.f32(*v),
            AmqpValue::Double(v) => self.writer.f64(*v),
            AmqpValue::Decimal32(v) => self.writer.u32(*v),
            AmqpValue::Decimal64(v) => self.writer.u64(*v),
            AmqpValue::Decimal128(v) => self.writer.u128(*v),
            AmqpValue::Char(c) => self.writer.u32(*c as u32),
            AmqpValue::Timestamp(v) => self.writer.i64(*v),
            AmqpValue::Uuid(uuid) => self.writer.buf(uuid.as_bytes()),
            AmqpValue::Binary(data) => {
                self.write_len(ctor, data.len(), "binary")?;
                self.writer.buf(data);
            }
            AmqpValue::String(s) => {
                self.write_len(ctor, s.len(), "string")?;
                self.writer.utf8(s);
            }
            AmqpValue::Symbol(sym) => {
                self.write_len(ctor, sym.as_str().len(), "symbol")?;
                self.writer.buf(sym.as_str().as_bytes());
            }
            AmqpValue::List(items) => {
                if ctor == Constructor::List0 {
                    return Ok(());
                }
                self.write_frame(ctor, content, items.len(), "list")?;
                for (item, planned) in items.iter().zip(&plan.children) {
                    self.write_planned(item, planned)?;
                }
            }
            AmqpValue::Map(pairs) => {
                self.write_frame(ctor, content, pairs.len() * 2, "map")?;
                let entries = pairs.iter().flat_map(|(key, value)| [key, value]);
                for (entry, planned) in entries.zip(&plan.children) {
                    self.write_planned(entry, planned)?;
                }
            }
            AmqpValue::Array(array) => {
                self.write_frame(ctor, content, array.len(), "array")?;
                if let Some(layout) = &plan.array {
                    let described = array.descriptor.as_deref().zip(layout.descriptor.as_deref());
                    if let Some((descriptor, planned)) = described {
                        self.writer.u8(TypeCode::DESCRIBED);
                        self.write_planned(descriptor, planned)?;
                    }
                    self.writer.u8(layout.element.code());
                }
                for (item, planned) in array.items.iter().zip(&plan.children) {
                    self.write_payload(item, planned)?;
                }
            }
            AmqpValue::Described(described) => {
                let parts = [&described.descriptor, &described.body];
                for (part, planned) in parts.into_iter().zip(&plan.children) {
                    self.write_planned(part, planned)?;
                }
            }
        }
        Ok(())
    }

    /// Writes a size field (covering the count field and `content`) followed
    /// by the count field.
    fn write_frame(
        &mut self,
        ctor: Constructor,
        content: usize,
        count: usize,
        what: &'static str,
    ) -> Result<(), EncodeError> {
        let width = field_width(ctor);
        self.write_len(ctor, content + width.bytes(), what)?;
        self.write_len(ctor, count, what)
    }

    fn write_len(
        &mut self,
        ctor: Constructor,
        len: usize,
        what: &'static str,
    ) -> Result<(), EncodeError> {
        let too_large = || EncodeError::TooLarge { what, len };
        match field_width(ctor) {
            Width::One => self.writer.u8(u8::try_from(len).map_err(|_| too_large())?),
            Width::Four => self.writer.u32(u32::try_from(len).map_err(|_| too_large())?),
        }
        Ok(())
    }
}

/// Encodes a single value into a fresh buffer.
///
/// ```
/// use amqp_codec::{encode, AmqpValue};
///
/// assert_eq!(encode(&AmqpValue::Uint(7)).unwrap(), [0x52, 0x07]);
/// ```
pub fn encode(value: &AmqpValue) -> Result<Vec<u8>, EncodeError> {
    AmqpEncoder::new().encode(value)
}

/// Appends the encoding of `value` to `writer`. On error `writer` is left as
/// it was.
pub fn encode_into(writer: &mut Writer, value: &AmqpValue) -> Result<(), EncodeError> {
    let start = writer.len();
    let mut encoder = AmqpEncoder {
        writer: std::mem::take(writer),
    };
    let result = encoder.write_any(value);
    *writer = encoder.writer;
    if let Err(err) = &result {
        writer.truncate(start);
        tracing::debug!(error = %err, "encode failed");
    }
    result
}

/// Exact number of bytes [`encode`] produces for `value`.
pub fn encoded_size(value: &AmqpValue) -> Result<usize, EncodeError> {
    Plan::of(value).map(|plan| plan.size())
}

/// Constructor and content length of a value, and of everything nested in it.
#[derive(Debug)]
struct Plan {
    ctor: Constructor,
    /// Length of everything after the type code except size and count fields.
    content: usize,
    /// Nested values in wire order: list items, map keys and values, the
    /// descriptor then body of a described value, array items.
    children: Vec<Plan>,
    array: Option<ArrayLayout>,
}

/// What an array writes between its count field and its items.
#[derive(Debug)]
struct ArrayLayout {
    element: Constructor,
    descriptor: Option<Box<Plan>>,
}

impl Plan {
    fn of(value: &AmqpValue) -> Result<Self, EncodeError> {
        let children = match value {
            AmqpValue::List(items) => items.iter().map(Plan::of).collect::<Result<Vec<_>, _>>()?,
            AmqpValue::Map(pairs) => {
                let mut children = Vec::with_capacity(pairs.len() * 2);
                for (key, value) in pairs {
                    children.push(Plan::of(key)?);
                    children.push(Plan::of(value)?);
                }
                children
            }
            AmqpValue::Described(described) => {
                vec![Plan::of(&described.descriptor)?, Plan::of(&described.body)?]
            }
            AmqpValue::Array(array) => return Plan::of_array(array),
            _ => Vec::new(),
        };
        let content = match value {
            AmqpValue::Binary(data) => data.len(),
            AmqpValue::String(s) => s.len(),
            AmqpValue::Symbol(sym) => sym.as_str().len(),
            _ => children.iter().map(Plan::size).sum(),
        };
        Ok(Self {
            ctor: constructor(value, content)?,
            content,
            children,
            array: None,
        })
    }

    fn of_array(array: &AmqpArray) -> Result<Self, EncodeError> {
        let expected = array.element_type;
        if expected == AmqpType::Described {
            return Err(EncodeError::InvalidArrayElement(expected));
        }
        let mut children = Vec::with_capacity(array.len());
        for (index, item) in array.items.iter().enumerate() {
            let found = item.amqp_type();
            if found != expected {
                return Err(EncodeError::ArrayElementMismatch {
                    index,
                    expected,
                    found,
                });
            }
            children.push(Plan::of(item)?);
        }
        let element = element_constructor(array, &children)?;
        let descriptor = match &array.descriptor {
            Some(descriptor) => Some(Box::new(Plan::of(descriptor)?)),
            None => None,
        };

        let mut content = 1 + descriptor.as_ref().map_or(0, |planned| 1 + planned.size());
        for item in &mut children {
            item.ctor = element;
            content += payload_len(element, item.content);
        }
        Ok(Self {
            ctor: Constructor::Array(frame_width(content, array.len(), "array")?),
            content,
            children,
            array: Some(ArrayLayout {
                element,
                descriptor,
            }),
        })
    }

    /// Encoded length including the type code.
    fn size(&self) -> usize {
        1 + payload_len(self.ctor, self.content)
    }
}

/// The smallest constructor for `value` given its content length. Arrays are
/// planned by [`Plan::of_array`].
fn constructor(value: &AmqpValue, content: usize) -> Result<Constructor, EncodeError> {
    Ok(match value {
        AmqpValue::Null => Constructor::Null,
        AmqpValue::Boolean(true) => Constructor::True,
        AmqpValue::Boolean(false) => Constructor::False,
        AmqpValue::Ubyte(_) => Constructor::Ubyte,
        AmqpValue::Ushort(_) => Constructor::Ushort,
        AmqpValue::Uint(0) => Constructor::Uint0,
        AmqpValue::Uint(v) if *v <= u8::MAX as u32 => Constructor::SmallUint,
        AmqpValue::Uint(_) => Constructor::Uint,
        AmqpValue::Ulong(0) => Constructor::Ulong0,
        AmqpValue::Ulong(v) if *v <= u8::MAX as u64 => Constructor::SmallUlong,
        AmqpValue::Ulong(_) => Constructor::Ulong,
        AmqpValue::Byte(_) => Constructor::Byte,
        AmqpValue::Short(_) => Constructor::Short,
        AmqpValue::Int(v) if i8::try_from(*v).is_ok() => Constructor::SmallInt,
        AmqpValue::Int(_) => Constructor::Int,
        AmqpValue::Long(v) if i8::try_from(*v).is_ok() => Constructor::SmallLong,
        AmqpValue::Long(_) => Constructor::Long,
        AmqpValue::Float(_) => Constructor::Float,
        AmqpValue::Double(_) => Constructor::Double,
        AmqpValue::Decimal32(_) => Constructor::Decimal32,
        AmqpValue::Decimal64(_) => Constructor::Decimal64,
        AmqpValue::Decimal128(_) => Constructor::Decimal128,
        AmqpValue::Char(_) => Constructor::Char,
        AmqpValue::Timestamp(_) => Constructor::Timestamp,
        AmqpValue::Uuid(_) => Constructor::Uuid,
        AmqpValue::Binary(_) => Constructor::Binary(length_width(content, "binary")?),
        AmqpValue::String(_) => Constructor::String(length_width(content, "string")?),
        AmqpValue::Symbol(sym) => {
            if !sym.is_ascii() {
                return Err(EncodeError::InvalidSymbol(sym.as_str().to_owned()));
            }
            Constructor::Symbol(length_width(content, "symbol")?)
        }
        AmqpValue::List(items) if items.is_empty() => Constructor::List0,
        AmqpValue::List(items) => Constructor::List(frame_width(content, items.len(), "list")?),
        AmqpValue::Map(pairs) => Constructor::Map(frame_width(content, pairs.len() * 2, "map")?),
        AmqpValue::Array(array) => {
            Constructor::Array(frame_width(content, array.len(), "array")?)
        }
        AmqpValue::Described(_) => Constructor::Described,
    })
}

/// Bytes following the type code of a value encoded with `ctor`.
fn payload_len(ctor: Constructor, content: usize) -> usize {
    match ctor {
        Constructor::Binary(width) | Constructor::String(width) | Constructor::Symbol(width) => {
            width.bytes() + content
        }
        Constructor::List(width) | Constructor::Map(width) | Constructor::Array(width) => {
            2 * width.bytes() + content
        }
        Constructor::Described => content,
        other => other.fixed_width().unwrap_or(0),
    }
}

fn field_width(ctor: Constructor) -> Width {
    match ctor {
        Constructor::Binary(width)
        | Constructor::String(width)
        | Constructor::Symbol(width)
        | Constructor::List(width)
        | Constructor::Map(width)
        | Constructor::Array(width) => width,
        _ => Width::One,
    }
}

fn length_width(len: usize, what: &'static str) -> Result<Width, EncodeError> {
    if len <= Width::One.max() {
        Ok(Width::One)
    } else if len <= Width::Four.max() {
        Ok(Width::Four)
    } else {
        Err(EncodeError::TooLarge { what, len })
    }
}

/// Width of a compound frame whose size field covers the count field plus
/// `content` bytes.
fn frame_width(content: usize, count: usize, what: &'static str) -> Result<Width, EncodeError> {
    for width in [Width::One, Width::Four] {
        if count <= width.max() && content + width.bytes() <= width.max() {
            return Ok(width);
        }
    }
    Err(EncodeError::TooLarge { what, len: content })
}

/// The narrowest non-variable constructor of the element type that can
/// represent every item.
fn element_constructor(array: &AmqpArray, planned: &[Plan]) -> Result<Constructor, EncodeError> {
    let items = &array.items;
    let widest = planned.iter().map(|item| item.content).max().unwrap_or(0);
    Ok(match array.element_type {
        AmqpType::Null => Constructor::Null,
        AmqpType::Boolean => Constructor::Boolean,
        AmqpType::Ubyte => Constructor::Ubyte,
        AmqpType::Ushort => Constructor::Ushort,
        AmqpType::Uint => {
            let small = items
                .iter()
                .all(|item| matches!(item, AmqpValue::Uint(v) if *v <= u8::MAX as u32));
            if small {
                Constructor::SmallUint
            } else {
                Constructor::Uint
            }
        }
        AmqpType::Ulong => {
            let small = items
                .iter()
                .all(|item| matches!(item, AmqpValue::Ulong(v) if *v <= u8::MAX as u64));
            if small {
                Constructor::SmallUlong
            } else {
                Constructor::Ulong
            }
        }
        AmqpType::Byte => Constructor::Byte,
        AmqpType::Short => Constructor::Short,
        AmqpType::Int => {
            let small = items
                .iter()
                .all(|item| matches!(item, AmqpValue::Int(v) if i8::try_from(*v).is_ok()));
            if small {
                Constructor::SmallInt
            } else {
                Constructor::Int
            }
        }
        AmqpType::Long => {
            let small = items
                .iter()
                .all(|item| matches!(item, AmqpValue::Long(v) if i8::try_from(*v).is_ok()));
            if small {
                Constructor::SmallLong
            } else {
                Constructor::Long
            }
        }
        AmqpType::Float => Constructor::Float,
        AmqpType::Double => Constructor::Double,
        AmqpType::Decimal32 => Constructor::Decimal32,
        AmqpType::Decimal64 => Constructor::Decimal64,
        AmqpType::Decimal128 => Constructor::Decimal128,
        AmqpType::Char => Constructor::Char,
        AmqpType::Timestamp => Constructor::Timestamp,
        AmqpType::Uuid => Constructor::Uuid,
        AmqpType::Binary => Constructor::Binary(length_width(widest, "binary")?),
        AmqpType::String => Constructor::String(length_width(widest, "string")?),
        AmqpType::Symbol => Constructor::Symbol(length_width(widest, "symbol")?),
        AmqpType::List => Constructor::List(items_frame_width(items, planned, "list")?),
        AmqpType::Map => Constructor::Map(items_frame_width(items, planned, "map")?),
        AmqpType::Array => Constructor::Array(items_frame_width(items, planned, "array")?),
        AmqpType::Described => return Err(EncodeError::InvalidArrayElement(AmqpType::Described)),
    })
}

/// Frame width shared by compound array items: the widest any item needs.
fn items_frame_width(
    items: &[AmqpValue],
    planned: &[Plan],
    what: &'static str,
) -> Result<Width, EncodeError> {
    let mut width = Width::One;
    for (item, planned) in items.iter().zip(planned) {
        let count = match item {
            AmqpValue::List(items) => items.len(),
            AmqpValue::Map(pairs) => pairs.len() * 2,
            AmqpValue::Array(array) => array.len(),
            _ => 0,
        };
        if frame_width(planned.content, count, what)? == Width::Four {
            width = Width::Four;
        }
    }
    Ok(width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Described, Symbol};
    use bytes::Bytes;

    fn enc(value: impl Into<AmqpValue>) -> Vec<u8> {
        encode(&value.into()).unwrap()
    }

    #[test]
    fn smallest_integer_forms() {
        assert_eq!(enc(0u32), [0x43]);
        assert_eq!(enc(255u32), [0x52, 0xff]);
        assert_eq!(enc(256u32), [0x70, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(enc(0u64), [0x44]);
        assert_eq!(enc(9u64), [0x53, 0x09]);
        assert_eq!(enc(-1i32), [0x54, 0xff]);
        assert_eq!(enc(128i32), [0x71, 0x00, 0x00, 0x00, 0x80]);
        assert_eq!(enc(-128i64), [0x55, 0x80]);
        assert_eq!(
            enc(i64::MAX),
            [0x81, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn booleans_and_null() {
        assert_eq!(enc(true), [0x41]);
        assert_eq!(enc(false), [0x42]);
        assert_eq!(enc(()), [0x40]);
    }

    #[test]
    fn variable_width_switches_at_256_bytes() {
        let short = enc("ok");
        assert_eq!(short, [0xa1, 0x02, b'o', b'k']);
        let long = enc("x".repeat(256));
        assert_eq!(&long[..5], [0xb1, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(long.len(), 5 + 256);
        assert_eq!(enc(Bytes::new()), [0xa0, 0x00]);
        assert_eq!(enc(Symbol::from("a")), [0xa3, 0x01, b'a']);
    }

    #[test]
    fn compounds() {
        assert_eq!(enc(Vec::<AmqpValue>::new()), [0x45]);
        assert_eq!(enc(AmqpValue::Map(Vec::new())), [0xc1, 0x01, 0x00]);
        assert_eq!(
            enc(vec![AmqpValue::Null, AmqpValue::Uint(1)]),
            [0xc0, 0x04, 0x02, 0x40, 0x52, 0x01]
        );
        let big = vec![AmqpValue::Null; 300];
        let bytes = enc(big);
        assert_eq!(&bytes[..9], [0xd0, 0x00, 0x00, 0x01, 0x30, 0x00, 0x00, 0x01, 0x2c]);
    }

    #[test]
    fn arrays_choose_narrow_element_codes() {
        let small = AmqpArray::new(AmqpType::Uint, vec![1u32.into(), 2u32.into(), 3u32.into()]);
        assert_eq!(enc(small), [0xe0, 0x05, 0x03, 0x52, 0x01, 0x02, 0x03]);

        let wide = AmqpArray::new(AmqpType::Uint, vec![0u32.into(), 256u32.into()]);
        assert_eq!(
            enc(wide),
            [0xe0, 0x0a, 0x02, 0x70, 0, 0, 0, 0, 0, 0, 1, 0]
        );

        let flags = AmqpArray::new(AmqpType::Boolean, vec![true.into(), false.into()]);
        assert_eq!(enc(flags), [0xe0, 0x04, 0x02, 0x56, 0x01, 0x00]);

        let described = AmqpArray::described(7u64, AmqpType::Ubyte, vec![10u8.into()]);
        assert_eq!(enc(described), [0xe0, 0x06, 0x01, 0x00, 0x53, 0x07, 0x50, 0x0a]);
    }

    #[test]
    fn array_of_lists_shares_frame_width() {
        let array = AmqpArray::new(
            AmqpType::List,
            vec![AmqpValue::List(vec![]), AmqpValue::List(vec![AmqpValue::Null])],
        );
        assert_eq!(
            enc(array),
            [0xe0, 0x07, 0x02, 0xc0, 0x01, 0x00, 0x02, 0x01, 0x40]
        );
    }

    #[test]
    fn heterogeneous_array_is_rejected() {
        let array = AmqpArray::new(AmqpType::Uint, vec![1u32.into(), 1u64.into()]);
        assert_eq!(
            encode(&array.into()),
            Err(EncodeError::ArrayElementMismatch {
                index: 1,
                expected: AmqpType::Uint,
                found: AmqpType::Ulong,
            })
        );
        let array = AmqpArray::new(AmqpType::Described, vec![]);
        assert_eq!(
            encode(&array.into()),
            Err(EncodeError::InvalidArrayElement(AmqpType::Described))
        );
    }

    #[test]
    fn non_ascii_symbol_is_rejected() {
        assert!(matches!(
            encode(&Symbol::from("é").into()),
            Err(EncodeError::InvalidSymbol(_))
        ));
        let array = AmqpArray::new(AmqpType::Symbol, vec![Symbol::from("ß").into()]);
        assert!(matches!(
            encode(&array.into()),
            Err(EncodeError::InvalidSymbol(_))
        ));
    }

    #[test]
    fn described_value() {
        let value: AmqpValue = Described::new(7u64, "ok").into();
        assert_eq!(enc(value), [0x00, 0x53, 0x07, 0xa1, 0x02, b'o', b'k']);
    }

    #[test]
    fn encoded_size_matches_output() {
        let value = AmqpValue::Map(vec![
            ("a".into(), vec![AmqpValue::Long(1 << 40), "x".repeat(300).into()].into()),
            (
                Symbol::from("k").into(),
                AmqpArray::new(AmqpType::String, vec!["p".into(), "q".into()]).into(),
            ),
        ]);
        assert_eq!(encoded_size(&value).unwrap(), enc(value.clone()).len());
    }

    #[test]
    fn plan_records_nested_constructors() {
        // list [ null, array [ list [] , list [ uint 1 ] ] ]
        let array = AmqpArray::new(
            AmqpType::List,
            vec![AmqpValue::List(vec![]), AmqpValue::List(vec![AmqpValue::Uint(1)])],
        );
        let value = AmqpValue::List(vec![AmqpValue::Null, array.into()]);
        let plan = Plan::of(&value).unwrap();

        assert_eq!(plan.ctor, Constructor::List(Width::One));
        assert_eq!(plan.children.len(), 2);
        let array_plan = &plan.children[1];
        let layout = array_plan.array.as_ref().unwrap();
        assert_eq!(layout.element, Constructor::List(Width::One));
        assert!(array_plan
            .children
            .iter()
            .all(|item| item.ctor == Constructor::List(Width::One)));
        assert_eq!(array_plan.children[1].children[0].ctor, Constructor::SmallUint);
        assert_eq!(plan.size(), enc(value).len());
    }

    #[test]
    fn deep_nesting_encodes() {
        let mut value = AmqpValue::Null;
        for _ in 0..2_000 {
            value = AmqpValue::List(vec![value]);
        }
        let bytes = enc(value.clone());
        assert_eq!(bytes.len(), encoded_size(&value).unwrap());
        assert_eq!(bytes[bytes.len() - 1], 0x40);
    }

    #[test]
    fn encode_into_appends_and_rolls_back() {
        let mut writer = Writer::new();
        writer.u8(0xaa);
        encode_into(&mut writer, &AmqpValue::Uint(1)).unwrap();
        assert_eq!(writer.as_slice(), [0xaa, 0x52, 0x01]);

        let bad = AmqpValue::List(vec![AmqpValue::Null, Symbol::from("ü").into()]);
        assert!(encode_into(&mut writer, &bad).is_err());
        assert_eq!(writer.as_slice(), [0xaa, 0x52, 0x01]);
    }
}
