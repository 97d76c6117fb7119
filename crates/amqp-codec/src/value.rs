//! [`AmqpValue`]: the decoded form of every AMQP 1.0 wire value.

use bytes::Bytes;
use uuid::Uuid;

use crate::AmqpType;

/// A decoded AMQP 1.0 value.
///
/// Values record the logical type only. The wire width a value arrived in
/// (`smalluint` vs `uint`, `str8` vs `str32`) is not retained; the encoder
/// picks the width again.
#[derive(Debug, Clone, PartialEq)]
pub enum AmqpValue {
    Null,
    Boolean(bool),
    Ubyte(u8),
    Ushort(u16),
    Uint(u32),
    Ulong(u64),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// IEEE 754 decimal32, raw bits.
    Decimal32(u32),
    /// IEEE 754 decimal64, raw bits.
    Decimal64(u64),
    /// IEEE 754 decimal128, raw bits.
    Decimal128(u128),
    Char(char),
    /// Milliseconds since the Unix epoch.
    Timestamp(i64),
    Uuid(Uuid),
    Binary(Bytes),
    String(String),
    Symbol(Symbol),
    List(Vec<AmqpValue>),
    /// Key/value pairs in wire order. Duplicate keys are kept.
    Map(Vec<(AmqpValue, AmqpValue)>),
    Array(AmqpArray),
    Described(Box<Described>),
}

impl AmqpValue {
    /// Logical type of this value.
    pub fn amqp_type(&self) -> AmqpType {
        match self {
            AmqpValue::Null => AmqpType::Null,
            AmqpValue::Boolean(_) => AmqpType::Boolean,
            AmqpValue::Ubyte(_) => AmqpType::Ubyte,
            AmqpValue::Ushort(_) => AmqpType::Ushort,
            AmqpValue::Uint(_) => AmqpType::Uint,
            AmqpValue::Ulong(_) => AmqpType::Ulong,
            AmqpValue::Byte(_) => AmqpType::Byte,
            AmqpValue::Short(_) => AmqpType::Short,
            AmqpValue::Int(_) => AmqpType::Int,
            AmqpValue::Long(_) => AmqpType::Long,
            AmqpValue::Float(_) => AmqpType::Float,
            AmqpValue::Double(_) => AmqpType::Double,
            AmqpValue::Decimal32(_) => AmqpType::Decimal32,
            AmqpValue::Decimal64(_) => AmqpType::Decimal64,
            AmqpValue::Decimal128(_) => AmqpType::Decimal128,
            AmqpValue::Char(_) => AmqpType::Char,
            AmqpValue::Timestamp(_) => AmqpType::Timestamp,
            AmqpValue::Uuid(_) => AmqpType::Uuid,
            AmqpValue::Binary(_) => AmqpType::Binary,
            AmqpValue::String(_) => AmqpType::String,
            AmqpValue::Symbol(_) => AmqpType::Symbol,
            AmqpValue::List(_) => AmqpType::List,
            AmqpValue::Map(_) => AmqpType::Map,
            AmqpValue::Array(_) => AmqpType::Array,
            AmqpValue::Described(_) => AmqpType::Described,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AmqpValue::Null)
    }

    /// Shorthand for a described value.
    pub fn described(descriptor: impl Into<AmqpValue>, body: impl Into<AmqpValue>) -> Self {
        AmqpValue::Described(Box::new(Described::new(descriptor, body)))
    }

    pub fn as_described(&self) -> Option<&Described> {
        match self {
            AmqpValue::Described(d) => Some(d),
            _ => None,
        }
    }
}

/// A symbolic value: an ASCII string from a constrained domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(value: impl Into<String>) -> Self {
        Symbol(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Symbols must be ASCII to be encodable.
    pub fn is_ascii(&self) -> bool {
        self.0.is_ascii()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol::new(value)
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Symbol(value)
    }
}

/// A descriptor paired with a body.
///
/// The codec does not interpret descriptors. Mapping a descriptor onto a
/// structured record is left to the layer above.
#[derive(Debug, Clone, PartialEq)]
pub struct Described {
    pub descriptor: AmqpValue,
    pub body: AmqpValue,
}

impl Described {
    pub fn new(descriptor: impl Into<AmqpValue>, body: impl Into<AmqpValue>) -> Self {
        Self {
            descriptor: descriptor.into(),
            body: body.into(),
        }
    }

    /// Numeric descriptor, when the descriptor is a `ulong`.
    pub fn descriptor_code(&self) -> Option<u64> {
        match self.descriptor {
            AmqpValue::Ulong(code) => Some(code),
            _ => None,
        }
    }

    /// Symbolic descriptor, when the descriptor is a `symbol`.
    pub fn descriptor_symbol(&self) -> Option<&str> {
        match &self.descriptor {
            AmqpValue::Symbol(sym) => Some(sym.as_str()),
            _ => None,
        }
    }
}

/// A homogeneous sequence sharing one element constructor.
///
/// When the element constructor is described, `descriptor` holds the shared
/// descriptor and `items` hold the bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct AmqpArray {
    pub descriptor: Option<Box<AmqpValue>>,
    pub element_type: AmqpType,
    pub items: Vec<AmqpValue>,
}

impl AmqpArray {
    pub fn new(element_type: AmqpType, items: Vec<AmqpValue>) -> Self {
        Self {
            descriptor: None,
            element_type,
            items,
        }
    }

    pub fn described(
        descriptor: impl Into<AmqpValue>,
        element_type: AmqpType,
        items: Vec<AmqpValue>,
    ) -> Self {
        Self {
            descriptor: Some(Box::new(descriptor.into())),
            element_type,
            items,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for AmqpValue {
                fn from(v: $ty) -> Self {
                    AmqpValue::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    bool => Boolean,
    u8 => Ubyte,
    u16 => Ushort,
    u32 => Uint,
    u64 => Ulong,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    char => Char,
    Uuid => Uuid,
    Bytes => Binary,
    String => String,
    Symbol => Symbol,
    Vec<AmqpValue> => List,
    AmqpArray => Array,
}

impl From<&str> for AmqpValue {
    fn from(v: &str) -> Self {
        AmqpValue::String(v.to_owned())
    }
}

impl From<Described> for AmqpValue {
    fn from(v: Described) -> Self {
        AmqpValue::Described(Box::new(v))
    }
}

impl From<()> for AmqpValue {
    fn from(_: ()) -> Self {
        AmqpValue::Null
    }
}
