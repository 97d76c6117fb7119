//! Type code → [`Constructor`] dispatch table.

use std::fmt;
use std::sync::OnceLock;

use amqp_buffers::ChunkedCursor;

use crate::constants::TypeCode;
use crate::error::{rewind, DecodeError, Halt};
use crate::handler::{Budget, ValueHandler};
use crate::{compound, described, primitive, AmqpType, AmqpValue};

/// Width of a length, size or count field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    One,
    Four,
}

impl Width {
    pub fn bytes(self) -> usize {
        match self {
            Width::One => 1,
            Width::Four => 4,
        }
    }

    /// Largest length representable in this width.
    pub fn max(self) -> usize {
        match self {
            Width::One => u8::MAX as usize,
            Width::Four => u32::MAX as usize,
        }
    }
}

/// One wire encoding. Each variant knows how to decode the bytes that follow
/// its type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constructor {
    Described,
    Null,
    True,
    False,
    Boolean,
    Ubyte,
    Ushort,
    Uint,
    SmallUint,
    Uint0,
    Ulong,
    SmallUlong,
    Ulong0,
    Byte,
    Short,
    Int,
    SmallInt,
    Long,
    SmallLong,
    Float,
    Double,
    Decimal32,
    Decimal64,
    Decimal128,
    Char,
    Timestamp,
    Uuid,
    Binary(Width),
    String(Width),
    Symbol(Width),
    List0,
    List(Width),
    Map(Width),
    Array(Width),
}

impl Constructor {
    /// Every encoding defined by AMQP 1.0.
    pub const ALL: &'static [Constructor] = &[
        Constructor::Described,
        Constructor::Null,
        Constructor::True,
        Constructor::False,
        Constructor::Boolean,
        Constructor::Ubyte,
        Constructor::Ushort,
        Constructor::Uint,
        Constructor::SmallUint,
        Constructor::Uint0,
        Constructor::Ulong,
        Constructor::SmallUlong,
        Constructor::Ulong0,
        Constructor::Byte,
        Constructor::Short,
        Constructor::Int,
        Constructor::SmallInt,
        Constructor::Long,
        Constructor::SmallLong,
        Constructor::Float,
        Constructor::Double,
        Constructor::Decimal32,
        Constructor::Decimal64,
        Constructor::Decimal128,
        Constructor::Char,
        Constructor::Timestamp,
        Constructor::Uuid,
        Constructor::Binary(Width::One),
        Constructor::Binary(Width::Four),
        Constructor::String(Width::One),
        Constructor::String(Width::Four),
        Constructor::Symbol(Width::One),
        Constructor::Symbol(Width::Four),
        Constructor::List0,
        Constructor::List(Width::One),
        Constructor::List(Width::Four),
        Constructor::Map(Width::One),
        Constructor::Map(Width::Four),
        Constructor::Array(Width::One),
        Constructor::Array(Width::Four),
    ];

    /// The type code this constructor is registered under.
    pub fn code(self) -> u8 {
        match self {
            Constructor::Described => TypeCode::DESCRIBED,
            Constructor::Null => TypeCode::NULL,
            Constructor::True => TypeCode::BOOLEAN_TRUE,
            Constructor::False => TypeCode::BOOLEAN_FALSE,
            Constructor::Boolean => TypeCode::BOOLEAN,
            Constructor::Ubyte => TypeCode::UBYTE,
            Constructor::Ushort => TypeCode::USHORT,
            Constructor::Uint => TypeCode::UINT,
            Constructor::SmallUint => TypeCode::SMALL_UINT,
            Constructor::Uint0 => TypeCode::UINT0,
            Constructor::Ulong => TypeCode::ULONG,
            Constructor::SmallUlong => TypeCode::SMALL_ULONG,
            Constructor::Ulong0 => TypeCode::ULONG0,
            Constructor::Byte => TypeCode::BYTE,
            Constructor::Short => TypeCode::SHORT,
            Constructor::Int => TypeCode::INT,
            Constructor::SmallInt => TypeCode::SMALL_INT,
            Constructor::Long => TypeCode::LONG,
            Constructor::SmallLong => TypeCode::SMALL_LONG,
            Constructor::Float => TypeCode::FLOAT,
            Constructor::Double => TypeCode::DOUBLE,
            Constructor::Decimal32 => TypeCode::DECIMAL32,
            Constructor::Decimal64 => TypeCode::DECIMAL64,
            Constructor::Decimal128 => TypeCode::DECIMAL128,
            Constructor::Char => TypeCode::CHAR,
            Constructor::Timestamp => TypeCode::TIMESTAMP,
            Constructor::Uuid => TypeCode::UUID,
            Constructor::Binary(Width::One) => TypeCode::VBIN8,
            Constructor::Binary(Width::Four) => TypeCode::VBIN32,
            Constructor::String(Width::One) => TypeCode::STR8,
            Constructor::String(Width::Four) => TypeCode::STR32,
            Constructor::Symbol(Width::One) => TypeCode::SYM8,
            Constructor::Symbol(Width::Four) => TypeCode::SYM32,
            Constructor::List0 => TypeCode::LIST0,
            Constructor::List(Width::One) => TypeCode::LIST8,
            Constructor::List(Width::Four) => TypeCode::LIST32,
            Constructor::Map(Width::One) => TypeCode::MAP8,
            Constructor::Map(Width::Four) => TypeCode::MAP32,
            Constructor::Array(Width::One) => TypeCode::ARRAY8,
            Constructor::Array(Width::Four) => TypeCode::ARRAY32,
        }
    }

    /// Logical type of the values this constructor produces.
    pub fn amqp_type(self) -> AmqpType {
        match self {
            Constructor::Described => AmqpType::Described,
            Constructor::Null => AmqpType::Null,
            Constructor::True | Constructor::False | Constructor::Boolean => AmqpType::Boolean,
            Constructor::Ubyte => AmqpType::Ubyte,
            Constructor::Ushort => AmqpType::Ushort,
            Constructor::Uint | Constructor::SmallUint | Constructor::Uint0 => AmqpType::Uint,
            Constructor::Ulong | Constructor::SmallUlong | Constructor::Ulong0 => AmqpType::Ulong,
            Constructor::Byte => AmqpType::Byte,
            Constructor::Short => AmqpType::Short,
            Constructor::Int | Constructor::SmallInt => AmqpType::Int,
            Constructor::Long | Constructor::SmallLong => AmqpType::Long,
            Constructor::Float => AmqpType::Float,
            Constructor::Double => AmqpType::Double,
            Constructor::Decimal32 => AmqpType::Decimal32,
            Constructor::Decimal64 => AmqpType::Decimal64,
            Constructor::Decimal128 => AmqpType::Decimal128,
            Constructor::Char => AmqpType::Char,
            Constructor::Timestamp => AmqpType::Timestamp,
            Constructor::Uuid => AmqpType::Uuid,
            Constructor::Binary(_) => AmqpType::Binary,
            Constructor::String(_) => AmqpType::String,
            Constructor::Symbol(_) => AmqpType::Symbol,
            Constructor::List0 | Constructor::List(_) => AmqpType::List,
            Constructor::Map(_) => AmqpType::Map,
            Constructor::Array(_) => AmqpType::Array,
        }
    }

    /// Payload width for fixed-width encodings, `None` for variable-width,
    /// compound and described encodings.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            Constructor::Null
            | Constructor::True
            | Constructor::False
            | Constructor::Uint0
            | Constructor::Ulong0
            | Constructor::List0 => Some(0),
            Constructor::Boolean
            | Constructor::Ubyte
            | Constructor::Byte
            | Constructor::SmallUint
            | Constructor::SmallUlong
            | Constructor::SmallInt
            | Constructor::SmallLong => Some(1),
            Constructor::Ushort | Constructor::Short => Some(2),
            Constructor::Uint
            | Constructor::Int
            | Constructor::Float
            | Constructor::Char
            | Constructor::Decimal32 => Some(4),
            Constructor::Ulong
            | Constructor::Long
            | Constructor::Double
            | Constructor::Timestamp
            | Constructor::Decimal64 => Some(8),
            Constructor::Decimal128 | Constructor::Uuid => Some(16),
            Constructor::Described
            | Constructor::Binary(_)
            | Constructor::String(_)
            | Constructor::Symbol(_)
            | Constructor::List(_)
            | Constructor::Map(_)
            | Constructor::Array(_) => None,
        }
    }

    pub fn is_zero_width(self) -> bool {
        self.fixed_width() == Some(0)
    }

    /// Decodes the payload that follows this constructor's type code.
    ///
    /// On any failure the cursor is left where it was.
    pub(crate) fn decode(
        self,
        handler: &ValueHandler<'_>,
        cursor: &mut ChunkedCursor,
        depth: usize,
        budget: &mut Budget,
    ) -> Result<AmqpValue, Halt> {
        let mark = cursor.mark();
        let result = self.construct(handler, cursor, depth, budget);
        if result.is_err() {
            rewind(cursor, mark);
        }
        result
    }

    fn construct(
        self,
        handler: &ValueHandler<'_>,
        cursor: &mut ChunkedCursor,
        depth: usize,
        budget: &mut Budget,
    ) -> Result<AmqpValue, Halt> {
        match self {
            Constructor::Described => described::described(handler, cursor, depth, budget),
            Constructor::Null => Ok(AmqpValue::Null),
            Constructor::True => Ok(AmqpValue::Boolean(true)),
            Constructor::False => Ok(AmqpValue::Boolean(false)),
            Constructor::Boolean => primitive::boolean(cursor),
            Constructor::Ubyte => primitive::ubyte(cursor),
            Constructor::Ushort => primitive::ushort(cursor),
            Constructor::Uint => primitive::uint(cursor),
            Constructor::SmallUint => primitive::small_uint(cursor),
            Constructor::Uint0 => Ok(AmqpValue::Uint(0)),
            Constructor::Ulong => primitive::ulong(cursor),
            Constructor::SmallUlong => primitive::small_ulong(cursor),
            Constructor::Ulong0 => Ok(AmqpValue::Ulong(0)),
            Constructor::Byte => primitive::byte(cursor),
            Constructor::Short => primitive::short(cursor),
            Constructor::Int => primitive::int(cursor),
            Constructor::SmallInt => primitive::small_int(cursor),
            Constructor::Long => primitive::long(cursor),
            Constructor::SmallLong => primitive::small_long(cursor),
            Constructor::Float => primitive::float(cursor),
            Constructor::Double => primitive::double(cursor),
            Constructor::Decimal32 => primitive::decimal32(cursor),
            Constructor::Decimal64 => primitive::decimal64(cursor),
            Constructor::Decimal128 => primitive::decimal128(cursor),
            Constructor::Char => primitive::character(cursor),
            Constructor::Timestamp => primitive::timestamp(cursor),
            Constructor::Uuid => primitive::uuid(cursor),
            Constructor::Binary(width) => primitive::binary(cursor, width),
            Constructor::String(width) => primitive::string(cursor, width),
            Constructor::Symbol(width) => primitive::symbol(cursor, width),
            Constructor::List0 => Ok(AmqpValue::List(Vec::new())),
            Constructor::List(width) => compound::list(handler, cursor, width, depth, budget),
            Constructor::Map(width) => compound::map(handler, cursor, width, depth, budget),
            Constructor::Array(width) => compound::array(handler, cursor, width, depth, budget),
        }
    }
}

/// Immutable table from type code to [`Constructor`].
///
/// Built once and shared by every decode call without locking.
pub struct TypeRegistry {
    table: [Option<Constructor>; 256],
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("constructors", &self.len())
            .finish()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Builds a registry holding every AMQP 1.0 encoding.
    pub fn new() -> Self {
        let mut table = [None; 256];
        for &ctor in Constructor::ALL {
            table[ctor.code() as usize] = Some(ctor);
        }
        tracing::debug!(constructors = Constructor::ALL.len(), "type registry built");
        Self { table }
    }

    /// The process-wide registry, built on first use.
    pub fn global() -> &'static TypeRegistry {
        static REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();
        REGISTRY.get_or_init(TypeRegistry::new)
    }

    /// Looks up the constructor for `code`. `offset` is where the code was
    /// read and is reported in the error.
    pub fn resolve(&self, code: u8, offset: usize) -> Result<Constructor, DecodeError> {
        self.table[code as usize].ok_or(DecodeError::UnknownType { code, offset })
    }

    /// Number of registered type codes.
    pub fn len(&self) -> usize {
        self.table.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
