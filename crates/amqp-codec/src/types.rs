//! Logical AMQP types, independent of wire width.

use std::fmt;

/// The logical type of an [`AmqpValue`](crate::AmqpValue).
///
/// Several wire encodings map onto one logical type: `0x43`, `0x52` and
/// `0x70` all decode to [`AmqpType::Uint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmqpType {
    Null,
    Boolean,
    Ubyte,
    Ushort,
    Uint,
    Ulong,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal32,
    Decimal64,
    Decimal128,
    Char,
    Timestamp,
    Uuid,
    Binary,
    String,
    Symbol,
    List,
    Map,
    Array,
    Described,
}

impl AmqpType {
    /// Type name as written in the AMQP 1.0 type system.
    pub fn name(self) -> &'static str {
        match self {
            AmqpType::Null => "null",
            AmqpType::Boolean => "boolean",
            AmqpType::Ubyte => "ubyte",
            AmqpType::Ushort => "ushort",
            AmqpType::Uint => "uint",
            AmqpType::Ulong => "ulong",
            AmqpType::Byte => "byte",
            AmqpType::Short => "short",
            AmqpType::Int => "int",
            AmqpType::Long => "long",
            AmqpType::Float => "float",
            AmqpType::Double => "double",
            AmqpType::Decimal32 => "decimal32",
            AmqpType::Decimal64 => "decimal64",
            AmqpType::Decimal128 => "decimal128",
            AmqpType::Char => "char",
            AmqpType::Timestamp => "timestamp",
            AmqpType::Uuid => "uuid",
            AmqpType::Binary => "binary",
            AmqpType::String => "string",
            AmqpType::Symbol => "symbol",
            AmqpType::List => "list",
            AmqpType::Map => "map",
            AmqpType::Array => "array",
            AmqpType::Described => "described",
        }
    }
}

impl fmt::Display for AmqpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
