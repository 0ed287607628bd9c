//! Typed column values

use super::column::ColumnType;

/// One decoded column value
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Text from the string tail
    String(String),
    /// Byte-sized boolean
    Bool(bool),
    /// Signed 8-bit
    Int8(i8),
    /// Unsigned 8-bit
    UInt8(u8),
    /// Signed 16-bit
    Int16(i16),
    /// Unsigned 16-bit
    UInt16(u16),
    /// Signed 32-bit
    Int32(i32),
    /// Unsigned 32-bit
    UInt32(u32),
    /// Single-precision float
    Float32(f32),
    /// Signed 64-bit
    Int64(i64),
    /// Unsigned 64-bit
    UInt64(u64),
    /// One bit of a shared byte
    PackedBool(bool),
}

impl Field {
    /// Variant name, used in error messages
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "String",
            Self::Bool(_) => "Bool",
            Self::Int8(_) => "Int8",
            Self::UInt8(_) => "UInt8",
            Self::Int16(_) => "Int16",
            Self::UInt16(_) => "UInt16",
            Self::Int32(_) => "Int32",
            Self::UInt32(_) => "UInt32",
            Self::Float32(_) => "Float32",
            Self::Int64(_) => "Int64",
            Self::UInt64(_) => "UInt64",
            Self::PackedBool(_) => "PackedBool",
        }
    }

    /// Whether this value can be stored in a column of `kind`
    pub const fn matches(&self, kind: ColumnType) -> bool {
        match self {
            Self::String(_) => matches!(kind, ColumnType::String),
            Self::Bool(_) => matches!(kind, ColumnType::Bool),
            Self::Int8(_) => matches!(kind, ColumnType::Int8),
            Self::UInt8(_) => matches!(kind, ColumnType::UInt8),
            Self::Int16(_) => matches!(kind, ColumnType::Int16),
            Self::UInt16(_) => matches!(kind, ColumnType::UInt16),
            Self::Int32(_) => matches!(kind, ColumnType::Int32),
            Self::UInt32(_) => matches!(kind, ColumnType::UInt32),
            Self::Float32(_) => matches!(kind, ColumnType::Float32),
            Self::Int64(_) => matches!(kind, ColumnType::Int64),
            Self::UInt64(_) => matches!(kind, ColumnType::UInt64),
            Self::PackedBool(_) => kind.packed_bit().is_some(),
        }
    }

    /// String value, if this is a string field
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Boolean value of a byte or packed-bool field
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) | Self::PackedBool(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
