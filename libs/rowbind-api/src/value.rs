use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// Declared type of a column, constructor parameter or field.
///
/// Assignability is deliberately narrow: a tag accepts only itself, and `Any`
/// accepts everything. There is no numeric widening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    Bool,
    Int32,
    Int64,
    Float64,
    Text,
    Bytes,
    /// Microseconds since the Unix epoch.
    Timestamp,
    /// Universal supertype: a slot of this type takes any value.
    Any,
}

impl TypeTag {
    /// `true` when a value declared as `other` may be stored into a slot of `self`.
    pub fn is_assignable_from(self, other: TypeTag) -> bool {
        self == other || self == TypeTag::Any
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeTag::Bool => "bool",
            TypeTag::Int32 => "int32",
            TypeTag::Int64 => "int64",
            TypeTag::Float64 => "float64",
            TypeTag::Text => "text",
            TypeTag::Bytes => "bytes",
            TypeTag::Timestamp => "timestamp",
            TypeTag::Any => "any",
        };
        f.write_str(name)
    }
}

/// Canonical cell value, as stored in a record and passed to setters.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float64(f64),
    Text(String),
    Bytes(Vec<u8>),
    /// Microseconds since the Unix epoch.
    Timestamp(i64),
}

impl Value {
    /// Runtime type of the value. `Null` has none and fits any slot.
    pub fn type_tag(&self) -> Option<TypeTag> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(TypeTag::Bool),
            Value::Int32(_) => Some(TypeTag::Int32),
            Value::Int64(_) => Some(TypeTag::Int64),
            Value::Float64(_) => Some(TypeTag::Float64),
            Value::Text(_) => Some(TypeTag::Text),
            Value::Bytes(_) => Some(TypeTag::Bytes),
            Value::Timestamp(_) => Some(TypeTag::Timestamp),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Float64(_) => "float64",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Timestamp(_) => "timestamp",
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

/// Microsecond timestamp newtype, so struct fields can declare `TypeTag::Timestamp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(pub i64);

// ---------------------------------------------------------------------------
// Conversions between Rust types and `Value`
// ---------------------------------------------------------------------------

/// Static type tag of a Rust type that can live in a column.
pub trait ValueType {
    const TYPE_TAG: TypeTag;
}

/// Fallible extraction of a Rust value from a `Value`.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, MapError>;

    /// Zero/absence value used for unbound constructor slots.
    fn absent() -> Self;
}

pub trait IntoValue {
    fn into_value(self) -> Value;
}

macro_rules! scalar_value {
    ($ty:ty, $variant:ident, $zero:expr) => {
        impl ValueType for $ty {
            const TYPE_TAG: TypeTag = TypeTag::$variant;
        }

        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self, MapError> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(MapError::conversion(TypeTag::$variant, &other)),
                }
            }

            fn absent() -> Self {
                $zero
            }
        }

        impl IntoValue for $ty {
            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }
    };
}

scalar_value!(bool, Bool, false);
scalar_value!(i32, Int32, 0);
scalar_value!(i64, Int64, 0);
scalar_value!(f64, Float64, 0.0);
scalar_value!(String, Text, String::new());
scalar_value!(Vec<u8>, Bytes, Vec::new());

impl ValueType for Timestamp {
    const TYPE_TAG: TypeTag = TypeTag::Timestamp;
}

impl FromValue for Timestamp {
    fn from_value(value: Value) -> Result<Self, MapError> {
        match value {
            Value::Timestamp(micros) => Ok(Timestamp(micros)),
            other => Err(MapError::conversion(TypeTag::Timestamp, &other)),
        }
    }

    fn absent() -> Self {
        Timestamp::default()
    }
}

impl IntoValue for Timestamp {
    fn into_value(self) -> Value {
        Value::Timestamp(self.0)
    }
}

/// Nullable columns: `Null` maps to `None`, anything else must convert to `T`.
impl<T: ValueType> ValueType for Option<T> {
    const TYPE_TAG: TypeTag = T::TYPE_TAG;
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, MapError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn absent() -> Self {
        None
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }
}

/// Untyped slots hold the value as-is.
impl ValueType for Value {
    const TYPE_TAG: TypeTag = TypeTag::Any;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, MapError> {
        Ok(value)
    }

    fn absent() -> Self {
        Value::Null
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}
