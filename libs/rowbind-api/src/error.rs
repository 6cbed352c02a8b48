use crate::descriptor::TypeKind;
use crate::value::{TypeTag, Value};

/// Error raised while reading an object from a record or writing one into a record.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// The target object could not be instantiated.
    #[error("failed to construct {type_name}: {reason}")]
    Construction {
        type_name: &'static str,
        reason: String,
    },

    /// The runtime value does not have the shape the writer was planned for.
    #[error("{expected} expected, got {found}")]
    ShapeMismatch {
        expected: TypeKind,
        found: &'static str,
    },

    /// Writing an object failed; carries the original cause.
    #[error("failed to map {type_name} into a record: {source}")]
    Mapping {
        type_name: &'static str,
        #[source]
        source: Box<MapError>,
    },

    /// A value could not be converted into the requested Rust type.
    #[error("cannot convert {found} into {expected}")]
    Conversion {
        expected: TypeTag,
        found: &'static str,
    },

    /// The column does not belong to the record's shape.
    #[error("column '{name}' at index {index} is not part of the record shape")]
    UnknownColumn { name: String, index: usize },

    /// Value count does not match the column count of the shape.
    #[error("record shape has {expected} columns, got {found} values")]
    Arity { expected: usize, found: usize },

    /// Failure reported by a fallback collaborator.
    #[error("fallback: {0}")]
    Fallback(String),
}

impl MapError {
    pub fn construction(type_name: &'static str, reason: impl Into<String>) -> Self {
        Self::Construction {
            type_name,
            reason: reason.into(),
        }
    }

    pub fn conversion(expected: TypeTag, found: &Value) -> Self {
        Self::Conversion {
            expected,
            found: found.kind_name(),
        }
    }

    pub fn mapping(type_name: &'static str, source: MapError) -> Self {
        Self::Mapping {
            type_name,
            source: Box::new(source),
        }
    }

    pub fn fallback(msg: impl Into<String>) -> Self {
        Self::Fallback(msg.into())
    }
}
