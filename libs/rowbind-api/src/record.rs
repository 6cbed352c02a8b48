use std::sync::Arc;

use crate::error::MapError;
use crate::schema::{ColumnDescriptor, RecordShape};
use crate::value::Value;

/// Access to a relational record's cells.
///
/// The engine reads through this trait, so any record runtime can be mapped
/// into objects. Writers always produce [`Row`]s.
pub trait Record {
    /// Value stored for `column`, or `None` if the column is not part of the record.
    fn get(&self, column: &ColumnDescriptor) -> Option<&Value>;

    fn set(&mut self, column: &ColumnDescriptor, value: Value) -> Result<(), MapError>;
}

/// Positional record: one value per column of its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    shape: Arc<RecordShape>,
    values: Vec<Value>,
}

impl Row {
    /// Fresh record of `shape` with every cell `Null`.
    pub fn empty(shape: Arc<RecordShape>) -> Self {
        let values = vec![Value::Null; shape.len()];
        Self { shape, values }
    }

    pub fn from_values(shape: Arc<RecordShape>, values: Vec<Value>) -> Result<Self, MapError> {
        if values.len() != shape.len() {
            return Err(MapError::Arity {
                expected: shape.len(),
                found: values.len(),
            });
        }
        Ok(Self { shape, values })
    }

    pub fn shape(&self) -> &Arc<RecordShape> {
        &self.shape
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Value of the first column named exactly `name`.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.shape.index_of(name).and_then(|i| self.values.get(i))
    }
}

impl Record for Row {
    fn get(&self, column: &ColumnDescriptor) -> Option<&Value> {
        if self.shape.contains(column) {
            self.values.get(column.index)
        } else {
            None
        }
    }

    /// Stores `value` if the column belongs to the shape and the value's
    /// runtime type is assignable to the column. `Null` fits any column.
    fn set(&mut self, column: &ColumnDescriptor, value: Value) -> Result<(), MapError> {
        if !self.shape.contains(column) {
            return Err(MapError::UnknownColumn {
                name: column.name.clone(),
                index: column.index,
            });
        }
        if let Some(tag) = value.type_tag() {
            if !column.type_tag.is_assignable_from(tag) {
                return Err(MapError::conversion(column.type_tag, &value));
            }
        }
        self.values[column.index] = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TypeTag;

    fn shape() -> Arc<RecordShape> {
        Arc::new(RecordShape::new([
            ("id", TypeTag::Int32),
            ("payload", TypeTag::Any),
        ]))
    }

    #[test]
    fn empty_row_is_all_null() {
        let row = Row::empty(shape());
        assert_eq!(row.values(), &[Value::Null, Value::Null]);
    }

    #[test]
    fn set_then_get() {
        let shape = shape();
        let mut row = Row::empty(shape.clone());
        let id = shape.column(0).unwrap();
        row.set(id, Value::Int32(3)).unwrap();
        assert_eq!(row.get(id), Some(&Value::Int32(3)));
        assert_eq!(row.value("id"), Some(&Value::Int32(3)));
    }

    #[test]
    fn set_rejects_foreign_column_and_wrong_type() {
        let shape = shape();
        let mut row = Row::empty(shape.clone());
        let foreign = ColumnDescriptor {
            name: "other".into(),
            type_tag: TypeTag::Int32,
            index: 0,
        };
        assert!(matches!(
            row.set(&foreign, Value::Int32(1)),
            Err(MapError::UnknownColumn { index: 0, .. })
        ));
        assert!(matches!(
            row.set(shape.column(0).unwrap(), "text".into()),
            Err(MapError::Conversion { expected: TypeTag::Int32, found: "text" })
        ));
        // untyped columns take anything, any column takes null
        row.set(shape.column(1).unwrap(), "text".into()).unwrap();
        row.set(shape.column(0).unwrap(), Value::Null).unwrap();
    }

    #[test]
    fn from_values_checks_arity() {
        let err = Row::from_values(shape(), vec![Value::Int32(1)]).unwrap_err();
        assert!(matches!(err, MapError::Arity { expected: 2, found: 1 }));
    }
}
