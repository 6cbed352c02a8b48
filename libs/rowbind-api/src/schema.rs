use serde::{Deserialize, Serialize};

use crate::value::TypeTag;

/// A single column of a record shape.
///
/// Identity is the position: `index` is the column's 0-based slot in its
/// owning shape and in every record of that shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: TypeTag,
    #[serde(default)]
    pub index: usize,
}

/// Ordered column layout of a record (a table or a query projection).
///
/// Equality and hashing are structural, so two shapes built independently for
/// the same projection share mapping plans.
///
/// Indices are always reassigned from position, including when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ColumnDescriptor>", into = "Vec<ColumnDescriptor>")]
pub struct RecordShape {
    columns: Vec<ColumnDescriptor>,
}

impl RecordShape {
    /// Build a shape from `(name, type)` pairs in column order.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, TypeTag)>,
        S: Into<String>,
    {
        let columns = columns
            .into_iter()
            .enumerate()
            .map(|(index, (name, type_tag))| ColumnDescriptor {
                name: name.into(),
                type_tag,
                index,
            })
            .collect();
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, index: usize) -> Option<&ColumnDescriptor> {
        self.columns.get(index)
    }

    /// `true` if this exact column (name, type and position) belongs to the shape.
    pub fn contains(&self, column: &ColumnDescriptor) -> bool {
        self.columns.get(column.index) == Some(column)
    }

    /// Position of the first column with exactly this name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

impl From<Vec<ColumnDescriptor>> for RecordShape {
    fn from(columns: Vec<ColumnDescriptor>) -> Self {
        Self::new(columns.into_iter().map(|c| (c.name, c.type_tag)))
    }
}

impl From<RecordShape> for Vec<ColumnDescriptor> {
    fn from(shape: RecordShape) -> Self {
        shape.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_position() {
        let shape = RecordShape::new([("id", TypeTag::Int32), ("user_name", TypeTag::Text)]);
        assert_eq!(shape.len(), 2);
        assert_eq!(shape.column(1).unwrap().name, "user_name");
        assert_eq!(shape.column(1).unwrap().index, 1);
        assert_eq!(shape.index_of("id"), Some(0));
        assert_eq!(shape.index_of("missing"), None);
    }

    #[test]
    fn contains_requires_same_position() {
        let shape = RecordShape::new([("a", TypeTag::Int32), ("b", TypeTag::Int32)]);
        let moved = ColumnDescriptor {
            name: "a".into(),
            type_tag: TypeTag::Int32,
            index: 1,
        };
        assert!(shape.contains(shape.column(0).unwrap()));
        assert!(!shape.contains(&moved));
    }

    #[test]
    fn structural_equality() {
        let a = RecordShape::new([("id", TypeTag::Int64)]);
        let b = RecordShape::new([("id", TypeTag::Int64)]);
        let c = RecordShape::new([("id", TypeTag::Int32)]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn deserialize_reassigns_indices() {
        let json = r#"[
            {"name": "id", "type": "int64", "index": 7},
            {"name": "email", "type": "text"}
        ]"#;
        let shape: RecordShape = serde_json::from_str(json).unwrap();
        assert_eq!(shape.column(0).unwrap().index, 0);
        assert_eq!(shape.column(1).unwrap().index, 1);
        assert_eq!(shape.column(1).unwrap().type_tag, TypeTag::Text);
    }
}
