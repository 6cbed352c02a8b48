use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use rowbind_api::descriptor::{FieldDescriptor, Getter};
use rowbind_api::{MapError, ObjectDescriptor, Record, RecordShape, Row, Source, TypeKind};

use super::shape_mismatch;

pub(crate) struct ObjectBinding<T> {
    pub column: usize,
    pub field: String,
    getter: Getter<T>,
}

/// Bind columns to readable fields.
///
/// A field is found by its lower-cased effective name (column override, else
/// field name), compared verbatim with the lower-cased column name. The
/// column's type must accept the field's type.
pub(super) fn plan<T>(shape: &RecordShape, descriptor: &ObjectDescriptor<T>) -> Vec<ObjectBinding<T>> {
    let by_name: HashMap<String, &FieldDescriptor<T>> = descriptor
        .fields
        .iter()
        .filter(|f| f.is_readable())
        .map(|f| (f.effective_name().to_lowercase(), f))
        .collect();

    shape
        .columns()
        .iter()
        .filter_map(|column| {
            let field = by_name.get(&column.name.to_lowercase())?;
            let getter = field.get_fn()?;
            column
                .type_tag
                .is_assignable_from(field.type_tag)
                .then(|| ObjectBinding {
                    column: column.index,
                    field: field.name.clone(),
                    getter,
                })
        })
        .collect()
}

pub(super) fn downcast<'a, T: Any>(source: Source<'a>) -> Result<&'a T, MapError> {
    match source {
        Source::Object(object) => object.downcast_ref::<T>().ok_or(MapError::ShapeMismatch {
            expected: TypeKind::Object,
            found: "object of another type",
        }),
        other => Err(shape_mismatch(TypeKind::Object, other)),
    }
}

pub(super) fn write<T>(
    shape: &Arc<RecordShape>,
    binding: &[ObjectBinding<T>],
    object: &T,
) -> Result<Row, MapError> {
    let mut row = Row::empty(Arc::clone(shape));
    for b in binding {
        let value = (b.getter)(object)?;
        if let Some(column) = shape.column(b.column) {
            row.set(column, value)?;
        }
    }
    Ok(row)
}
