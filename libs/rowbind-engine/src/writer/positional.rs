use std::sync::Arc;

use rowbind_api::{MapError, Record, RecordShape, Row, Source, TypeKind};

use super::shape_mismatch;

/// Value `i` of the sequence goes to column `i`; extra values or columns are left alone.
pub(super) fn write(shape: &Arc<RecordShape>, source: Source<'_>) -> Result<Row, MapError> {
    let Source::Sequence(values) = source else {
        return Err(shape_mismatch(TypeKind::Sequence, source));
    };

    let mut row = Row::empty(Arc::clone(shape));
    for (column, value) in shape.columns().iter().zip(values) {
        row.set(column, value.clone())?;
    }
    Ok(row)
}
