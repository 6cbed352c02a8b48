use std::sync::Arc;

use rowbind_api::{MapError, Record, RecordShape, Row, Source, TypeKind};

use super::shape_mismatch;

/// Columns take the entry whose key equals their raw name (case-sensitive).
pub(super) fn write(shape: &Arc<RecordShape>, source: Source<'_>) -> Result<Row, MapError> {
    let Source::Map(map) = source else {
        return Err(shape_mismatch(TypeKind::Map, source));
    };

    let mut row = Row::empty(Arc::clone(shape));
    for column in shape.columns() {
        if let Some(value) = map.get(&column.name) {
            row.set(column, value.clone())?;
        }
    }
    Ok(row)
}
