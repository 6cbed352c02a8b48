use std::any::Any;
use std::sync::Arc;

use rowbind_api::{Introspect, MapError, Record, RecordShape, Row, Source, TypeKey};

/// Record → object mapping used after the primary reader failed.
///
/// Fallback failures are logged and never surface: the caller always sees
/// the primary error.
///
/// `target` names the requested type; the returned box must hold a value of
/// exactly that type.
pub trait ReaderFallback: Send + Sync {
    fn read(
        &self,
        shape: &Arc<RecordShape>,
        target: TypeKey,
        record: &dyn Record,
    ) -> Result<Box<dyn Any + Send>, MapError>;
}

/// Object → record mapping used after the primary writer failed.
pub trait WriterFallback: Send + Sync {
    fn write(
        &self,
        source_type: TypeKey,
        shape: &Arc<RecordShape>,
        source: Source<'_>,
    ) -> Result<Row, MapError>;
}

/// Try `fallback` after `error`; surface `error` unchanged if that fails too.
pub(crate) fn recover_read<T: Introspect>(
    fallback: Option<&dyn ReaderFallback>,
    shape: &Arc<RecordShape>,
    record: &dyn Record,
    error: MapError,
) -> Result<T, MapError> {
    let target = T::type_key();
    tracing::warn!(target_type = %target, %error, "reader failed to instantiate, falling back");

    let Some(fallback) = fallback else {
        return Err(error);
    };

    let outcome = fallback.read(shape, target, record).and_then(|value| {
        value.downcast::<T>().map(|v| *v).map_err(|_| {
            MapError::fallback(format!("fallback reader returned a value that is not {target}"))
        })
    });

    match outcome {
        Ok(value) => Ok(value),
        Err(fallback_error) => {
            tracing::error!(target_type = %target, error = %fallback_error, "reader fallback also failed");
            Err(error)
        }
    }
}

/// Try `fallback` after `error`; surface `error` wrapped in `MapError::Mapping` if that fails too.
pub(crate) fn recover_write<T: Introspect>(
    fallback: Option<&dyn WriterFallback>,
    shape: &Arc<RecordShape>,
    source: Source<'_>,
    type_name: &'static str,
    error: MapError,
) -> Result<Row, MapError> {
    let source_type = T::type_key();
    tracing::warn!(source_type = %source_type, %error, "writer failed to map object, falling back");

    let Some(fallback) = fallback else {
        return Err(MapError::mapping(type_name, error));
    };

    match fallback.write(source_type, shape, source) {
        Ok(row) => Ok(row),
        Err(fallback_error) => {
            tracing::error!(source_type = %source_type, error = %fallback_error, "writer fallback also failed");
            Err(MapError::mapping(type_name, error))
        }
    }
}
