mod named_map;
mod named_object;
mod positional;

use std::fmt;
use std::sync::Arc;

use rowbind_api::{Introspect, MapError, RecordShape, Row, Source, TypeKind};

use crate::fallback::{self, WriterFallback};
use named_object::ObjectBinding;

pub(crate) enum Strategy<T> {
    Positional,
    NamedMap,
    NamedObject(Vec<ObjectBinding<T>>),
}

/// Object → record plan for one (type, shape) pair.
///
/// The strategy is fixed when the plan is built, from the declared kind of the
/// source type:
///
/// - sequence: value `i` goes to column `i`
/// - map: key equal to the raw column name
/// - object: readable fields matched by lower-cased name
pub struct WriterPlan<T> {
    shape: Arc<RecordShape>,
    type_name: &'static str,
    strategy: Strategy<T>,
}

impl<T: Introspect> WriterPlan<T> {
    pub fn build(shape: Arc<RecordShape>) -> Self {
        let descriptor = T::describe();
        let strategy = match descriptor.kind {
            TypeKind::Sequence => Strategy::Positional,
            TypeKind::Map => Strategy::NamedMap,
            TypeKind::Object => Strategy::NamedObject(named_object::plan(&shape, &descriptor)),
        };

        tracing::debug!(
            source_type = descriptor.type_name,
            strategy = descriptor.kind.as_str(),
            columns = shape.len(),
            "built writer plan"
        );

        Self {
            shape,
            type_name: descriptor.type_name,
            strategy,
        }
    }
}

impl<T> WriterPlan<T> {
    pub fn shape(&self) -> &Arc<RecordShape> {
        &self.shape
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Source kind the plan was built for.
    pub fn kind(&self) -> TypeKind {
        match self.strategy {
            Strategy::Positional => TypeKind::Sequence,
            Strategy::NamedMap => TypeKind::Map,
            Strategy::NamedObject(_) => TypeKind::Object,
        }
    }

    /// `(column index, field name)` pairs of a named-object plan. Empty for other strategies.
    pub fn object_binding(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        let binding: &[ObjectBinding<T>] = match &self.strategy {
            Strategy::NamedObject(binding) => binding,
            _ => &[],
        };
        binding.iter().map(|b| (b.column, b.field.as_str()))
    }
}

impl<T> fmt::Debug for WriterPlan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterPlan")
            .field("type_name", &self.type_name)
            .field("kind", &self.kind())
            .field("shape", &self.shape)
            .field("object_binding", &self.object_binding().collect::<Vec<_>>())
            .finish()
    }
}

/// Maps values of type `T` into records of one shape.
pub struct Writer<T> {
    plan: Arc<WriterPlan<T>>,
    fallback: Option<Arc<dyn WriterFallback>>,
}

impl<T> Clone for Writer<T> {
    fn clone(&self) -> Self {
        Self {
            plan: Arc::clone(&self.plan),
            fallback: self.fallback.clone(),
        }
    }
}

impl<T> fmt::Debug for Writer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer")
            .field("plan", &self.plan)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl<T: Introspect> Writer<T> {
    pub(crate) fn new(plan: Arc<WriterPlan<T>>, fallback: Option<Arc<dyn WriterFallback>>) -> Self {
        Self { plan, fallback }
    }

    /// Map `source` into a fresh record. `None` maps to `None`.
    ///
    /// A source whose runtime shape differs from the planned strategy fails
    /// with `ShapeMismatch`. Named-object failures go through the fallback
    /// writer and surface as `Mapping` wrapping the original error.
    pub fn apply(&self, source: Option<Source<'_>>) -> Result<Option<Row>, MapError> {
        source.map(|source| self.apply_source(source)).transpose()
    }

    /// Map `object` using its own runtime view.
    pub fn write(&self, object: &T) -> Result<Row, MapError> {
        self.apply_source(object.as_source())
    }

    pub fn plan(&self) -> &Arc<WriterPlan<T>> {
        &self.plan
    }

    fn apply_source(&self, source: Source<'_>) -> Result<Row, MapError> {
        let shape = &self.plan.shape;
        match &self.plan.strategy {
            Strategy::Positional => positional::write(shape, source),
            Strategy::NamedMap => named_map::write(shape, source),
            Strategy::NamedObject(binding) => {
                let object = named_object::downcast::<T>(source)?;
                named_object::write(shape, binding, object).or_else(|error| {
                    fallback::recover_write::<T>(
                        self.fallback.as_deref(),
                        shape,
                        source,
                        self.plan.type_name,
                        error,
                    )
                })
            }
        }
    }
}

fn shape_mismatch(expected: TypeKind, source: Source<'_>) -> MapError {
    MapError::ShapeMismatch {
        expected,
        found: source.kind().as_str(),
    }
}
