use std::fmt;
use std::sync::Arc;

use rowbind_api::descriptor::Setter;
use rowbind_api::{Introspect, MapError, ObjectDescriptor, Record, RecordShape, Value};

use crate::fallback::{self, ReaderFallback};
use crate::normalize::NameNormalizer;

struct FieldBinding<T> {
    column: usize,
    field: usize,
    setter: Setter<T>,
}

/// Record → object binding plan for one (shape, type) pair.
///
/// Every column feeds at most one destination. Constructor parameters are
/// tried first, then writable fields; columns matching neither are ignored.
pub struct ReaderPlan<T> {
    shape: Arc<RecordShape>,
    descriptor: ObjectDescriptor<T>,
    /// Constructor slot → column index. `None` leaves the slot at its zero value.
    constructor_binding: Vec<Option<usize>>,
    field_binding: Vec<FieldBinding<T>>,
}

impl<T: Introspect> ReaderPlan<T> {
    pub fn build(shape: Arc<RecordShape>, names: &NameNormalizer) -> Self {
        let descriptor = T::describe();
        let params = descriptor.constructor_params();
        let mut constructor_binding = vec![None; params.len()];
        let mut field_binding = Vec::new();

        'columns: for column in shape.columns() {
            let normalized = names.normalize(&column.name);

            for (slot, param) in params.iter().enumerate() {
                if names.matches_normalized(&param.name, &column.name, &normalized)
                    && param.type_tag.is_assignable_from(column.type_tag)
                {
                    constructor_binding[slot] = Some(column.index);
                    continue 'columns;
                }
            }

            for (i, field) in descriptor.fields.iter().enumerate() {
                let Some(setter) = field.set_fn() else {
                    continue;
                };
                if field.type_tag.is_assignable_from(column.type_tag)
                    && names.matches_normalized(&field.name, &column.name, &normalized)
                {
                    field_binding.push(FieldBinding {
                        column: column.index,
                        field: i,
                        setter,
                    });
                    continue 'columns;
                }
            }
        }

        tracing::debug!(
            target_type = descriptor.type_name,
            columns = shape.len(),
            constructor_bound = constructor_binding.iter().flatten().count(),
            fields_bound = field_binding.len(),
            "built reader plan"
        );

        Self {
            shape,
            descriptor,
            constructor_binding,
            field_binding,
        }
    }

    /// Construct and populate one object from `record`.
    pub fn apply(&self, record: &dyn Record) -> Result<T, MapError> {
        let mut object = self.instantiate(record)?;
        for binding in &self.field_binding {
            (binding.setter)(&mut object, self.value_at(record, binding.column))?;
        }
        Ok(object)
    }

    /// Parametrized constructor when any slot is bound, no-arg constructor otherwise.
    fn instantiate(&self, record: &dyn Record) -> Result<T, MapError> {
        let type_name = self.descriptor.type_name;
        let any_bound = self.constructor_binding.iter().any(Option::is_some);

        match (&self.descriptor.constructor, self.descriptor.default_constructor) {
            (Some(constructor), _) if any_bound => {
                let args = self
                    .constructor_binding
                    .iter()
                    .map(|slot| slot.map(|column| self.value_at(record, column)))
                    .collect();
                constructor
                    .invoke(args)
                    .map_err(|e| construction_error(type_name, e))
            }
            (_, Some(default)) => Ok(default()),
            (Some(constructor), None) => constructor
                .invoke(vec![None; constructor.params().len()])
                .map_err(|e| construction_error(type_name, e)),
            (None, None) => Err(MapError::construction(
                type_name,
                "type has no accessible constructor",
            )),
        }
    }

    fn value_at(&self, record: &dyn Record, column: usize) -> Value {
        self.shape
            .column(column)
            .and_then(|c| record.get(c))
            .cloned()
            .unwrap_or(Value::Null)
    }
}

impl<T> ReaderPlan<T> {
    pub fn shape(&self) -> &Arc<RecordShape> {
        &self.shape
    }

    /// Column index feeding each constructor slot.
    pub fn constructor_binding(&self) -> &[Option<usize>] {
        &self.constructor_binding
    }

    /// `(column index, field name)` for every column routed to a setter.
    pub fn field_binding(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.field_binding
            .iter()
            .map(|b| (b.column, self.descriptor.fields[b.field].name.as_str()))
    }

    /// `true` when no column binds to anything.
    pub fn is_empty(&self) -> bool {
        self.field_binding.is_empty() && self.constructor_binding.iter().all(Option::is_none)
    }
}

impl<T> fmt::Debug for ReaderPlan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderPlan")
            .field("type_name", &self.descriptor.type_name)
            .field("shape", &self.shape)
            .field("constructor_binding", &self.constructor_binding)
            .field("field_binding", &self.field_binding().collect::<Vec<_>>())
            .finish()
    }
}

fn construction_error(type_name: &'static str, error: MapError) -> MapError {
    match error {
        e @ MapError::Construction { .. } => e,
        other => MapError::construction(type_name, other.to_string()),
    }
}

/// Maps records of one shape into `T`, deferring to the fallback reader on failure.
pub struct Reader<T> {
    plan: Arc<ReaderPlan<T>>,
    fallback: Option<Arc<dyn ReaderFallback>>,
}

impl<T> Clone for Reader<T> {
    fn clone(&self) -> Self {
        Self {
            plan: Arc::clone(&self.plan),
            fallback: self.fallback.clone(),
        }
    }
}

impl<T> fmt::Debug for Reader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("plan", &self.plan)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl<T: Introspect> Reader<T> {
    pub(crate) fn new(plan: Arc<ReaderPlan<T>>, fallback: Option<Arc<dyn ReaderFallback>>) -> Self {
        Self { plan, fallback }
    }

    /// Build a `T` from `record`.
    ///
    /// On failure the fallback reader gets a chance; if it is missing or fails
    /// as well, the original error is returned.
    pub fn apply(&self, record: &dyn Record) -> Result<T, MapError> {
        self.plan.apply(record).or_else(|error| {
            fallback::recover_read(self.fallback.as_deref(), &self.plan.shape, record, error)
        })
    }

    pub fn plan(&self) -> &Arc<ReaderPlan<T>> {
        &self.plan
    }
}
