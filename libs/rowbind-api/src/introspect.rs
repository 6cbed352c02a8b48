use std::any::Any;
use std::collections::HashMap;

use crate::descriptor::{ObjectDescriptor, TypeKey, TypeKind};
use crate::value::Value;

/// Type introspection: how to construct a type and which members it exposes.
///
/// Usually generated with `#[derive(Introspect)]`; hand-written
/// implementations are fine as long as `describe` is side-effect free and
/// returns the same descriptor on every call.
pub trait Introspect: Any + Send + Sized {
    fn describe() -> ObjectDescriptor<Self>;

    /// Runtime view handed to writers.
    fn as_source(&self) -> Source<'_> {
        Source::Object(self)
    }

    fn type_key() -> TypeKey {
        TypeKey::of::<Self>()
    }
}

/// Runtime view of a value being written into a record.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    Sequence(&'a [Value]),
    Map(&'a HashMap<String, Value>),
    Object(&'a dyn Any),
}

impl Source<'_> {
    pub fn kind(&self) -> TypeKind {
        match self {
            Source::Sequence(_) => TypeKind::Sequence,
            Source::Map(_) => TypeKind::Map,
            Source::Object(_) => TypeKind::Object,
        }
    }
}

impl Introspect for Vec<Value> {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::sequence("Vec<Value>").with_default(Vec::new)
    }

    fn as_source(&self) -> Source<'_> {
        Source::Sequence(self)
    }
}

impl Introspect for HashMap<String, Value> {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::map("HashMap<String, Value>").with_default(HashMap::new)
    }

    fn as_source(&self) -> Source<'_> {
        Source::Map(self)
    }
}
