use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::MapError;
use crate::value::{FromValue, TypeTag, Value};

/// Structural kind of a type, decides which writer strategy serves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Fixed-size ordered sequence, mapped by position.
    Sequence,
    /// Key → value associative structure, mapped by exact column name.
    Map,
    /// Structured value with named fields.
    Object,
}

impl TypeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Sequence => "sequence",
            TypeKind::Map => "map",
            TypeKind::Object => "object",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a Rust type. Equality and hashing use the `TypeId` only.
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDescriptor {
    pub name: String,
    pub type_tag: TypeTag,
    /// Slot in the constructor's argument list.
    pub position: usize,
}

pub type Getter<T> = fn(&T) -> Result<Value, MapError>;
pub type Setter<T> = fn(&mut T, Value) -> Result<(), MapError>;
pub type Invoke<T> = fn(Vec<Option<Value>>) -> Result<T, MapError>;

/// A named member of an object.
///
/// Readable members carry a getter, writable ones a setter.
pub struct FieldDescriptor<T> {
    pub name: String,
    pub type_tag: TypeTag,
    /// Explicit column name, overrides `name` when writing records.
    pub column: Option<String>,
    getter: Option<Getter<T>>,
    setter: Option<Setter<T>>,
}

impl<T> FieldDescriptor<T> {
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            type_tag,
            column: None,
            getter: None,
            setter: None,
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn getter(mut self, getter: Getter<T>) -> Self {
        self.getter = Some(getter);
        self
    }

    pub fn setter(mut self, setter: Setter<T>) -> Self {
        self.setter = Some(setter);
        self
    }

    pub fn is_readable(&self) -> bool {
        self.getter.is_some()
    }

    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    pub fn get_fn(&self) -> Option<Getter<T>> {
        self.getter
    }

    pub fn set_fn(&self) -> Option<Setter<T>> {
        self.setter
    }

    /// Name used to find this field's column: the override if present, else the field name.
    pub fn effective_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }
}

impl<T> Clone for FieldDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            type_tag: self.type_tag,
            column: self.column.clone(),
            getter: self.getter,
            setter: self.setter,
        }
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("type_tag", &self.type_tag)
            .field("column", &self.column)
            .field("readable", &self.is_readable())
            .field("writable", &self.is_writable())
            .finish()
    }
}

/// Parametrized constructor: ordered parameters plus the function that builds the object.
///
/// Parameters are kept sorted by `position`, and `invoke` receives one entry
/// per parameter in that order; `None` marks a slot no column was bound to.
pub struct Constructor<T> {
    params: Vec<ParamDescriptor>,
    invoke: Invoke<T>,
}

impl<T> Constructor<T> {
    pub fn new(mut params: Vec<ParamDescriptor>, invoke: Invoke<T>) -> Self {
        params.sort_by_key(|p| p.position);
        Self { params, invoke }
    }

    pub fn params(&self) -> &[ParamDescriptor] {
        &self.params
    }

    pub fn invoke(&self, args: Vec<Option<Value>>) -> Result<T, MapError> {
        (self.invoke)(args)
    }
}

impl<T> fmt::Debug for Constructor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("params", &self.params)
            .finish()
    }
}

/// Everything the engine knows about a type: how to build it and which members it has.
pub struct ObjectDescriptor<T> {
    pub type_name: &'static str,
    pub kind: TypeKind,
    pub constructor: Option<Constructor<T>>,
    pub default_constructor: Option<fn() -> T>,
    /// Unique by name.
    pub fields: Vec<FieldDescriptor<T>>,
}

impl<T> ObjectDescriptor<T> {
    pub fn object(type_name: &'static str) -> Self {
        Self::with_kind(type_name, TypeKind::Object)
    }

    pub fn sequence(type_name: &'static str) -> Self {
        Self::with_kind(type_name, TypeKind::Sequence)
    }

    pub fn map(type_name: &'static str) -> Self {
        Self::with_kind(type_name, TypeKind::Map)
    }

    fn with_kind(type_name: &'static str, kind: TypeKind) -> Self {
        Self {
            type_name,
            kind,
            constructor: None,
            default_constructor: None,
            fields: Vec::new(),
        }
    }

    pub fn with_constructor(mut self, constructor: Constructor<T>) -> Self {
        self.constructor = Some(constructor);
        self
    }

    pub fn with_default(mut self, default_constructor: fn() -> T) -> Self {
        self.default_constructor = Some(default_constructor);
        self
    }

    /// Add a field. A field with the same name replaces the earlier one.
    pub fn with_field(mut self, field: FieldDescriptor<T>) -> Self {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    pub fn constructor_params(&self) -> &[ParamDescriptor] {
        match &self.constructor {
            Some(constructor) => constructor.params(),
            None => &[],
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor<T>> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl<T> fmt::Debug for ObjectDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectDescriptor")
            .field("type_name", &self.type_name)
            .field("kind", &self.kind)
            .field("constructor", &self.constructor)
            .field("default_constructor", &self.default_constructor.is_some())
            .field("fields", &self.fields)
            .finish()
    }
}

/// Convert one constructor argument, substituting the zero value for an unbound slot.
pub fn bind_arg<V: FromValue>(arg: Option<Value>) -> Result<V, MapError> {
    match arg {
        Some(value) => V::from_value(value),
        None => Ok(V::absent()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point {
        x: i32,
    }

    fn point() -> ObjectDescriptor<Point> {
        ObjectDescriptor::object("Point")
            .with_field(
                FieldDescriptor::new("x", TypeTag::Int32)
                    .getter(|p: &Point| Ok(Value::Int32(p.x)))
                    .setter(|p: &mut Point, v| {
                        p.x = FromValue::from_value(v)?;
                        Ok(())
                    }),
            )
            .with_field(FieldDescriptor::new("x", TypeTag::Int32).column("pos_x"))
    }

    #[test]
    fn same_named_field_replaces_earlier() {
        let desc = point();
        assert_eq!(desc.fields.len(), 1);
        let x = desc.field("x").unwrap();
        assert_eq!(x.effective_name(), "pos_x");
        assert!(!x.is_readable());
        assert!(!x.is_writable());
    }

    #[test]
    fn missing_constructor_has_no_params() {
        assert!(point().constructor_params().is_empty());
    }

    #[test]
    fn bind_arg_defaults_unbound_slot() {
        assert_eq!(bind_arg::<i64>(None).unwrap(), 0);
        assert_eq!(bind_arg::<i64>(Some(Value::Int64(5))).unwrap(), 5);
        assert!(bind_arg::<i64>(Some(Value::Null)).is_err());
    }

    #[test]
    fn constructor_params_follow_position() {
        let param = |name: &str, position| ParamDescriptor {
            name: name.into(),
            type_tag: TypeTag::Int32,
            position,
        };
        let constructor: Constructor<Point> = Constructor::new(
            vec![param("y", 1), param("x", 0)],
            |args| {
                let mut args = args.into_iter();
                Ok(Point {
                    x: bind_arg(args.next().flatten())?,
                })
            },
        );
        let names: Vec<_> = constructor.params().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["x", "y"]);
        let point = constructor.invoke(vec![Some(Value::Int32(4)), None]).unwrap();
        assert_eq!(point.x, 4);
    }

    #[test]
    fn type_key_identity() {
        assert_eq!(TypeKey::of::<Point>(), TypeKey::of::<Point>());
        assert_ne!(TypeKey::of::<Point>(), TypeKey::of::<String>());
        assert!(TypeKey::of::<Point>().name().ends_with("Point"));
    }
}
