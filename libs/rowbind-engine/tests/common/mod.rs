#![allow(dead_code)]

use std::sync::Arc;

use rowbind_api::descriptor::{Constructor, FieldDescriptor, ParamDescriptor, bind_arg};
use rowbind_api::{
    FromValue, Introspect, IntoValue, MapError, ObjectDescriptor, RecordShape, Row, TypeTag,
    Value, ValueType,
};

pub fn shape(columns: &[(&str, TypeTag)]) -> Arc<RecordShape> {
    Arc::new(RecordShape::new(columns.iter().copied()))
}

/// `[id int32, user_name text]`
pub fn user_shape() -> Arc<RecordShape> {
    shape(&[("id", TypeTag::Int32), ("user_name", TypeTag::Text)])
}

pub fn row(shape: &Arc<RecordShape>, values: Vec<Value>) -> Row {
    Row::from_values(Arc::clone(shape), values).unwrap()
}

#[derive(Debug, Clone, PartialEq, Default, Introspect)]
#[introspect(constructor, default)]
pub struct User {
    pub id: i32,
    pub user_name: String,
}

/// Only a no-arg constructor; every column goes through setters.
#[derive(Debug, Clone, PartialEq, Default, Introspect)]
#[introspect(default)]
pub struct Profile {
    pub user_name: String,
    pub active: bool,
    pub score: Option<i64>,
    #[introspect(skip)]
    pub cached: Vec<u8>,
}

/// Field with a column override and a write-only member.
#[derive(Debug, Clone, PartialEq, Default, Introspect)]
#[introspect(default)]
pub struct Login {
    pub id: i32,
    #[introspect(column = "user_name")]
    pub name: String,
    #[introspect(write_only)]
    pub password: String,
}

/// Raw identifier member, known to the engine as `type`.
#[derive(Debug, Clone, PartialEq, Default, Introspect)]
#[introspect(constructor, default)]
pub struct Item {
    pub id: i32,
    pub r#type: String,
}

/// `code` has no setter but is still a constructor parameter.
#[derive(Debug, Clone, PartialEq, Default, Introspect)]
#[introspect(constructor)]
pub struct Ticket {
    pub id: i32,
    #[introspect(read_only)]
    pub code: String,
}

/// Setter-only counterpart of [`Ticket`].
#[derive(Debug, Clone, PartialEq, Default, Introspect)]
#[introspect(default)]
pub struct Badge {
    #[introspect(read_only)]
    pub code: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Default, Introspect)]
#[introspect(constructor, default)]
pub struct Tagged<V: ValueType + FromValue + IntoValue + Clone + Default> {
    pub tag: String,
    pub value: V,
}

/// Parameters declared out of position order.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    pub left: i32,
    pub right: String,
}

impl Introspect for Pair {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::object("Pair").with_constructor(Constructor::new(
            vec![
                ParamDescriptor {
                    name: "right".into(),
                    type_tag: TypeTag::Text,
                    position: 1,
                },
                ParamDescriptor {
                    name: "left".into(),
                    type_tag: TypeTag::Int32,
                    position: 0,
                },
            ],
            |args| {
                let mut args = args.into_iter();
                Ok(Pair {
                    left: bind_arg(args.next().flatten())?,
                    right: bind_arg(args.next().flatten())?,
                })
            },
        ))
    }
}

/// Hand-written descriptor: constructor `(id, userName)` plus a writable `id`
/// member whose setter fails, so any setter call is visible.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: i32,
    pub user_name: String,
}

impl Introspect for Account {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::object("Account")
            .with_constructor(Constructor::new(
                vec![
                    ParamDescriptor {
                        name: "id".into(),
                        type_tag: TypeTag::Int32,
                        position: 0,
                    },
                    ParamDescriptor {
                        name: "userName".into(),
                        type_tag: TypeTag::Text,
                        position: 1,
                    },
                ],
                |args| {
                    let mut args = args.into_iter();
                    Ok(Account {
                        id: bind_arg(args.next().flatten())?,
                        user_name: bind_arg(args.next().flatten())?,
                    })
                },
            ))
            .with_field(
                FieldDescriptor::new("id", TypeTag::Int32)
                    .getter(|a: &Account| Ok(Value::Int32(a.id)))
                    .setter(|_, _| Err(MapError::fallback("setter must not run"))),
            )
            .with_field(
                FieldDescriptor::new("userName", TypeTag::Text)
                    .getter(|a: &Account| Ok(Value::Text(a.user_name.clone()))),
            )
    }
}

/// No constructor of any kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Orphan {
    pub id: i32,
}

impl Introspect for Orphan {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::object("Orphan").with_field(
            FieldDescriptor::new("id", TypeTag::Int32)
                .getter(|o: &Orphan| Ok(Value::Int32(o.id)))
                .setter(|o: &mut Orphan, v| {
                    o.id = FromValue::from_value(v)?;
                    Ok(())
                }),
        )
    }
}

/// Readable member whose getter always fails.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Broken {
    pub id: i32,
}

impl Introspect for Broken {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::object("Broken")
            .with_default(Broken::default)
            .with_field(
                FieldDescriptor::new("id", TypeTag::Int32)
                    .getter(|_| Err(MapError::construction("Broken", "getter exploded"))),
            )
    }
}
