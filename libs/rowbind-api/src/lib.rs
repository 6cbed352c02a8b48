pub mod descriptor;
pub mod error;
pub mod introspect;
pub mod record;
pub mod schema;
pub mod value;

pub use rowbind_api_derive::Introspect;

pub use descriptor::{
    Constructor, FieldDescriptor, ObjectDescriptor, ParamDescriptor, TypeKey, TypeKind,
};
pub use error::MapError;
pub use introspect::{Introspect, Source};
pub use record::{Record, Row};
pub use schema::{ColumnDescriptor, RecordShape};
pub use value::{FromValue, IntoValue, Timestamp, TypeTag, Value, ValueType};
