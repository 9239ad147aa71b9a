//! Schema IR
//!
//! The canonical type-and-constraint model every provider catalog is written
//! in. The same model drives runtime validation of raw JSON, default filling,
//! and the emitters in [`crate::emit`].

pub mod catalog;
pub mod defaults;
pub mod schema;
pub mod validate;

pub use catalog::Catalog;
pub use schema::{
    any, array, boolean, enumeration, field, integer, literal, null, number, object, record,
    reference, string, tag, tagged_union, union, ArraySchema, Field, NumberSchema, ObjectSchema,
    RecordSchema, Schema, StringFormat, StringSchema, UnionSchema,
};
