//! Compile per-field constraints into one JSON Schema (Draft-04) document.
//!
//! ```
//! use constraint_schema::{Schema, StringSchema, accessor, predicate};
//!
//! let mut schema = Schema::new();
//! schema
//!     .with(accessor!(|m| m.StringProp), "abc.def")?
//!     .with(accessor!(|m| m.NumberProp), predicate!(|x| x >= 10))?
//!     .with(accessor!(|m| m.ObjProp.Name), StringSchema::from_predicate(predicate!(|x| x.len() < 20))?)?;
//! let document = schema.build();
//! assert_eq!(document["required"][0], "StringProp");
//! # Ok::<(), constraint_schema::SchemaError>(())
//! ```
//!
//! Accessors and predicates are *described* by their source text and never
//! run. The emitted document is meant for an external validator.
pub mod accessor;
pub mod combinator;
pub mod compile;
pub mod descriptor;
pub mod error;
mod lambda;
pub mod node;
pub mod path_de;
pub mod predicate;
pub mod schema;
pub mod type_map;

pub use accessor::{Accessor, PathSegment, PathSegments};
pub use combinator::{AllOf, AnyOf, Not, OneOf};
pub use compile::{Raw, compile};
pub use descriptor::{
    ArrayItems, ArrayOptions, ArraySchema, BooleanOptions, BooleanSchema, ItemsOption, NumberOptions,
    NumberSchema, StringFormat, StringOptions, StringSchema,
};
pub use error::{Result, SchemaError};
pub use node::{AdditionalProperties, ConstraintNode, ObjectSchema};
pub use path_de::{options_from_slice, options_from_str};
pub use predicate::{Operand, Predicate, Range};
pub use schema::{DRAFT_04, DictionarySchema, Schema, SchemaOptions};
pub use type_map::{FieldType, TypeMap};
