//! Node compiler: one raw input in, one normalized [`ConstraintNode`] out.
//!
//! Dispatch is an exhaustive match over [`Raw`]:
//!
//! 1. regex → string node with that `pattern`
//! 2. string → exact match (anchored, escaped `pattern`)
//! 3. number → `minimum = maximum = value`
//! 4. boolean → `enum: [value]`
//! 5. descriptors, combinators, nodes and nested schemas pass through
//! 6. predicate → number node bounded by the predicate's range
//! 7. anything else → [`SchemaError::UnsupportedType`]
//!
//! Compiling is pure; compiling an already compiled node yields it unchanged.

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde_json::Value;
use tracing::trace;

use crate::combinator::{AllOf, AnyOf, Not, OneOf};
use crate::descriptor::{ArraySchema, BooleanSchema, NumberSchema, StringFormat, StringSchema};
use crate::error::{Result, SchemaError};
use crate::node::{ConstraintNode, ObjectSchema};
use crate::predicate::Predicate;
use crate::schema::{DictionarySchema, Schema};

/// Everything the compiler accepts.
///
/// Note that a plain `&str` is a *literal*; pass predicates through
/// [`predicate!`](crate::predicate!) or [`Predicate::source`].
#[derive(Debug, Clone)]
pub enum Raw {
    Pattern(Regex),
    String(String),
    Number(f64),
    Boolean(bool),
    /// Exact instant, matched as its RFC 3339 text.
    DateTime(DateTime<Utc>),
    Node(ConstraintNode),
    Schema(Schema),
    Dictionary(DictionarySchema),
    Predicate(Predicate),
    /// Arbitrary runtime value; only scalars are supported.
    Json(Value),
}

pub fn compile(raw: Raw) -> Result<ConstraintNode> {
    let node = match raw {
        Raw::Pattern(rx) => ConstraintNode::String(StringSchema::matching(&rx)),
        Raw::String(s) => ConstraintNode::String(StringSchema::exact(&s)),
        Raw::Number(n) => number_literal(n)?,
        Raw::Boolean(b) => ConstraintNode::Boolean(BooleanSchema::exactly(b)),
        Raw::DateTime(at) => ConstraintNode::String(
            StringSchema::enumerated([at.to_rfc3339_opts(SecondsFormat::Millis, true)])
                .with_format(StringFormat::DateTime),
        ),
        Raw::Node(node) => node,
        Raw::Schema(schema) => schema.into_node(),
        Raw::Dictionary(dict) => dict.into_node(),
        Raw::Predicate(p) => ConstraintNode::Number(NumberSchema::from_range(p.to_range()?)),
        Raw::Json(value) => match value {
            Value::String(s) => ConstraintNode::String(StringSchema::exact(&s)),
            Value::Number(n) => match n.as_f64() {
                Some(f) => number_literal(f)?,
                None => return Err(unsupported(format!("number {n}"))),
            },
            Value::Bool(b) => ConstraintNode::Boolean(BooleanSchema::exactly(b)),
            other => return Err(unsupported(json_shape(&other))),
        },
    };
    trace!(kind = node.kind(), required = node.required(), "compiled raw input");
    Ok(node)
}

/// Single-value node for a tuple position: strings and booleans use `enum`,
/// numbers use `minimum = maximum`.
pub fn compile_literal(value: &Value) -> Result<ConstraintNode> {
    match value {
        Value::String(s) => Ok(ConstraintNode::String(StringSchema::enumerated([s.clone()]))),
        Value::Number(n) => match n.as_f64() {
            Some(f) => number_literal(f),
            None => Err(unsupported(format!("number {n}"))),
        },
        Value::Bool(b) => Ok(ConstraintNode::Boolean(BooleanSchema::exactly(*b))),
        other => Err(unsupported(json_shape(other))),
    }
}

fn number_literal(n: f64) -> Result<ConstraintNode> {
    if !n.is_finite() {
        return Err(unsupported(format!("non-finite number {n}")));
    }
    Ok(ConstraintNode::Number(NumberSchema::exactly(n)))
}

fn unsupported(shape: impl Into<String>) -> SchemaError {
    SchemaError::UnsupportedType { shape: shape.into() }
}

fn json_shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ————————————————————————————————————————————————————————————————————————————
// CONVERSIONS
// ————————————————————————————————————————————————————————————————————————————

impl From<&str> for Raw {
    fn from(s: &str) -> Self {
        Raw::String(s.to_string())
    }
}

impl From<String> for Raw {
    fn from(s: String) -> Self {
        Raw::String(s)
    }
}

macro_rules! raw_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Raw {
                fn from(n: $t) -> Self {
                    Raw::Number(n as f64)
                }
            }
        )*
    };
}

raw_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

macro_rules! raw_from_node {
    ($($t:ty => $variant:ident),*) => {
        $(
            impl From<$t> for Raw {
                fn from(v: $t) -> Self {
                    Raw::Node(ConstraintNode::$variant(v))
                }
            }

            impl From<$t> for ConstraintNode {
                fn from(v: $t) -> Self {
                    ConstraintNode::$variant(v)
                }
            }
        )*
    };
}

raw_from_node!(
    StringSchema => String,
    NumberSchema => Number,
    BooleanSchema => Boolean,
    ArraySchema => Array,
    AnyOf => AnyOf,
    OneOf => OneOf,
    AllOf => AllOf,
    Not => Not
);

impl From<ObjectSchema> for Raw {
    fn from(o: ObjectSchema) -> Self {
        Raw::Node(ConstraintNode::Object(o))
    }
}

impl From<bool> for Raw {
    fn from(b: bool) -> Self {
        Raw::Boolean(b)
    }
}

impl From<Regex> for Raw {
    fn from(rx: Regex) -> Self {
        Raw::Pattern(rx)
    }
}

impl From<DateTime<Utc>> for Raw {
    fn from(at: DateTime<Utc>) -> Self {
        Raw::DateTime(at)
    }
}

impl From<ConstraintNode> for Raw {
    fn from(node: ConstraintNode) -> Self {
        Raw::Node(node)
    }
}

impl From<Schema> for Raw {
    fn from(schema: Schema) -> Self {
        Raw::Schema(schema)
    }
}

impl From<&Schema> for Raw {
    fn from(schema: &Schema) -> Self {
        Raw::Schema(schema.clone())
    }
}

impl From<DictionarySchema> for Raw {
    fn from(dict: DictionarySchema) -> Self {
        Raw::Dictionary(dict)
    }
}

impl From<&DictionarySchema> for Raw {
    fn from(dict: &DictionarySchema) -> Self {
        Raw::Dictionary(dict.clone())
    }
}

impl From<Predicate> for Raw {
    fn from(p: Predicate) -> Self {
        Raw::Predicate(p)
    }
}

impl From<Value> for Raw {
    fn from(v: Value) -> Self {
        Raw::Json(v)
    }
}
