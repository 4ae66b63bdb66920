//! Normalized constraint nodes and their Draft-04 JSON rendering.

use indexmap::{IndexMap, IndexSet};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::combinator::{AllOf, AnyOf, Not, OneOf};
use crate::descriptor::{ArraySchema, BooleanSchema, NumberSchema, StringSchema};

/// One field's (or a whole document's) validation rule.
///
/// Equality compares the rendered JSON fragment; `required` only affects the
/// parent's required list, so it never takes part.
#[derive(Debug, Clone)]
pub enum ConstraintNode {
    String(StringSchema),
    Number(NumberSchema),
    Boolean(BooleanSchema),
    Array(ArraySchema),
    Object(ObjectSchema),
    AnyOf(AnyOf),
    OneOf(OneOf),
    AllOf(AllOf),
    Not(Not),
}

/// Object node: named properties, the deduplicated required list and an
/// optional rule for every other key.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    pub properties: IndexMap<String, ConstraintNode>,
    pub required_fields: IndexSet<String>,
    pub additional_properties: Option<AdditionalProperties>,
    pub required: bool,
}

#[derive(Debug, Clone)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<ConstraintNode>),
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self {
            properties: IndexMap::new(),
            required_fields: IndexSet::new(),
            additional_properties: None,
            required: true,
        }
    }
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// `{type: object, additionalProperties: <values>}`.
    pub fn dictionary(values: ConstraintNode) -> Self {
        Self {
            additional_properties: Some(AdditionalProperties::Schema(Box::new(values))),
            ..Self::default()
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), Value::from("object"));
        let props: Map<String, Value> = self
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        map.insert("properties".into(), Value::Object(props));
        // draft-04 forbids an empty `required` array
        if !self.required_fields.is_empty() {
            map.insert(
                "required".into(),
                Value::Array(self.required_fields.iter().cloned().map(Value::from).collect()),
            );
        }
        match &self.additional_properties {
            None => {}
            Some(AdditionalProperties::Allowed(b)) => {
                map.insert("additionalProperties".into(), Value::from(*b));
            }
            Some(AdditionalProperties::Schema(node)) => {
                map.insert("additionalProperties".into(), node.to_json());
            }
        }
        Value::Object(map)
    }
}

impl ConstraintNode {
    pub fn required(&self) -> bool {
        match self {
            ConstraintNode::String(s) => s.required,
            ConstraintNode::Number(n) => n.required,
            ConstraintNode::Boolean(b) => b.required,
            ConstraintNode::Array(a) => a.required,
            ConstraintNode::Object(o) => o.required,
            ConstraintNode::AnyOf(c) => c.required,
            ConstraintNode::OneOf(c) => c.required,
            ConstraintNode::AllOf(c) => c.required,
            ConstraintNode::Not(c) => c.required,
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        match &mut self {
            ConstraintNode::String(s) => s.required = required,
            ConstraintNode::Number(n) => n.required = required,
            ConstraintNode::Boolean(b) => b.required = required,
            ConstraintNode::Array(a) => a.required = required,
            ConstraintNode::Object(o) => o.required = required,
            ConstraintNode::AnyOf(c) => c.required = required,
            ConstraintNode::OneOf(c) => c.required = required,
            ConstraintNode::AllOf(c) => c.required = required,
            ConstraintNode::Not(c) => c.required = required,
        }
        self
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ConstraintNode::String(_) => "string",
            ConstraintNode::Number(_) => "number",
            ConstraintNode::Boolean(_) => "boolean",
            ConstraintNode::Array(_) => "array",
            ConstraintNode::Object(_) => "object",
            ConstraintNode::AnyOf(_) => "anyOf",
            ConstraintNode::OneOf(_) => "oneOf",
            ConstraintNode::AllOf(_) => "allOf",
            ConstraintNode::Not(_) => "not",
        }
    }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            ConstraintNode::Object(o) => Some(o),
            _ => None,
        }
    }

    pub(crate) fn as_object_mut(&mut self) -> Option<&mut ObjectSchema> {
        match self {
            ConstraintNode::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Draft-04 fragment for this node.
    pub fn to_json(&self) -> Value {
        match self {
            ConstraintNode::String(s) => s.to_json(),
            ConstraintNode::Number(n) => n.to_json(),
            ConstraintNode::Boolean(b) => b.to_json(),
            ConstraintNode::Array(a) => a.to_json(),
            ConstraintNode::Object(o) => o.to_json(),
            ConstraintNode::AnyOf(c) => json!({ "anyOf": fragments(&c.any_of) }),
            ConstraintNode::OneOf(c) => json!({ "oneOf": fragments(&c.one_of) }),
            ConstraintNode::AllOf(c) => json!({ "allOf": fragments(&c.all_of) }),
            ConstraintNode::Not(c) => json!({ "not": c.not.to_json() }),
        }
    }
}

pub(crate) fn fragments(nodes: &[ConstraintNode]) -> Vec<Value> {
    nodes.iter().map(ConstraintNode::to_json).collect()
}

impl PartialEq for ConstraintNode {
    fn eq(&self, other: &Self) -> bool {
        self.to_json() == other.to_json()
    }
}

impl Serialize for ConstraintNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<ObjectSchema> for ConstraintNode {
    fn from(o: ObjectSchema) -> Self {
        ConstraintNode::Object(o)
    }
}

// prefer emitting integers when exact
pub(crate) fn json_num(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_does_not_take_part_in_equality() {
        let a = ConstraintNode::Boolean(BooleanSchema::default());
        let b = a.clone().with_required(false);
        assert!(a.required());
        assert!(!b.required());
        assert_eq!(a, b);
    }

    #[test]
    fn empty_required_list_is_omitted() {
        let o = ObjectSchema::new().to_json();
        assert_eq!(o, json!({ "type": "object", "properties": {} }));
    }

    #[test]
    fn dictionary_carries_value_rule() {
        let node = ConstraintNode::from(ObjectSchema::dictionary(
            ConstraintNode::Boolean(BooleanSchema::default()),
        ));
        assert_eq!(node.to_json()["additionalProperties"], json!({ "type": "boolean" }));
        assert_eq!(node.kind(), "object");
    }

    #[test]
    fn integral_numbers_render_as_integers() {
        assert_eq!(json_num(10.0), json!(10));
        assert_eq!(json_num(-3.0), json!(-3));
        assert_eq!(json_num(2.5), json!(2.5));
    }
}
