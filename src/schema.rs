//! Schema tree builder.
//!
//! `with(selector, raw)` resolves the selector to a path, compiles the raw
//! input and merges the node into an owned object tree:
//!
//! - an empty path (identity accessor) sets the root's `additionalProperties`;
//! - otherwise missing intermediate objects are created (existing nodes are
//!   never replaced) and the leaf is stored under its name;
//! - a required leaf adds every segment on its way to the matching level's
//!   deduplicated `required` list.
//!
//! A call that fails leaves the tree exactly as it was. There is no
//! finalization: `with` may follow `build`.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::accessor::{Accessor, PathSegments};
use crate::compile::{Raw, compile};
use crate::error::{Result, SchemaError};
use crate::node::{AdditionalProperties, ConstraintNode, ObjectSchema};
use crate::type_map::TypeMap;

/// `$schema` identifier stamped on built documents.
pub const DRAFT_04: &str = "http://json-schema.org/draft-04/schema#";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct SchemaOptions {
    /// Requiredness of this schema when embedded as a property.
    pub required: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct Schema {
    root: ObjectSchema,
    type_map: Option<TypeMap>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SchemaOptions) -> Self {
        Self {
            root: ObjectSchema::new().with_required(options.required.unwrap_or(true)),
            type_map: None,
        }
    }

    /// Paths are checked against `type_map` before anything is merged.
    pub fn typed(type_map: TypeMap) -> Self {
        Self::new().with_type_map(type_map)
    }

    /// e.g. `Schema::with_options(options).with_type_map(map)`.
    pub fn with_type_map(mut self, type_map: TypeMap) -> Self {
        self.type_map = Some(type_map);
        self
    }

    pub fn optional(mut self) -> Self {
        self.root.required = false;
        self
    }

    pub fn root(&self) -> &ObjectSchema {
        &self.root
    }

    pub fn with(&mut self, selector: impl Into<Accessor>, raw: impl Into<Raw>) -> Result<&mut Self> {
        let path = selector.into().resolve()?;
        if let Some(map) = &self.type_map {
            map.locate(&path)?;
        }
        let node = compile(raw.into())?;
        self.insert(&path, node)?;
        Ok(self)
    }

    fn insert(&mut self, path: &PathSegments, node: ConstraintNode) -> Result<()> {
        let names: Vec<&str> = path.names().collect();
        let Some((leaf, parents)) = names.split_last() else {
            debug!(kind = node.kind(), "set additionalProperties");
            self.root.additional_properties = Some(AdditionalProperties::Schema(Box::new(node)));
            return Ok(());
        };

        // check the whole descent first so a failure mutates nothing
        let mut probe = &self.root;
        for (i, name) in parents.iter().enumerate() {
            match probe.properties.get(*name) {
                None => break,
                Some(ConstraintNode::Object(o)) => probe = o,
                Some(_) => return Err(SchemaError::lookup(&names[..=i + 1])),
            }
        }

        let required = node.required();
        debug!(%path, kind = node.kind(), required, "accumulated constraint");

        let mut level = &mut self.root;
        for (i, name) in parents.iter().enumerate() {
            if required {
                level.required_fields.insert((*name).to_string());
            }
            let child = level
                .properties
                .entry((*name).to_string())
                .or_insert_with(|| ConstraintNode::Object(ObjectSchema::new()));
            let Some(next) = child.as_object_mut() else {
                return Err(SchemaError::lookup(&names[..=i + 1]));
            };
            level = next;
        }

        if required {
            level.required_fields.insert((*leaf).to_string());
        }
        level.properties.insert((*leaf).to_string(), node);
        Ok(())
    }

    /// The rule this builder stands for: its wildcard rule when only the
    /// identity accessor was used, the whole object otherwise.
    fn payload(&self) -> ConstraintNode {
        match (&self.root.additional_properties, self.root.properties.is_empty()) {
            (Some(AdditionalProperties::Schema(node)), true) => {
                (**node).clone().with_required(self.root.required)
            }
            _ => ConstraintNode::Object(self.root.clone()),
        }
    }

    /// Finalized Draft-04 document.
    pub fn build(&self) -> Value {
        let payload = self.payload();
        debug!(kind = payload.kind(), "built schema document");
        stamp(payload.to_json())
    }

    /// Pretty-printed [`build`](Self::build).
    pub fn json(&self) -> String {
        format!("{:#}", self.build())
    }

    /// Embedded form: the full object node.
    pub fn into_node(self) -> ConstraintNode {
        ConstraintNode::Object(self.root)
    }
}

fn stamp(doc: Value) -> Value {
    match doc {
        Value::Object(fields) => {
            let mut out = Map::new();
            out.insert("$schema".into(), Value::from(DRAFT_04));
            out.extend(fields);
            Value::Object(out)
        }
        other => other,
    }
}

/// A map with arbitrary keys whose values all satisfy one rule.
///
/// `with` describes the value type exactly like [`Schema::with`]; embedding
/// yields `{type: object, additionalProperties: <value rule>}`.
#[derive(Debug, Clone, Default)]
pub struct DictionarySchema {
    values: Schema,
    required: Option<bool>,
}

impl DictionarySchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SchemaOptions) -> Self {
        Self { values: Schema::new(), required: options.required }
    }

    pub fn typed(type_map: TypeMap) -> Self {
        Self::new().with_type_map(type_map)
    }

    pub fn with_type_map(mut self, type_map: TypeMap) -> Self {
        self.values = self.values.with_type_map(type_map);
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = Some(false);
        self
    }

    pub fn with(&mut self, selector: impl Into<Accessor>, raw: impl Into<Raw>) -> Result<&mut Self> {
        self.values.with(selector, raw)?;
        Ok(self)
    }

    pub fn values(&self) -> &Schema {
        &self.values
    }

    pub fn into_node(self) -> ConstraintNode {
        let dict = ObjectSchema::dictionary(self.values.payload());
        ConstraintNode::Object(dict.with_required(self.required.unwrap_or(true)))
    }

    pub fn build(&self) -> Value {
        stamp(self.clone().into_node().to_json())
    }
}
