use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

use crate::compile::{Raw, compile, compile_literal};
use crate::error::Result;
use crate::node::{ConstraintNode, fragments};
use crate::predicate::Predicate;

/// `items` as supplied by the caller.
#[derive(Debug, Clone)]
pub enum ItemsOption {
    /// Tuple validation: element *i* must equal literal *i*.
    Tuple(Vec<Value>),
    /// List validation: every element satisfies one rule.
    List(Box<Raw>),
}

impl ItemsOption {
    pub fn tuple<I, V>(literals: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        ItemsOption::Tuple(literals.into_iter().map(Into::into).collect())
    }

    pub fn list(rule: impl Into<Raw>) -> Self {
        ItemsOption::List(Box::new(rule.into()))
    }
}

// only the tuple form has a JSON spelling
impl<'de> Deserialize<'de> for ItemsOption {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Vec::<Value>::deserialize(deserializer).map(ItemsOption::Tuple)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ArrayOptions {
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub unique_items: Option<bool>,
    /// Length predicate, e.g. `|x| x.len() >= 1`.
    pub length: Option<Predicate>,
    pub items: Option<ItemsOption>,
    /// Only meaningful with tuple `items`; absent means extra elements are fine.
    pub additional_items: Option<bool>,
    pub required: Option<bool>,
}

/// Compiled `items`.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayItems {
    Tuple(Vec<ConstraintNode>),
    List(Box<ConstraintNode>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub unique_items: Option<bool>,
    pub items: Option<ArrayItems>,
    pub additional_items: Option<bool>,
    pub required: bool,
}

impl Default for ArraySchema {
    fn default() -> Self {
        Self {
            min_items: None,
            max_items: None,
            unique_items: None,
            items: None,
            additional_items: None,
            required: true,
        }
    }
}

impl ArraySchema {
    pub fn new(options: ArrayOptions) -> Result<Self> {
        let (min_items, max_items) =
            super::length_bounds(options.length.as_ref(), options.min_items, options.max_items)?;

        let items = match options.items {
            None => None,
            Some(ItemsOption::Tuple(literals)) => Some(ArrayItems::Tuple(
                literals.iter().map(compile_literal).collect::<Result<Vec<_>>>()?,
            )),
            Some(ItemsOption::List(rule)) => Some(ArrayItems::List(Box::new(compile(*rule)?))),
        };

        Ok(Self {
            min_items,
            max_items,
            unique_items: options.unique_items,
            items,
            additional_items: options.additional_items,
            required: options.required.unwrap_or(true),
        })
    }

    pub fn from_predicate(length: impl Into<Predicate>) -> Result<Self> {
        Self::new(ArrayOptions { length: Some(length.into()), ..ArrayOptions::default() })
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn optional(self) -> Self {
        self.with_required(false)
    }

    pub fn to_json(&self) -> Value {
        let mut o = json!({ "type": "array" });
        match &self.items {
            None => {}
            Some(ArrayItems::Tuple(elems)) => o["items"] = Value::Array(fragments(elems)),
            Some(ArrayItems::List(item)) => o["items"] = item.to_json(),
        }
        if let Some(b) = self.additional_items {
            o["additionalItems"] = Value::from(b);
        }
        if let Some(m) = self.min_items {
            o["minItems"] = Value::from(m);
        }
        if let Some(m) = self.max_items {
            o["maxItems"] = Value::from(m);
        }
        if let Some(b) = self.unique_items {
            o["uniqueItems"] = Value::from(b);
        }
        o
    }
}
