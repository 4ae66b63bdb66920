use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{Result, SchemaError};
use crate::node::json_num;
use crate::predicate::{Predicate, Range};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct NumberOptions {
    pub multiple_of: Option<f64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<bool>,
    pub exclusive_maximum: Option<bool>,
    /// Value predicate, e.g. `|x| x <= 15`.
    pub value: Option<Predicate>,
    pub required: Option<bool>,
}

/// Draft-04 numeric rule; exclusivity is a flag next to the bound.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberSchema {
    pub multiple_of: Option<f64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: bool,
    pub exclusive_maximum: bool,
    pub required: bool,
}

impl Default for NumberSchema {
    fn default() -> Self {
        Self {
            multiple_of: None,
            minimum: None,
            maximum: None,
            exclusive_minimum: false,
            exclusive_maximum: false,
            required: true,
        }
    }
}

impl NumberSchema {
    pub fn new(options: NumberOptions) -> Result<Self> {
        let mut out = match &options.value {
            Some(p) => Self::from_range(p.to_range()?),
            None => Self::default(),
        };

        if let Some(m) = options.multiple_of {
            if !(m > 0.0 && m.is_finite()) {
                return Err(SchemaError::Options {
                    path: "multipleOf".into(),
                    message: format!("must be a positive number, got {m}"),
                });
            }
            out.multiple_of = Some(m);
        }
        // an explicit bound replaces the derived one, exclusivity included
        if let Some(m) = options.minimum {
            out.minimum = Some(m);
            out.exclusive_minimum = false;
        }
        if let Some(m) = options.maximum {
            out.maximum = Some(m);
            out.exclusive_maximum = false;
        }
        if let Some(b) = options.exclusive_minimum {
            out.exclusive_minimum = b;
        }
        if let Some(b) = options.exclusive_maximum {
            out.exclusive_maximum = b;
        }
        for (path, bound) in [("minimum", out.minimum), ("maximum", out.maximum)] {
            if bound.is_some_and(|b| !b.is_finite()) {
                return Err(SchemaError::Options { path: path.into(), message: "must be finite".into() });
            }
        }
        if out.exclusive_minimum && out.minimum.is_none() {
            return Err(dangling_flag("exclusiveMinimum", "minimum"));
        }
        if out.exclusive_maximum && out.maximum.is_none() {
            return Err(dangling_flag("exclusiveMaximum", "maximum"));
        }
        out.required = options.required.unwrap_or(true);
        Ok(out)
    }

    pub fn from_predicate(value: impl Into<Predicate>) -> Result<Self> {
        Self::new(NumberOptions { value: Some(value.into()), ..NumberOptions::default() })
    }

    pub fn from_range(range: Range) -> Self {
        Self {
            minimum: range.min,
            maximum: range.max,
            exclusive_minimum: range.min.is_some() && range.min_exclusive,
            exclusive_maximum: range.max.is_some() && range.max_exclusive,
            ..Self::default()
        }
    }

    /// `minimum = maximum = value`.
    pub fn exactly(value: f64) -> Self {
        Self::from_range(Range::exactly(value))
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn optional(self) -> Self {
        self.with_required(false)
    }

    pub fn to_json(&self) -> Value {
        let mut o = json!({ "type": "number" });
        if let Some(m) = self.multiple_of {
            o["multipleOf"] = json_num(m);
        }
        if let Some(m) = self.minimum {
            o["minimum"] = json_num(m);
        }
        if let Some(m) = self.maximum {
            o["maximum"] = json_num(m);
        }
        if self.exclusive_minimum {
            o["exclusiveMinimum"] = Value::from(true);
        }
        if self.exclusive_maximum {
            o["exclusiveMaximum"] = Value::from(true);
        }
        o
    }
}

fn dangling_flag(flag: &str, bound: &str) -> SchemaError {
    SchemaError::Options {
        path: flag.into(),
        message: format!("`{flag}: true` needs a `{bound}`"),
    }
}
