use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct BooleanOptions {
    #[serde(rename = "enum")]
    pub enum_: Option<Vec<bool>>,
    pub required: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanSchema {
    pub enum_: Vec<bool>,
    pub required: bool,
}

impl Default for BooleanSchema {
    fn default() -> Self {
        Self { enum_: Vec::new(), required: true }
    }
}

impl BooleanSchema {
    pub fn new(options: BooleanOptions) -> Self {
        Self {
            enum_: options.enum_.unwrap_or_default(),
            required: options.required.unwrap_or(true),
        }
    }

    pub fn exactly(value: bool) -> Self {
        Self { enum_: vec![value], ..Self::default() }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn optional(self) -> Self {
        self.with_required(false)
    }

    pub fn to_json(&self) -> Value {
        let mut o = json!({ "type": "boolean" });
        if !self.enum_.is_empty() {
            o["enum"] = Value::Array(self.enum_.iter().copied().map(Value::from).collect());
        }
        o
    }
}
