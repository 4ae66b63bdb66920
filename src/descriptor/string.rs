use regex::Regex;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::Result;
use crate::predicate::Predicate;

/// Built-in formats, forwarded verbatim to the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum StringFormat {
    #[serde(rename = "date-time")]
    DateTime,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "hostname")]
    Hostname,
    #[serde(rename = "ipv4")]
    Ipv4,
    #[serde(rename = "ipv6")]
    Ipv6,
    #[serde(rename = "uri")]
    Uri,
}

impl StringFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            StringFormat::DateTime => "date-time",
            StringFormat::Email => "email",
            StringFormat::Hostname => "hostname",
            StringFormat::Ipv4 => "ipv4",
            StringFormat::Ipv6 => "ipv6",
            StringFormat::Uri => "uri",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct StringOptions {
    pub format: Option<StringFormat>,
    /// Regular expression source.
    pub pattern: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    /// Length predicate, e.g. `|x| x < 10`.
    pub length: Option<Predicate>,
    #[serde(rename = "enum")]
    pub enum_: Option<Vec<String>>,
    pub required: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringSchema {
    pub format: Option<StringFormat>,
    pub pattern: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub enum_: Vec<String>,
    pub required: bool,
}

impl Default for StringSchema {
    fn default() -> Self {
        Self {
            format: None,
            pattern: None,
            min_length: None,
            max_length: None,
            enum_: Vec::new(),
            required: true,
        }
    }
}

impl StringSchema {
    pub fn new(options: StringOptions) -> Result<Self> {
        let (min_length, max_length) =
            super::length_bounds(options.length.as_ref(), options.min_length, options.max_length)?;

        let pattern = match options.pattern {
            Some(src) => {
                Regex::new(&src)?;
                Some(src)
            }
            None => None,
        };

        Ok(Self {
            format: options.format,
            pattern,
            min_length,
            max_length,
            enum_: options.enum_.unwrap_or_default(),
            required: options.required.unwrap_or(true),
        })
    }

    /// Length constrained by a predicate, e.g. `predicate!(|x| x < 10)`.
    pub fn from_predicate(length: impl Into<Predicate>) -> Result<Self> {
        Self::new(StringOptions { length: Some(length.into()), ..StringOptions::default() })
    }

    /// Must match `pattern` (its source text is forwarded).
    pub fn matching(pattern: &Regex) -> Self {
        Self { pattern: Some(pattern.as_str().to_string()), ..Self::default() }
    }

    /// Exact match via an anchored, escaped pattern.
    pub fn exact(value: &str) -> Self {
        Self { pattern: Some(format!("^{}$", regex::escape(value))), ..Self::default() }
    }

    /// Exact match via `enum`.
    pub fn enumerated<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { enum_: values.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    pub fn with_format(mut self, format: StringFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn optional(self) -> Self {
        self.with_required(false)
    }

    pub fn to_json(&self) -> Value {
        let mut o = json!({ "type": "string" });
        if let Some(format) = self.format {
            o["format"] = Value::from(format.as_str());
        }
        if let Some(rx) = &self.pattern {
            o["pattern"] = Value::from(rx.clone());
        }
        if let Some(m) = self.min_length {
            o["minLength"] = Value::from(m);
        }
        if let Some(m) = self.max_length {
            o["maxLength"] = Value::from(m);
        }
        if !self.enum_.is_empty() {
            o["enum"] = Value::Array(self.enum_.iter().cloned().map(Value::from).collect());
        }
        o
    }
}
