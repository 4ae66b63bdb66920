//! Range extraction from single-comparison predicates such as `|x| x >= 10`.
//!
//! | operator            | effect                               |
//! |---------------------|--------------------------------------|
//! | `==` `===` `>=`     | `min = literal`                      |
//! | `==` `===` `<=`     | `max = literal`                      |
//! | `<`                 | `max = literal`, `max_exclusive`     |
//! | `>`                 | `min = literal`, `min_exclusive`     |
//!
//! The left operand is the argument itself or its length (`x.length`,
//! `x.len()`); the right operand is a numeric literal.

use std::borrow::Cow;

use serde::{Deserialize, Deserializer};

use crate::error::{Result, SchemaError};
use crate::lambda::{self, Cursor, Tok};

/// Numeric bounds described by a predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Range {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_exclusive: bool,
    pub max_exclusive: bool,
}

impl Range {
    pub fn exactly(value: f64) -> Self {
        Range { min: Some(value), max: Some(value), ..Range::default() }
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_none_or(f64::is_finite) && self.max.is_none_or(f64::is_finite)
    }

    /// Integer length bounds, as Draft-04 `minLength`/`maxItems` and friends
    /// require. Exclusive and fractional bounds round inward.
    pub fn length_bounds(&self) -> Option<(Option<u64>, Option<u64>)> {
        let min = match self.min {
            None => None,
            Some(m) if self.min_exclusive => Some((m.floor() + 1.0).max(0.0)),
            Some(m) => Some(m.ceil().max(0.0)),
        };
        let max = match self.max {
            None => None,
            Some(m) if self.max_exclusive => {
                let below = if m.fract() == 0.0 { m - 1.0 } else { m.floor() };
                if below < 0.0 {
                    return None;
                }
                Some(below)
            }
            Some(m) if m < 0.0 => return None,
            Some(m) => Some(m.floor()),
        };
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return None;
            }
        }
        Some((min.map(|v| v as u64), max.map(|v| v as u64)))
    }
}

/// Left-hand side of the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Value,
    Length,
}

/// A bound predicate: lambda source text or an explicit range.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Source(Cow<'static, str>),
    Range(Range),
}

impl Predicate {
    pub fn source(text: impl Into<Cow<'static, str>>) -> Self {
        Predicate::Source(text.into())
    }

    pub fn range(range: Range) -> Self {
        Predicate::Range(range)
    }

    /// Bounds on the value itself; a length comparison is rejected here.
    pub fn to_range(&self) -> Result<Range> {
        match self.parts()? {
            (Operand::Value, range) => Ok(range),
            (Operand::Length, _) => Err(SchemaError::invalid_expression(&self.text())),
        }
    }

    /// Length bounds for string/array descriptors. `x` and `x.len()` both
    /// stand for the length here.
    pub(crate) fn to_length_bounds(&self) -> Result<(Option<u64>, Option<u64>)> {
        let (_, range) = self.parts()?;
        range
            .length_bounds()
            .ok_or_else(|| SchemaError::parse(&self.text(), "predicate admits no non-negative length"))
    }

    fn parts(&self) -> Result<(Operand, Range)> {
        match self {
            Predicate::Source(text) => parse_as_range(text),
            Predicate::Range(range) if range.is_finite() => Ok((Operand::Value, *range)),
            Predicate::Range(_) => Err(SchemaError::parse(&self.text(), "bounds must be finite")),
        }
    }

    fn text(&self) -> String {
        match self {
            Predicate::Source(text) => text.to_string(),
            Predicate::Range(range) => format!("{range:?}"),
        }
    }
}

impl From<&'static str> for Predicate {
    fn from(text: &'static str) -> Self {
        Predicate::Source(Cow::Borrowed(text))
    }
}

impl From<String> for Predicate {
    fn from(text: String) -> Self {
        Predicate::Source(Cow::Owned(text))
    }
}

impl From<Range> for Predicate {
    fn from(range: Range) -> Self {
        Predicate::Range(range)
    }
}

impl<'de> Deserialize<'de> for Predicate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(Predicate::from)
    }
}

/// Capture a comparison closure as text, e.g. `predicate!(|x| x.len() < 5)`.
#[macro_export]
macro_rules! predicate {
    ($($lambda:tt)+) => {
        $crate::Predicate::source(stringify!($($lambda)+))
    };
}

/// Parse predicate source into its operand kind and range.
pub fn parse_as_range(text: &str) -> Result<(Operand, Range)> {
    let invalid = || SchemaError::invalid_expression(text);

    let lambda = lambda::split(text)?;
    let mut it = Cursor::new(&lambda.body);

    match it.next() {
        Some(Tok::Ident(name)) if *name == lambda.param => {}
        _ => return Err(invalid()),
    }

    let operand = if it.eat_op(".") {
        if it.eat_ident("length") {
            Operand::Length
        } else if it.eat_ident("len") && it.eat_op("(") && it.eat_op(")") {
            Operand::Length
        } else {
            return Err(invalid());
        }
    } else {
        Operand::Value
    };

    let op = match it.next() {
        Some(Tok::Op(op)) => *op,
        _ => return Err(invalid()),
    };

    let negative = if it.eat_op("-") {
        true
    } else {
        it.eat_op("+");
        false
    };
    let literal = match it.next() {
        Some(Tok::Num(digits)) => digits.replace('_', "").parse::<f64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };
    let literal = if negative { -literal } else { literal };
    if !literal.is_finite() {
        return Err(invalid());
    }

    if !it.is_done() {
        return Err(invalid());
    }

    let mut range = Range::default();
    if matches!(op, "==" | "===" | ">=") {
        range.min = Some(literal);
    }
    if matches!(op, "==" | "===" | "<=") {
        range.max = Some(literal);
    }
    match op {
        "<" => {
            range.max = Some(literal);
            range.max_exclusive = true;
        }
        ">" => {
            range.min = Some(literal);
            range.min_exclusive = true;
        }
        "==" | "===" | ">=" | "<=" => {}
        _ => return Err(invalid()),
    }

    Ok((operand, range))
}
