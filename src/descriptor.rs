//! Typed constraint descriptors: String, Number, Boolean and Array.
//!
//! Each descriptor is built from a plain option record (`XxxOptions`). Bounds
//! may be given explicitly or derived from a predicate (`length` for strings
//! and arrays, `value` for numbers); explicit values win. Every descriptor is
//! required unless told otherwise.
pub mod array;
pub mod boolean;
pub mod number;
pub mod string;

pub use array::{ArrayItems, ArrayOptions, ArraySchema, ItemsOption};
pub use boolean::{BooleanOptions, BooleanSchema};
pub use number::{NumberOptions, NumberSchema};
pub use string::{StringFormat, StringOptions, StringSchema};

use crate::error::Result;
use crate::predicate::Predicate;

/// Resolve `(min, max)` length bounds: predicate first, explicit values on top.
fn length_bounds(
    predicate: Option<&Predicate>,
    min: Option<u64>,
    max: Option<u64>,
) -> Result<(Option<u64>, Option<u64>)> {
    let (mut lo, mut hi) = match predicate {
        Some(p) => p.to_length_bounds()?,
        None => (None, None),
    };
    if min.is_some() {
        lo = min;
    }
    if max.is_some() {
        hi = max;
    }
    Ok((lo, hi))
}
