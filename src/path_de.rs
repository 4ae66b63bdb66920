//! Option records from JSON text, with JSON-path context in error messages.

use serde::de::DeserializeOwned;

use crate::error::{Result, SchemaError};

fn path_error<E: std::fmt::Display>(err: serde_path_to_error::Error<E>) -> SchemaError {
    let path = err.path().to_string();
    SchemaError::Options { path, message: err.into_inner().to_string() }
}

/// e.g. `options_from_str::<StringOptions>(r#"{ "minLength": 3 }"#)`.
pub fn options_from_str<T: DeserializeOwned>(src: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(path_error)
}

pub fn options_from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(path_error)
}
