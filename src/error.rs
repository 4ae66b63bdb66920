use thiserror::Error;

/// Every failure the compiler can report. A failing call never leaves partial
/// state behind.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Accessor or predicate source text does not have a supported shape.
    #[error("{reason} (in `{source_text}`)")]
    Parse { source_text: String, reason: String },

    /// A raw input matched no literal, descriptor, predicate or combinator shape.
    #[error("Unsupported type. '{shape}'")]
    UnsupportedType { shape: String },

    /// A field path could not be located in the declared type map or tree.
    #[error("Property with path \"{path}\" could not be found")]
    Lookup { path: String },

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// An option record failed to deserialize.
    #[error("at JSON path {path} → {message}")]
    Options { path: String, message: String },
}

impl SchemaError {
    pub(crate) fn parse(source_text: &str, reason: impl Into<String>) -> Self {
        SchemaError::Parse {
            source_text: source_text.trim().to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_expression(source_text: &str) -> Self {
        Self::parse(source_text, "Invalid expression")
    }

    pub(crate) fn lookup<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let path = segments
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(".");
        SchemaError::Lookup { path }
    }
}

pub type Result<T, E = SchemaError> = std::result::Result<T, E>;
