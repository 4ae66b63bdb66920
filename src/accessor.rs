//! Accessor path resolution: `|m| m.ObjProp.Lvl2ObjProp` → `["ObjProp", "Lvl2ObjProp"]`.
//!
//! The accessor is described, not executed. Its source text is parsed into the
//! chain of field accesses it denotes; the identity accessor (`|m| m`) yields
//! an empty path, meaning "every key" (dictionary mode).

use std::borrow::Cow;
use std::fmt;

use crate::error::{Result, SchemaError};
use crate::lambda::{self, Cursor, Tok};

/// One resolved field name; `leaf` marks the final segment of the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    pub name: String,
    pub leaf: bool,
}

/// Ordered path denoted by an accessor. Empty means wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSegments(Vec<PathSegment>);

impl PathSegments {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut segments: Vec<PathSegment> = names
            .into_iter()
            .map(|n| PathSegment { name: n.into(), leaf: false })
            .collect();
        if let Some(last) = segments.last_mut() {
            last.leaf = true;
        }
        PathSegments(segments)
    }

    pub fn is_wildcard(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathSegment> {
        self.0.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.name.as_str())
    }

    pub fn leaf(&self) -> Option<&PathSegment> {
        self.0.last()
    }
}

impl fmt::Display for PathSegments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "*");
        }
        let joined = self.names().collect::<Vec<_>>().join(".");
        write!(f, "{joined}")
    }
}

impl<'a> IntoIterator for &'a PathSegments {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A field selector: either lambda source text or an explicit path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    Source(Cow<'static, str>),
    Path(Vec<String>),
}

impl Accessor {
    pub fn source(text: impl Into<Cow<'static, str>>) -> Self {
        Accessor::Source(text.into())
    }

    pub fn path<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Accessor::Path(names.into_iter().map(Into::into).collect())
    }

    /// The dictionary-wildcard accessor.
    pub fn identity() -> Self {
        Accessor::Path(Vec::new())
    }

    pub fn resolve(&self) -> Result<PathSegments> {
        match self {
            Accessor::Source(text) => resolve_source(text),
            Accessor::Path(names) => Ok(PathSegments::from_names(names.iter().cloned())),
        }
    }
}

impl From<&'static str> for Accessor {
    fn from(text: &'static str) -> Self {
        Accessor::Source(Cow::Borrowed(text))
    }
}

impl From<String> for Accessor {
    fn from(text: String) -> Self {
        Accessor::Source(Cow::Owned(text))
    }
}

impl From<PathSegments> for Accessor {
    fn from(path: PathSegments) -> Self {
        Accessor::Path(path.names().map(str::to_string).collect())
    }
}

/// Capture an accessor closure as text, e.g. `accessor!(|m| m.ObjProp.Name)`.
///
/// The closure is never compiled or called; only its tokens are kept.
#[macro_export]
macro_rules! accessor {
    ($($lambda:tt)+) => {
        $crate::Accessor::source(stringify!($($lambda)+))
    };
}

/// Parse accessor source text into the path it denotes.
pub fn resolve_source(text: &str) -> Result<PathSegments> {
    let lambda = lambda::split(text)?;
    let mut it = Cursor::new(&lambda.body);

    // `|m| &m.a` reads naturally in Rust
    it.eat_op("&");

    match it.next() {
        Some(Tok::Ident(root)) if *root == lambda.param => {}
        _ => {
            return Err(SchemaError::parse(
                text,
                format!("accessor must be a field chain starting from `{}`", lambda.param),
            ));
        }
    }

    let mut names = Vec::new();
    while !it.is_done() {
        if it.eat_op(".") {
            match it.ident() {
                Some(name) => names.push(name),
                None => return Err(SchemaError::parse(text, "expected a field name after `.`")),
            }
        } else if it.eat_op("[") {
            let name = match it.next() {
                Some(Tok::Str(name)) => name.clone(),
                _ => return Err(SchemaError::parse(text, "expected a quoted field name inside `[]`")),
            };
            if !it.eat_op("]") {
                return Err(SchemaError::parse(text, "expected `]`"));
            }
            names.push(name);
        } else {
            return Err(SchemaError::parse(text, "accessor body is not a plain field chain"));
        }
    }

    Ok(PathSegments::from_names(names))
}
