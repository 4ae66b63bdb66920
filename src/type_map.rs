//! Pre-declared field maps.
//!
//! A builder created with a [`TypeMap`] refuses paths that name undeclared
//! fields, or that descend into a field which is not an object.

use indexmap::IndexMap;

use crate::accessor::PathSegments;
use crate::error::{Result, SchemaError};

#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    DateTime,
    Array,
    Object(TypeMap),
    /// Keyed by arbitrary names; values of the inner type.
    Dictionary(Box<FieldType>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeMap {
    fields: IndexMap<String, FieldType>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.insert(name.into(), ty);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldType> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Locate `path`, returning the declared type of its leaf.
    pub fn locate(&self, path: &PathSegments) -> Result<Option<&FieldType>> {
        let names: Vec<&str> = path.names().collect();
        let mut level = self;
        let mut found = None;

        for (i, name) in names.iter().enumerate() {
            let ty = level.get(name).ok_or_else(|| SchemaError::lookup(&names[..=i]))?;
            if i + 1 == names.len() {
                found = Some(ty);
                break;
            }
            match ty {
                FieldType::Object(inner) => level = inner,
                _ => return Err(SchemaError::lookup(&names[..=i + 1])),
            }
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> TypeMap {
        TypeMap::new()
            .field("StringProp", FieldType::String)
            .field("NumberProp", FieldType::Number)
            .field(
                "ObjProp",
                FieldType::Object(TypeMap::new().field(
                    "Lvl2ObjProp",
                    FieldType::Object(TypeMap::new().field("Lvl3StrProp", FieldType::String)),
                )),
            )
            .field("DictionaryProp", FieldType::Dictionary(Box::new(FieldType::Number)))
    }

    #[test]
    fn locates_nested_fields() {
        let map = model();
        let path = PathSegments::from_names(["ObjProp", "Lvl2ObjProp", "Lvl3StrProp"]);
        assert_eq!(map.locate(&path).unwrap(), Some(&FieldType::String));
        assert_eq!(map.locate(&PathSegments::default()).unwrap(), None);
    }

    #[test]
    fn missing_field_names_the_failing_prefix() {
        let map = model();
        let path = PathSegments::from_names(["ObjProp", "Nope", "Deeper"]);
        match map.locate(&path) {
            Err(SchemaError::Lookup { path }) => assert_eq!(path, "ObjProp.Nope"),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn cannot_descend_into_scalars_or_dictionaries() {
        let map = model();
        assert!(map.locate(&PathSegments::from_names(["StringProp", "x"])).is_err());
        assert!(map.locate(&PathSegments::from_names(["DictionaryProp", "Key1"])).is_err());
    }
}
