//! Emitted documents checked against a real Draft-04 validator.

use chrono::{TimeZone, Utc};
use constraint_schema::{
    AllOf, AnyOf, ArrayOptions, ArraySchema, BooleanSchema, DictionarySchema, ItemsOption, Not,
    NumberOptions, NumberSchema, OneOf, Predicate, Raw, Schema, StringFormat, StringOptions,
    StringSchema, accessor, predicate,
};
use jsonschema::error::ValidationErrorKind;
use regex::Regex;
use serde_json::{Value, json};

fn validator(doc: &Value) -> jsonschema::Validator {
    jsonschema::draft4::new(doc).expect("emitted document is a valid draft-04 schema")
}

fn assert_valid(doc: &Value, instance: &Value) {
    let v = validator(doc);
    let errors: Vec<String> = v.iter_errors(instance).map(|e| format!("{}: {e}", e.instance_path)).collect();
    assert!(errors.is_empty(), "expected valid, got {errors:?}\nschema: {doc:#}");
}

fn assert_invalid(doc: &Value, instance: &Value) {
    assert!(!validator(doc).is_valid(instance), "expected invalid\nschema: {doc:#}\ninstance: {instance}");
}

fn assert_case(expected: bool, doc: &Value, instance: &Value) {
    if expected {
        assert_valid(doc, instance)
    } else {
        assert_invalid(doc, instance)
    }
}

// eq, lt, lte, gt, gte against a value of 10
const OPERATOR_CASES: &[(&str, bool)] = &[
    ("x => x == 10", true),
    ("x => x === 10", true),
    ("x => x == 9", false),
    ("x => x === 9", false),
    ("x => x == 11", false),
    ("x => x === 11", false),
    ("x => x < 11", true),
    ("x => x < 10", false),
    ("x => x <= 10", true),
    ("x => x <= 9", false),
    ("x => x > 9", true),
    ("x => x > 10", false),
    ("x => x >= 10", true),
    ("x => x >= 11", false),
];

// ————————————————————————————————————————————————————————————————————————————
// SCENARIOS
// ————————————————————————————————————————————————————————————————————————————

#[test]
fn exact_string_property() -> anyhow::Result<()> {
    let mut schema = Schema::new();
    schema.with(accessor!(|m| m.StringProp), "abc.def")?;
    let doc = schema.build();

    assert_valid(&doc, &json!({ "StringProp": "abc.def" }));

    let v = validator(&doc);
    let instance = json!({ "StringProp": "xyz" });
    let errors: Vec<_> = v.iter_errors(&instance).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].instance_path.to_string(), "/StringProp");
    assert!(matches!(errors[0].kind, ValidationErrorKind::Pattern { .. }));
    Ok(())
}

#[test]
fn number_property_with_lower_bound() -> anyhow::Result<()> {
    let mut schema = Schema::new();
    schema.with(accessor!(|m| m.NumberProp), predicate!(|x| x >= 10))?;
    let doc = schema.build();

    assert_invalid(&doc, &json!({ "NumberProp": 9 }));
    assert_valid(&doc, &json!({ "NumberProp": 10 }));
    Ok(())
}

#[test]
fn dictionary_failure_path_embeds_parent_and_key() -> anyhow::Result<()> {
    let mut values = Schema::new();
    values.with(accessor!(|x| x.ChildProp), predicate!(|x| x < 50))?;
    let mut dict = Schema::new();
    dict.with(accessor!(|x| x), values)?;
    let mut schema = Schema::new();
    schema.with(accessor!(|m| m.DictionaryProp), dict)?;
    let doc = schema.build();

    assert_valid(&doc, &json!({ "DictionaryProp": { "Key1": { "ChildProp": 1 }, "Key2": { "ChildProp": 49 } } }));

    let v = validator(&doc);
    let instance = json!({ "DictionaryProp": { "Key1": { "ChildProp": 50 }, "Key2": { "ChildProp": 3 } } });
    let paths: Vec<String> = v.iter_errors(&instance).map(|e| e.instance_path.to_string()).collect();
    assert_eq!(paths, ["/DictionaryProp/Key1/ChildProp"]);
    Ok(())
}

#[test]
fn multiple_failures_are_reported_per_field() -> anyhow::Result<()> {
    let mut schema = Schema::new();
    schema
        .with(accessor!(|x| x.StringProp), Regex::new(r"^[A-z]+\.[A-z]+$")?)?
        .with(accessor!(|x| x.NumberProp), predicate!(|x| x > 100))?;
    let doc = schema.build();

    let v = validator(&doc);
    let instance = json!({ "NumberProp": 50, "StringProp": "aaa" });
    let mut paths: Vec<String> = v.iter_errors(&instance).map(|e| e.instance_path.to_string()).collect();
    paths.sort();
    assert_eq!(paths, ["/NumberProp", "/StringProp"]);
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// NUMBERS, STRINGS, BOOLEANS
// ————————————————————————————————————————————————————————————————————————————

#[test]
fn number_operator_table() -> anyhow::Result<()> {
    for (expression, expected) in OPERATOR_CASES {
        let mut schema = Schema::new();
        schema.with(accessor!(|m| m.NumProp), Predicate::source(*expression))?;
        assert_case(*expected, &schema.build(), &json!({ "NumProp": 10 }));
    }
    Ok(())
}

#[test]
fn exact_numbers() -> anyhow::Result<()> {
    let mut schema = Schema::new();
    schema.with(accessor!(|m| m.NumProp), 20)?;
    let doc = schema.build();
    assert_valid(&doc, &json!({ "NumProp": 20 }));
    assert_invalid(&doc, &json!({ "NumProp": 10 }));
    assert_invalid(&doc, &json!({ "NumProp": 30 }));
    Ok(())
}

#[test]
fn number_descriptor_multiple_of() -> anyhow::Result<()> {
    let mut schema = Schema::new();
    schema.with(
        accessor!(|m| m.NumProp),
        NumberSchema::new(NumberOptions {
            multiple_of: Some(5.0),
            value: Some(predicate!(|x| x <= 15)),
            ..NumberOptions::default()
        })?,
    )?;
    let doc = schema.build();
    assert_valid(&doc, &json!({ "NumProp": 15 }));
    assert_invalid(&doc, &json!({ "NumProp": 12 }));
    assert_invalid(&doc, &json!({ "NumProp": 20 }));
    Ok(())
}

#[test]
fn string_length_operator_table() -> anyhow::Result<()> {
    for (expression, expected) in OPERATOR_CASES {
        let mut schema = Schema::new();
        schema.with(accessor!(|m| m.StringProp), StringSchema::from_predicate(Predicate::source(*expression))?)?;
        assert_case(*expected, &schema.build(), &json!({ "StringProp": "aaaaaaaaaa" }));
    }
    Ok(())
}

#[test]
fn string_descriptor_options() -> anyhow::Result<()> {
    let mut schema = Schema::new();
    schema.with(
        accessor!(|m| m.StringProp),
        StringSchema::new(StringOptions {
            pattern: Some("^[a-z]+$".into()),
            max_length: Some(4),
            ..StringOptions::default()
        })?,
    )?;
    let doc = schema.build();
    assert_valid(&doc, &json!({ "StringProp": "abcd" }));
    assert_invalid(&doc, &json!({ "StringProp": "abcde" }));
    assert_invalid(&doc, &json!({ "StringProp": "ab1" }));
    assert_invalid(&doc, &json!({ "StringProp": 1 }));
    Ok(())
}

#[test]
fn string_enum_and_format_are_forwarded() -> anyhow::Result<()> {
    let node = StringSchema::enumerated(["a", "b"]).with_format(StringFormat::Hostname);
    let mut schema = Schema::new();
    schema.with(accessor!(|m| m.StringProp), node)?;
    let doc = schema.build();
    assert_eq!(doc["properties"]["StringProp"]["format"], json!("hostname"));
    assert_valid(&doc, &json!({ "StringProp": "a" }));
    assert_invalid(&doc, &json!({ "StringProp": "c" }));
    Ok(())
}

#[test]
fn exact_date_time() -> anyhow::Result<()> {
    let at = Utc.with_ymd_and_hms(2018, 1, 1, 12, 0, 0).single().expect("unambiguous");
    let mut schema = Schema::new();
    schema.with(accessor!(|m| m.DateProp), at)?;
    let doc = schema.build();
    assert_valid(&doc, &json!({ "DateProp": "2018-01-01T12:00:00.000Z" }));
    assert_invalid(&doc, &json!({ "DateProp": "2018-01-02T12:00:00.000Z" }));
    Ok(())
}

#[test]
fn booleans() -> anyhow::Result<()> {
    let mut schema = Schema::new();
    schema.with(accessor!(|m| m.BooleanProp), false)?;
    let doc = schema.build();
    assert_valid(&doc, &json!({ "BooleanProp": false }));
    assert_invalid(&doc, &json!({ "BooleanProp": true }));

    let mut schema = Schema::new();
    schema.with(accessor!(|m| m.BooleanProp), BooleanSchema::default())?;
    let doc = schema.build();
    assert_valid(&doc, &json!({ "BooleanProp": true }));
    assert_invalid(&doc, &json!({ "BooleanProp": null }));
    assert_invalid(&doc, &json!({}));
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// ARRAYS
// ————————————————————————————————————————————————————————————————————————————

#[test]
fn array_type_and_requiredness() -> anyhow::Result<()> {
    let mut schema = Schema::new();
    schema.with(accessor!(|m| m.ArrayProp), ArraySchema::default())?;
    let doc = schema.build();
    assert_valid(&doc, &json!({ "ArrayProp": [] }));
    assert_invalid(&doc, &json!({ "ArrayProp": "abc" }));
    assert_invalid(&doc, &json!({}));

    let mut schema = Schema::new();
    schema.with(accessor!(|m| m.ArrayProp), ArraySchema::default().optional())?;
    assert_valid(&schema.build(), &json!({}));
    Ok(())
}

#[test]
fn array_length_operator_table() -> anyhow::Result<()> {
    for (expression, expected) in OPERATOR_CASES {
        let mut schema = Schema::new();
        schema.with(accessor!(|m| m.ArrayProp), ArraySchema::from_predicate(Predicate::source(*expression))?)?;
        assert_case(*expected, &schema.build(), &json!({ "ArrayProp": [1, 2, 3, 4, 5, 6, 7, 8, 9, 10] }));
    }
    Ok(())
}

#[test]
fn array_uniqueness() -> anyhow::Result<()> {
    let model = json!({ "ArrayProp": [1, 2, 3, 3] });
    for (unique, expected) in [(None, true), (Some(false), true), (Some(true), false)] {
        let mut schema = Schema::new();
        schema.with(
            accessor!(|m| m.ArrayProp),
            ArraySchema::new(ArrayOptions { unique_items: unique, ..ArrayOptions::default() })?,
        )?;
        assert_case(expected, &schema.build(), &model);
    }
    Ok(())
}

#[test]
fn tuple_validation() -> anyhow::Result<()> {
    let open = ArraySchema::new(ArrayOptions {
        items: Some(ItemsOption::tuple([1, 2])),
        ..ArrayOptions::default()
    })?;
    let mut schema = Schema::new();
    schema.with(accessor!(|m| m.ArrayProp), open)?;
    let doc = schema.build();
    assert_valid(&doc, &json!({ "ArrayProp": [1, 2] }));
    assert_valid(&doc, &json!({ "ArrayProp": [1, 2, 3] }));
    assert_invalid(&doc, &json!({ "ArrayProp": [2, 1] }));

    let closed = ArraySchema::new(ArrayOptions {
        items: Some(ItemsOption::tuple([1, 2])),
        additional_items: Some(false),
        ..ArrayOptions::default()
    })?;
    let mut schema = Schema::new();
    schema.with(accessor!(|m| m.ArrayProp), closed)?;
    let doc = schema.build();
    assert_valid(&doc, &json!({ "ArrayProp": [1, 2] }));
    assert_invalid(&doc, &json!({ "ArrayProp": [1, 2, 3] }));
    Ok(())
}

#[test]
fn list_validation_with_nested_schema() -> anyhow::Result<()> {
    let mut item = Schema::new();
    item.with(accessor!(|x| x.Lvl3StrProp), StringSchema::new(StringOptions {
        min_length: Some(5),
        ..StringOptions::default()
    })?)?;
    let mut schema = Schema::new();
    schema.with(
        accessor!(|m| m.ObjArrayProp),
        ArraySchema::new(ArrayOptions {
            length: Some(predicate!(|x| x.len() >= 1)),
            items: Some(ItemsOption::list(item)),
            ..ArrayOptions::default()
        })?,
    )?;
    let doc = schema.build();
    assert_valid(&doc, &json!({ "ObjArrayProp": [{ "Lvl3StrProp": "aaaaa" }] }));
    assert_invalid(&doc, &json!({ "ObjArrayProp": [] }));
    assert_invalid(&doc, &json!({ "ObjArrayProp": [{ "Lvl3StrProp": "aaaa" }] }));
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// COMBINATORS
// ————————————————————————————————————————————————————————————————————————————

#[test]
fn any_of() -> anyhow::Result<()> {
    let any = AnyOf::new([
        Raw::from(Regex::new(r"^[A-z]+\.[A-z]+$")?),
        Raw::from(StringSchema::enumerated(["abc"])),
    ])?;
    let mut schema = Schema::new();
    schema.with(accessor!(|m| m.StringProp), any)?;
    let doc = schema.build();
    assert_valid(&doc, &json!({ "StringProp": "aaa.bbb" }));
    assert_valid(&doc, &json!({ "StringProp": "abc" }));
    assert_invalid(&doc, &json!({ "StringProp": "xyz" }));
    Ok(())
}

#[test]
fn one_of_rejects_double_match() -> anyhow::Result<()> {
    let one = OneOf::new([
        Raw::from(Regex::new(r"^[A-z]+\.[A-z]+$")?),
        Raw::from(StringSchema::from_predicate(predicate!(|x| x === 7))?),
    ])?;
    let mut schema = Schema::new();
    schema.with(accessor!(|m| m.StringProp), one)?;
    let doc = schema.build();
    assert_invalid(&doc, &json!({ "StringProp": "abc.def" }));
    assert_valid(&doc, &json!({ "StringProp": "ab.c" }));
    assert_valid(&doc, &json!({ "StringProp": "abcdefg" }));
    Ok(())
}

#[test]
fn all_of_and_not() -> anyhow::Result<()> {
    let all = AllOf::new([
        Raw::from(NumberSchema::from_predicate(predicate!(|x| x > 0))?),
        Raw::from(predicate!(|x| x <= 10)),
    ])?;
    let mut schema = Schema::new();
    schema
        .with(accessor!(|m| m.NumberProp), all)?
        .with(accessor!(|m| m.StringProp), Not::new("forbidden")?)?;
    let doc = schema.build();
    assert_valid(&doc, &json!({ "NumberProp": 10, "StringProp": "fine" }));
    assert_invalid(&doc, &json!({ "NumberProp": 0, "StringProp": "fine" }));
    assert_invalid(&doc, &json!({ "NumberProp": 5, "StringProp": "forbidden" }));
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// OBJECTS AND DICTIONARIES
// ————————————————————————————————————————————————————————————————————————————

#[test]
fn nested_path_requires_enclosing_objects() -> anyhow::Result<()> {
    let mut schema = Schema::new();
    schema.with(accessor!(|m| m.ObjProp.Lvl2ObjProp.Lvl3StrProp), Regex::new(r"^[a-zA-Z]+\.[a-zA-Z]+$")?)?;
    let doc = schema.build();
    assert_valid(&doc, &json!({ "ObjProp": { "Lvl2ObjProp": { "Lvl3StrProp": "aaa.bbb" } } }));
    assert_invalid(&doc, &json!({ "ObjProp": { "Lvl2ObjProp": {} } }));
    assert_invalid(&doc, &json!({}));
    Ok(())
}

#[test]
fn nested_schema_as_property() -> anyhow::Result<()> {
    let mut lvl2 = Schema::new();
    lvl2.with(accessor!(|x| x.Lvl2ObjProp.Lvl3StrProp), Regex::new(r"^[A-z]+\.[A-z]+$")?)?;
    let mut schema = Schema::new();
    schema.with(accessor!(|m| m.ObjProp), lvl2)?;
    let doc = schema.build();
    assert_valid(&doc, &json!({ "ObjProp": { "Lvl2ObjProp": { "Lvl3StrProp": "aaa.bbb" } } }));
    assert_invalid(&doc, &json!({ "ObjProp": { "Lvl2ObjProp": { "Lvl3StrProp": "aaa" } } }));
    Ok(())
}

fn dictionary_child_rules() -> anyhow::Result<DictionarySchema> {
    let mut item = Schema::new();
    item.with(accessor!(|x| x.Lvl3StrProp), StringSchema::new(StringOptions {
        min_length: Some(5),
        ..StringOptions::default()
    })?)?;

    let mut dict = DictionarySchema::new();
    dict.with(accessor!(|x| x.DictionaryChildStringProp), Regex::new(r"^[A-z]+\.[A-z]+$")?)?
        .with(accessor!(|x| x.DictionaryChildNumberProp), predicate!(|x| x > 100))?
        .with(
            accessor!(|x| x.DictionaryChildObjectArrayProp),
            ArraySchema::new(ArrayOptions {
                length: Some(predicate!(|x| x >= 1)),
                unique_items: Some(true),
                items: Some(ItemsOption::list(item)),
                ..ArrayOptions::default()
            })?,
        )?;
    Ok(dict)
}

#[test]
fn dictionary_reports_each_violation() -> anyhow::Result<()> {
    let mut schema = Schema::new();
    schema.with(accessor!(|m| m.DictionaryProp), dictionary_child_rules()?)?;
    let doc = schema.build();

    let instance = json!({
        "DictionaryProp": {
            "Key1": {
                "DictionaryChildStringProp": "aaa",
                "DictionaryChildNumberProp": 50,
                "DictionaryChildObjectArrayProp": [
                    { "Lvl3StrProp": "aaaaa" },
                    { "Lvl3StrProp": "aaaaa" }
                ]
            }
        }
    });
    let v = validator(&doc);
    let errors: Vec<_> = v.iter_errors(&instance).collect();
    assert_eq!(errors.len(), 3);

    let pattern = errors
        .iter()
        .find(|e| matches!(e.kind, ValidationErrorKind::Pattern { .. }))
        .expect("pattern failure");
    assert_eq!(pattern.instance_path.to_string(), "/DictionaryProp/Key1/DictionaryChildStringProp");

    let unique = errors
        .iter()
        .find(|e| matches!(e.kind, ValidationErrorKind::UniqueItems))
        .expect("uniqueItems failure");
    assert_eq!(unique.instance_path.to_string(), "/DictionaryProp/Key1/DictionaryChildObjectArrayProp");

    assert!(errors
        .iter()
        .any(|e| e.instance_path.to_string() == "/DictionaryProp/Key1/DictionaryChildNumberProp"));
    Ok(())
}

#[test]
fn optional_dictionary_may_be_absent_but_not_invalid() -> anyhow::Result<()> {
    let mut dict = DictionarySchema::new().optional();
    dict.with(accessor!(|x| x.DictionaryChildStringProp), StringSchema::new(StringOptions {
        min_length: Some(10),
        ..StringOptions::default()
    })?)?;
    let mut schema = Schema::new();
    schema.with(accessor!(|m| m.DictionaryProp), dict)?;
    let doc = schema.build();

    assert_valid(&doc, &json!({}));
    assert_invalid(&doc, &json!({ "DictionaryProp": { "Key1": { "DictionaryChildStringProp": "" } } }));
    Ok(())
}

#[test]
fn double_nested_dictionaries() -> anyhow::Result<()> {
    let mut leaf = DictionarySchema::new();
    leaf.with(accessor!(|x| x.DictionaryChildNumberProp), predicate!(|x| x < 100))?;

    // both spellings describe "every value of every value"
    let mut via_dictionary = DictionarySchema::new();
    via_dictionary.with(accessor!(|x| x), leaf.clone())?;
    let mut via_schema = Schema::new();
    via_schema.with(accessor!(|x| x), leaf)?;

    for nested in [Raw::from(via_dictionary), Raw::from(via_schema)] {
        let mut schema = Schema::new();
        schema.with(accessor!(|x| x.NestedDictionaryProp), nested)?;
        let doc = schema.build();
        assert_valid(&doc, &json!({
            "NestedDictionaryProp": { "KeyA": { "KeyA1": { "DictionaryChildNumberProp": 50 } } }
        }));
        assert_invalid(&doc, &json!({
            "NestedDictionaryProp": { "KeyA": { "KeyA1": { "DictionaryChildNumberProp": 500 } } }
        }));
    }
    Ok(())
}

#[test]
fn quoted_property_names() -> anyhow::Result<()> {
    let mut schema = Schema::new();
    schema.with(r#"m => m["Quote-Prop"]"#, "x-y")?;
    let doc = schema.build();
    assert_valid(&doc, &json!({ "Quote-Prop": "x-y" }));
    assert_invalid(&doc, &json!({ "Quote-Prop": "x_y" }));
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// META-SCHEMA
// ————————————————————————————————————————————————————————————————————————————

fn assert_draft4_document(doc: &Value) {
    if let Err(err) = jsonschema::draft4::meta::validate(doc) {
        panic!("not a draft-04 schema: {err}\n{doc:#}");
    }
}

#[test]
fn emitted_number_rules_satisfy_the_meta_schema() -> anyhow::Result<()> {
    let mut schema = Schema::new();
    schema
        .with(accessor!(|m| m.Above), predicate!(|x| x > 1))?
        .with(accessor!(|m| m.Below), NumberSchema::from_predicate(predicate!(|x| x < 5))?)?
        .with(
            accessor!(|m| m.Flagged),
            NumberSchema::new(NumberOptions {
                minimum: Some(0.0),
                exclusive_minimum: Some(true),
                multiple_of: Some(0.5),
                ..NumberOptions::default()
            })?,
        )?;
    assert_draft4_document(&schema.build());
    Ok(())
}

#[test]
fn exclusive_flag_without_bound_is_refused() {
    let dangling = NumberSchema::new(NumberOptions { exclusive_minimum: Some(true), ..NumberOptions::default() });
    assert!(dangling.is_err());
}

#[test]
fn overflowing_predicate_literal_is_refused() {
    let mut schema = Schema::new();
    assert!(schema.with(accessor!(|m| m.N), Predicate::source("x => x < 1e999")).is_err());
    assert!(schema.root().properties.is_empty());
    assert_draft4_document(&schema.build());
}
