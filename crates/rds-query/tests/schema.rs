//! Tests for schema derivation.

use rds_model::{ConfigError, FieldMapping, JoinSpec, QuestionSource, SourceSpec};
use rds_query::{Schema, build_schema, derive_schema};

fn source() -> SourceSpec {
    SourceSpec {
        table: "t".to_string(),
        alias: "s".to_string(),
        fields: vec![FieldMapping::new("a", "x"), FieldMapping::new("b", "y")],
        project: 1,
        order_by: "id".to_string(),
    }
}

fn joins() -> Vec<JoinSpec> {
    vec![JoinSpec {
        alias: "j".to_string(),
        question_source: QuestionSource::JoinSource,
        source_id: "id".to_string(),
        join_id: "application_id".to_string(),
        question_id: 7,
        data_source: "answers".to_string(),
        fields: vec![FieldMapping::new("c", "z")],
        clean: vec![],
    }]
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

#[test]
fn derives_schema_in_declaration_order() {
    let joins = joins();
    let schema = build_schema(Some(&source()), Some(joins.as_slice()), None, None).unwrap();
    assert_eq!(schema, Schema::new(["x", "y", "z"]));
    assert_eq!(derive_schema(&source(), &joins), schema);
}

#[test]
fn exclude_filters_derived_schema() {
    let joins = joins();
    let exclude = strings(&["y"]);
    let schema = build_schema(Some(&source()), Some(joins.as_slice()), None, Some(exclude.as_slice())).unwrap();
    assert_eq!(schema.columns(), strings(&["x", "z"]).as_slice());
}

#[test]
fn explicit_schema_is_returned_unchanged() {
    let explicit = strings(&["b", "a", "b"]);
    let schema = build_schema(None, None, Some(explicit.as_slice()), None).unwrap();
    assert_eq!(schema.columns(), explicit.as_slice());
}

#[test]
fn exclude_filters_explicit_schema() {
    let explicit = strings(&["a", "b"]);
    let exclude = strings(&["a", "unknown"]);
    let schema = build_schema(None, None, Some(explicit.as_slice()), Some(exclude.as_slice())).unwrap();
    assert_eq!(schema.columns(), strings(&["b"]).as_slice());
}

#[test]
fn duplicate_output_names_are_preserved() {
    let mut joins = joins();
    joins[0].fields.push(FieldMapping::new("d", "x"));
    let schema = build_schema(Some(&source()), Some(joins.as_slice()), None, None).unwrap();
    assert_eq!(schema, Schema::new(["x", "y", "z", "x"]));
}

#[test]
fn both_modes_are_ambiguous() {
    let joins = joins();
    let explicit = strings(&["x"]);
    let error = build_schema(Some(&source()), Some(joins.as_slice()), Some(explicit.as_slice()), None).unwrap_err();
    assert!(matches!(error, ConfigError::AmbiguousEntry { component: "schema" }));
}

#[test]
fn neither_mode_is_rejected() {
    let error = build_schema(None, None, None, None).unwrap_err();
    assert!(matches!(error, ConfigError::MissingComponent { component: "schema", .. }));
}
