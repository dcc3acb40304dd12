//! Tests for clean plan construction.

use rds_model::{CleanDirective, ConfigError, FieldMapping, JoinSpec, QuestionSource};
use rds_transform::{CleanOperation, build_clean_plan};

fn join(alias: &str, fields: &[&str], clean: Vec<CleanDirective>) -> JoinSpec {
    JoinSpec {
        alias: alias.to_string(),
        question_source: QuestionSource::JoinSource,
        source_id: "id".to_string(),
        join_id: "application_id".to_string(),
        question_id: 1,
        data_source: "applications_textanswer".to_string(),
        fields: fields
            .iter()
            .map(|f| FieldMapping::new("answer", *f))
            .collect(),
        clean,
    }
}

#[test]
fn plan_follows_join_then_directive_then_op_order() {
    let joins = vec![
        join(
            "stay",
            &["arrival", "nights"],
            vec![
                CleanDirective::new("arrival", ["NULL", "DATE_CONVERT"]),
                CleanDirective::new("nights", ["int-convert"]),
            ],
        ),
        join(
            "guest",
            &["age"],
            vec![CleanDirective::new("age", ["null-or-empty"])],
        ),
    ];

    let plan = build_clean_plan(&joins).unwrap();
    let summary: Vec<_> = plan
        .iter()
        .map(|step| format!("{}:{}", step.field, step.operation.name()))
        .collect();
    assert_eq!(
        summary,
        vec![
            "arrival:drop-if-null",
            "arrival:to-date",
            "nights:to-integer",
            "age:drop-if-null",
        ]
    );
}

#[test]
fn no_directives_gives_empty_plan() {
    let plan = build_clean_plan(&[join("stay", &["arrival"], vec![])]).unwrap();
    assert!(plan.is_empty());
    assert!(build_clean_plan(&[]).unwrap().is_empty());
}

#[test]
fn unknown_directive_fails_the_plan() {
    let joins = vec![join(
        "stay",
        &["arrival"],
        vec![CleanDirective::new("arrival", ["NULL", "UPPERCASE"])],
    )];
    let err = build_clean_plan(&joins).unwrap_err();
    assert!(
        matches!(err, ConfigError::UnknownDirective { ref directive, .. } if directive == "UPPERCASE")
    );
}

#[test]
fn date_format_argument_reaches_the_step() {
    let joins = vec![join(
        "stay",
        &["arrival"],
        vec![CleanDirective::new("arrival", ["date-convert:%d/%m/%Y"])],
    )];
    let plan = build_clean_plan(&joins).unwrap();
    assert_eq!(
        plan.steps()[0].operation,
        CleanOperation::ToDate {
            output_format: Some("%d/%m/%Y".to_string())
        }
    );
}

#[test]
fn plan_serializes_with_operation_tag() {
    let joins = vec![join(
        "guest",
        &["age"],
        vec![CleanDirective::new("age", ["INT_CONVERT"])],
    )];
    let plan = build_clean_plan(&joins).unwrap();
    let json = serde_json::to_string(&plan.steps()[0]).unwrap();
    insta::assert_snapshot!(json, @r#"{"field":"age","operation":{"operation":"to-integer"}}"#);
}
