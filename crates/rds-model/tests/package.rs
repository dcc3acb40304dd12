//! Tests for query package loading and validation.

use std::io::Write;

use rds_model::{ConfigError, QueryPackage, QuestionSource};

const PACKAGE_JSON: &str = r#"{
    "source": {
        "table": "applications_application",
        "alias": "app",
        "fields": [
            {"column": "application_number", "alias": "application_number"},
            {"column": "created_at", "alias": "created_at"}
        ],
        "project": 34,
        "order_by": "id"
    },
    "joins": [
        {
            "alias": "hotel_name",
            "question_source": "JOIN_SOURCE",
            "source_id": "id",
            "join_id": "application_id",
            "question_id": 1015,
            "data_source": "application_data_textboxanswer",
            "fields": [{"column": "value", "alias": "hotel_name"}],
            "clean": [{"field": "hotel_name", "ops": ["NULL"]}]
        },
        {
            "alias": "hotel_status",
            "question_source": "DATA_SOURCE",
            "source_id": "repeating_answer_section_id",
            "join_id": "repeating_answer_section_id",
            "question_id": 1013,
            "data_source": "application_data_singleselectanswer",
            "fields": [{"column": "value", "alias": "hotel_status"}]
        }
    ]
}"#;

#[test]
fn parses_package_json() {
    let package = QueryPackage::from_json_str(PACKAGE_JSON).unwrap();
    package.validate().unwrap();

    assert_eq!(package.source.alias, "app");
    assert_eq!(package.joins.len(), 2);
    assert!(package.joins[1].clean.is_empty());
    assert_eq!(
        package.join("hotel_status").map(|j| j.question_source),
        Some(QuestionSource::DataSource)
    );
    let names: Vec<&str> = package.output_names().collect();
    assert_eq!(
        names,
        vec!["application_number", "created_at", "hotel_name", "hotel_status"]
    );
}

#[test]
fn loads_package_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PACKAGE_JSON.as_bytes()).unwrap();

    let package = QueryPackage::load(file.path()).unwrap();
    assert_eq!(package.source.project, 34);
}

#[test]
fn missing_file_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    let error = QueryPackage::load(&path).unwrap_err();
    assert!(matches!(error, ConfigError::Io { .. }));
    assert!(error.to_string().contains("missing.json"));
}

#[test]
fn empty_join_list_rejected() {
    let mut package = QueryPackage::from_json_str(PACKAGE_JSON).unwrap();
    package.joins.clear();
    let error = package.validate().unwrap_err();
    assert!(matches!(error, ConfigError::MissingComponent { .. }));
}

#[test]
fn duplicate_join_alias_rejected() {
    let mut package = QueryPackage::from_json_str(PACKAGE_JSON).unwrap();
    package.joins[1].alias = "hotel_name".to_string();
    let error = package.validate().unwrap_err();
    assert_eq!(
        error.to_string(),
        "invalid join `hotel_name`: alias is already used in this package"
    );
}

#[test]
fn first_join_cannot_be_data_source() {
    let mut package = QueryPackage::from_json_str(PACKAGE_JSON).unwrap();
    package.joins.swap(0, 1);
    let error = package.validate().unwrap_err();
    assert!(error.to_string().starts_with("invalid join `hotel_status`"));
}

#[test]
fn duplicate_output_names_are_allowed() {
    let mut package = QueryPackage::from_json_str(PACKAGE_JSON).unwrap();
    package.joins[1].fields[0].alias = "hotel_name".to_string();
    package.validate().unwrap();
    let names: Vec<&str> = package.output_names().collect();
    assert_eq!(names.iter().filter(|n| **n == "hotel_name").count(), 2);
}
