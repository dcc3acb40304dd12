//! Source and join specifications.
//!
//! These are the typed form of the nested source/join description. Each
//! spec validates itself so configuration mistakes surface when a session
//! is built rather than halfway through rendering a query.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// One physical column mapped to one output column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Column on the physical table.
    pub column: String,
    /// Name of the column in the result set (`AS` alias).
    pub alias: String,
}

impl FieldMapping {
    pub fn new(column: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            alias: alias.into(),
        }
    }
}

/// The anchor table every join is expressed relative to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Physical table name (e.g. `applications_application`).
    pub table: String,
    /// Short alias used throughout the rendered query.
    pub alias: String,
    /// Ordered output fields.
    pub fields: Vec<FieldMapping>,
    /// Project (tenant) filter value.
    pub project: i64,
    /// Column the result is ordered by.
    pub order_by: String,
}

impl SourceSpec {
    /// Output column names in declaration order.
    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.alias.as_str())
    }

    pub fn validate(&self) -> Result<()> {
        let component = "source";
        require_ident(component, "table", &self.table)?;
        require_ident(component, "alias", &self.alias)?;
        require_ident(component, "order_by", &self.order_by)?;
        validate_fields(component, &self.fields)
    }
}

/// Which table supplies the left side of a join's linking condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionSource {
    /// The anchor table itself.
    #[serde(rename = "JOIN_SOURCE")]
    JoinSource,
    /// The shared answer-linking table of the first join.
    #[serde(rename = "DATA_SOURCE")]
    DataSource,
}

/// Ordered cleaning directives for one output column.
///
/// A directive may carry an argument after a colon, e.g.
/// `date-convert:%m/%d/%Y`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanDirective {
    pub field: String,
    pub ops: Vec<String>,
}

impl CleanDirective {
    pub fn new<I, S>(field: impl Into<String>, ops: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            ops: ops.into_iter().map(Into::into).collect(),
        }
    }
}

/// One table attached to the anchor through the answer-linking table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSpec {
    /// Alias of the joined table; unique within a package.
    pub alias: String,
    pub question_source: QuestionSource,
    /// Column on the left side of the linking condition.
    pub source_id: String,
    /// Column on the linking table matched against `source_id`.
    pub join_id: String,
    /// Question filter applied to the linking table.
    pub question_id: i64,
    /// Physical table joined through the linking table.
    pub data_source: String,
    pub fields: Vec<FieldMapping>,
    #[serde(default)]
    pub clean: Vec<CleanDirective>,
}

impl JoinSpec {
    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.alias.as_str())
    }

    pub fn validate(&self) -> Result<()> {
        let component = format!("join `{}`", self.alias);
        require_ident(&component, "alias", &self.alias)?;
        require_ident(&component, "source_id", &self.source_id)?;
        require_ident(&component, "join_id", &self.join_id)?;
        require_ident(&component, "data_source", &self.data_source)?;
        validate_fields(&component, &self.fields)?;

        for directive in &self.clean {
            if !self.output_names().any(|name| name == directive.field) {
                return Err(ConfigError::CleanFieldNotMapped {
                    join: self.alias.clone(),
                    field: directive.field.clone(),
                });
            }
        }
        Ok(())
    }
}

fn require_ident(component: &str, key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::invalid(component, format!("`{key}` is empty")));
    }
    Ok(())
}

fn validate_fields(component: &str, fields: &[FieldMapping]) -> Result<()> {
    if fields.is_empty() {
        return Err(ConfigError::invalid(component, "fields list is empty"));
    }
    for (idx, field) in fields.iter().enumerate() {
        if field.column.trim().is_empty() || field.alias.trim().is_empty() {
            return Err(ConfigError::invalid(
                component,
                format!("field mapping #{} has an empty column or alias", idx + 1),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join(alias: &str) -> JoinSpec {
        JoinSpec {
            alias: alias.to_string(),
            question_source: QuestionSource::JoinSource,
            source_id: "id".to_string(),
            join_id: "application_id".to_string(),
            question_id: 1015,
            data_source: "application_data_textboxanswer".to_string(),
            fields: vec![FieldMapping::new("value", "hotel_name")],
            clean: vec![CleanDirective::new("hotel_name", ["null-or-empty"])],
        }
    }

    #[test]
    fn valid_join_passes() {
        join("hotel_name").validate().expect("valid join");
    }

    #[test]
    fn clean_field_must_be_own_output() {
        let mut spec = join("hotel_name");
        spec.clean.push(CleanDirective::new("hotel_city", ["null-or-empty"]));
        let error = spec.validate().unwrap_err();
        assert!(matches!(
            error,
            ConfigError::CleanFieldNotMapped { ref field, .. } if field == "hotel_city"
        ));
    }

    #[test]
    fn empty_fields_rejected() {
        let mut spec = join("hotel_name");
        spec.fields.clear();
        spec.clean.clear();
        let error = spec.validate().unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid join `hotel_name`: fields list is empty"
        );
    }

    #[test]
    fn source_requires_order_column() {
        let source = SourceSpec {
            table: "applications_application".to_string(),
            alias: "app".to_string(),
            fields: vec![FieldMapping::new("id", "id")],
            project: 34,
            order_by: " ".to_string(),
        };
        let error = source.validate().unwrap_err();
        assert_eq!(error.to_string(), "invalid source: `order_by` is empty");
    }
}
