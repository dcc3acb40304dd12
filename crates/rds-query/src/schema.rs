//! Expected output schema.
//!
//! The schema is presence-only: a list of column names the result set must
//! contain. Types are not checked.

use std::collections::HashSet;

use rds_model::{ConfigError, JoinSpec, SourceSpec, validate_parts};
use serde::Serialize;

/// Ordered list of expected output column names.
///
/// Duplicates are kept as declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema(Vec<String>);

impl Schema {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(columns.into_iter().map(Into::into).collect())
    }

    pub fn columns(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|c| c == name)
    }

    /// Drop every column named in `exclude`.
    #[must_use]
    pub fn without(self, exclude: &[String]) -> Self {
        Self(
            self.0
                .into_iter()
                .filter(|c| !exclude.contains(c))
                .collect(),
        )
    }

    /// Expected columns absent from `present`, in schema order.
    pub fn missing_from<'a, I>(&self, present: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let present: HashSet<&str> = present.into_iter().collect();
        self.0
            .iter()
            .filter(|c| !present.contains(c.as_str()))
            .cloned()
            .collect()
    }
}

impl From<Vec<String>> for Schema {
    fn from(columns: Vec<String>) -> Self {
        Self(columns)
    }
}

/// Output names of parts that already passed [`validate_parts`]: source
/// fields first, then each join in order.
pub fn derive_schema(source: &SourceSpec, joins: &[JoinSpec]) -> Schema {
    Schema::new(
        source
            .output_names()
            .chain(joins.iter().flat_map(|join| join.output_names())),
    )
}

/// Resolve the expected schema for a session.
///
/// Exactly one of {source + joins} or {schema} must be supplied. The derived
/// form lists source output names, then every join's output names, in
/// declaration order. `exclude` filters either form.
pub fn build_schema(
    source: Option<&SourceSpec>,
    joins: Option<&[JoinSpec]>,
    schema: Option<&[String]>,
    exclude: Option<&[String]>,
) -> Result<Schema, ConfigError> {
    let resolved = match (schema, source, joins) {
        (Some(columns), None, None) => Schema::new(columns.iter().cloned()),
        (Some(_), _, _) => return Err(ConfigError::AmbiguousEntry { component: "schema" }),
        (None, Some(source), Some(joins)) => {
            validate_parts(source, joins)?;
            derive_schema(source, joins)
        }
        (None, Some(_), None) => {
            return Err(ConfigError::MissingComponent {
                component: "schema",
                missing: "join list",
            });
        }
        (None, None, Some(_)) => {
            return Err(ConfigError::MissingComponent {
                component: "schema",
                missing: "source",
            });
        }
        (None, None, None) => {
            return Err(ConfigError::MissingComponent {
                component: "schema",
                missing: "explicit schema or source with joins",
            });
        }
    };

    Ok(match exclude {
        Some(exclude) => resolved.without(exclude),
        None => resolved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_from_keeps_schema_order() {
        let schema = Schema::new(["x", "y", "z", "w"]);
        let missing = schema.missing_from(["w", "y"]);
        assert_eq!(missing, vec!["x".to_string(), "z".to_string()]);
    }

    #[test]
    fn without_removes_every_occurrence() {
        let schema = Schema::new(["a", "b", "a"]);
        let filtered = schema.without(&["a".to_string()]);
        assert_eq!(filtered.columns(), ["b".to_string()]);
    }
}
