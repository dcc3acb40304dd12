//! Query packages: one source plus its ordered joins.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, Result};
use crate::spec::{JoinSpec, QuestionSource, SourceSpec};

/// A source table and the joins attached to it.
///
/// Join order is significant: it fixes both the join emission order and the
/// linking-table alias counter in the rendered query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPackage {
    pub source: SourceSpec,
    pub joins: Vec<JoinSpec>,
}

impl QueryPackage {
    pub fn new(source: SourceSpec, joins: Vec<JoinSpec>) -> Self {
        Self { source, joins }
    }

    /// Parse a package from JSON without validating it.
    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Read and parse a package file without validating it.
    pub fn load(path: &Path) -> Result<Self> {
        let input = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&input)
    }

    /// Look up a join by alias.
    pub fn join(&self, alias: &str) -> Option<&JoinSpec> {
        self.joins.iter().find(|j| j.alias == alias)
    }

    /// Output column names: source fields first, then each join in order.
    /// Duplicates are kept.
    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.source
            .output_names()
            .chain(self.joins.iter().flat_map(|join| join.output_names()))
    }

    /// Validate the whole package. See [`validate_parts`].
    pub fn validate(&self) -> Result<()> {
        validate_parts(&self.source, &self.joins)
    }
}

/// Validate a source and its joins as one package.
///
/// Requires at least one join, a `JOIN_SOURCE` first join and unique join
/// aliases. Duplicate output names across joins are allowed but logged,
/// since they collide in the result set.
pub fn validate_parts(source: &SourceSpec, joins: &[JoinSpec]) -> Result<()> {
    source.validate()?;

    let Some(first) = joins.first() else {
        return Err(ConfigError::MissingComponent {
            component: "query package",
            missing: "join list (at least one join is required)",
        });
    };
    if first.question_source == QuestionSource::DataSource {
        return Err(ConfigError::invalid(
            format!("join `{}`", first.alias),
            "the first join must use JOIN_SOURCE; DATA_SOURCE needs an earlier linking join",
        ));
    }

    let mut aliases = BTreeSet::new();
    for join in joins {
        join.validate()?;
        if join.alias == source.alias || !aliases.insert(join.alias.as_str()) {
            return Err(ConfigError::invalid(
                format!("join `{}`", join.alias),
                "alias is already used in this package",
            ));
        }
    }

    let mut seen = BTreeSet::new();
    let names = source
        .output_names()
        .chain(joins.iter().flat_map(|join| join.output_names()));
    for name in names {
        if !seen.insert(name) {
            warn!(column = name, "duplicate output column in query package");
        }
    }
    Ok(())
}
