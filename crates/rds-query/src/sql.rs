//! SQL rendering for query packages.
//!
//! Each join is attached through the shared answer-linking table: one
//! `LEFT JOIN` onto the linking table filtered by question, then one onto the
//! join's own answer table. Values are interpolated as-is; packages are
//! trusted configuration, not user input.

use rds_model::{ConfigError, JoinSpec, QueryPackage, QuestionSource, SourceSpec, validate_parts};
use tracing::debug;

/// The shared answer-linking table every join goes through.
pub const LINKING_TABLE: &str = "application_data_answer";

/// Alias of the linking table for the first join.
pub const FIRST_LINK_ALIAS: &str = "initial_join_answers";

/// Linking-table alias for the join at `index`.
///
/// ```
/// use rds_query::linking_alias;
///
/// assert_eq!(linking_alias(0), "initial_join_answers");
/// assert_eq!(linking_alias(1), "join_answers_1");
/// assert_eq!(linking_alias(4), "join_answers_4");
/// ```
pub fn linking_alias(index: usize) -> String {
    if index == 0 {
        FIRST_LINK_ALIAS.to_string()
    } else {
        format!("join_answers_{index}")
    }
}

/// Resolve the query for a session.
///
/// Exactly one entry mode is accepted:
/// - a raw query alone, returned unchanged
/// - a source plus a non-empty join list, rendered to SQL
///
/// Any other combination is a [`ConfigError`] naming the missing or
/// conflicting component.
pub fn build_query(
    source: Option<&SourceSpec>,
    joins: Option<&[JoinSpec]>,
    raw: Option<&str>,
) -> Result<String, ConfigError> {
    match (raw, source, joins) {
        (Some(query), None, None) => Ok(query.to_string()),
        (Some(_), _, _) => Err(ConfigError::AmbiguousEntry { component: "query" }),
        (None, Some(source), Some(joins)) => {
            validate_parts(source, joins)?;
            Ok(render_validated(source, joins))
        }
        (None, Some(_), None) => Err(ConfigError::MissingComponent {
            component: "query",
            missing: "join list",
        }),
        (None, None, Some(_)) => Err(ConfigError::MissingComponent {
            component: "query",
            missing: "source",
        }),
        (None, None, None) => Err(ConfigError::MissingComponent {
            component: "query",
            missing: "raw query or source with joins",
        }),
    }
}

/// Render a validated package.
pub fn render_package(package: &QueryPackage) -> Result<String, ConfigError> {
    build_query(Some(&package.source), Some(package.joins.as_slice()), None)
}

/// Render SQL for parts that already passed [`validate_parts`].
pub fn render_validated(source: &SourceSpec, joins: &[JoinSpec]) -> String {
    let columns: Vec<String> = source
        .fields
        .iter()
        .map(|f| select_column(&source.alias, &f.column, &f.alias))
        .chain(joins.iter().flat_map(|join| {
            join.fields
                .iter()
                .map(|f| select_column(&join.alias, &f.column, &f.alias))
        }))
        .collect();

    let mut sql = String::from("SELECT\n");
    let last = columns.len().saturating_sub(1);
    for (idx, column) in columns.iter().enumerate() {
        let separator = if idx == last { "" } else { "," };
        sql.push_str(&format!("    {column}{separator}\n"));
    }

    sql.push_str("\nFROM\n");
    sql.push_str(&format!("    {} {}\n", source.table, source.alias));

    for (index, join) in joins.iter().enumerate() {
        sql.push_str(&render_join(source, join, &linking_alias(index)));
    }

    sql.push_str("\nWHERE\n");
    sql.push_str(&format!("    {}.project_id = {}\n", source.alias, source.project));
    sql.push_str("ORDER BY\n");
    sql.push_str(&format!("    {}.{};", source.alias, source.order_by));

    debug!(
        joins = joins.len(),
        columns = columns.len(),
        length = sql.len(),
        "rendered query"
    );
    sql
}

fn select_column(table_alias: &str, column: &str, output: &str) -> String {
    format!("{table_alias}.{column} AS {output}")
}

fn render_join(source: &SourceSpec, join: &JoinSpec, link: &str) -> String {
    // DATA_SOURCE joins anchor on the first linking alias.
    let left = match join.question_source {
        QuestionSource::JoinSource => source.alias.as_str(),
        QuestionSource::DataSource => FIRST_LINK_ALIAS,
    };
    format!(
        "\nLEFT JOIN {LINKING_TABLE} {link} ON {left}.{source_id} = {link}.{join_id} \
         AND {link}.question_id = {question_id}\n\
         LEFT JOIN {table} {alias} ON {link}.id = {alias}.answer_ptr_id\n",
        source_id = join.source_id,
        join_id = join.join_id,
        question_id = join.question_id,
        table = join.data_source,
        alias = join.alias,
    )
}
