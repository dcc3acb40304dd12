//! Query and schema derivation.
//!
//! Both the SQL text and the expected output schema come from the same
//! source/join description, so they cannot drift apart:
//!
//! - **sql**: renders the `SELECT ... LEFT JOIN ...` statement
//! - **schema**: derives (or accepts) the expected output column list

pub mod schema;
pub mod sql;

pub use schema::{Schema, build_schema, derive_schema};
pub use sql::{
    FIRST_LINK_ALIAS, LINKING_TABLE, build_query, linking_alias, render_package, render_validated,
};
