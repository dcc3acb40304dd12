use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors raised while validating or resolving a query package.
///
/// Every variant names the offending component, field or directive.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Both entry modes (raw query and source/join package) were supplied.
    #[error("{component}: supply either a raw query or a source with joins, not both")]
    AmbiguousEntry { component: &'static str },

    /// A required part of the configuration was not supplied.
    #[error("{component}: missing {missing}")]
    MissingComponent {
        component: &'static str,
        missing: &'static str,
    },

    /// A source or join spec failed validation.
    #[error("invalid {component}: {reason}")]
    InvalidSpec { component: String, reason: String },

    /// A cleaning directive has no registered operation.
    #[error("cleaning directive `{directive}` on field `{field}` did not match any operation")]
    UnknownDirective { field: String, directive: String },

    /// A directive was given an argument it does not accept.
    #[error("cleaning directive `{directive}` on field `{field}` does not take an argument")]
    UnexpectedArgument { field: String, directive: String },

    /// A cleaning directive references a column the join does not output.
    #[error("join `{join}` cleans field `{field}` which is not one of its output fields")]
    CleanFieldNotMapped { join: String, field: String },

    /// Rename lists have different lengths.
    #[error("rename needs matching lists: {from} current names but {to} new names")]
    RenameArity { from: usize, to: usize },

    #[error("failed to read query package {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse query package: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn invalid(component: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            component: component.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
