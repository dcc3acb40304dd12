//! CLI argument definitions for rds-extract.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "rds-extract",
    version,
    about = "Extract application tables from the RDS database using query packages",
    long_about = "Render, plan and run query packages.\n\n\
                  A query package describes an anchor table and the answer tables joined\n\
                  to it. rds-extract builds the SQL, validates the result against the\n\
                  expected columns and applies the package's cleaning directives."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Teams incoming-webhook URL for failure and success notifications.
    #[arg(long, env = "RDS_TEAMS_WEBHOOK", value_name = "URL", global = true)]
    pub webhook: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the SQL and expected columns for a query package.
    Render(PackageArgs),

    /// Print the clean plan for a query package.
    Plan(PackageArgs),

    /// Execute a query package (or raw query) and export the result.
    Run(RunArgs),
}

#[derive(Args)]
pub struct PackageArgs {
    /// Path to the query package JSON file.
    #[arg(value_name = "PACKAGE")]
    pub package: PathBuf,

    /// Columns to drop from the expected schema.
    #[arg(long, value_delimiter = ',', value_name = "COLUMNS")]
    pub exclude: Vec<String>,
}

#[derive(Args)]
pub struct RunArgs {
    /// Path to the query package JSON file.
    #[arg(
        value_name = "PACKAGE",
        required_unless_present = "raw_query",
        conflicts_with = "raw_query"
    )]
    pub package: Option<PathBuf>,

    /// File holding a raw SQL query to run instead of a package.
    #[arg(long = "raw-query", value_name = "FILE", requires = "schema")]
    pub raw_query: Option<PathBuf>,

    /// Expected columns of the raw query, comma separated.
    #[arg(
        long,
        value_delimiter = ',',
        value_name = "COLUMNS",
        requires = "raw_query"
    )]
    pub schema: Vec<String>,

    /// Columns to drop from the expected schema.
    #[arg(long, value_delimiter = ',', value_name = "COLUMNS")]
    pub exclude: Vec<String>,

    /// Skip the clean plan; only validate and de-duplicate.
    #[arg(long = "no-clean")]
    pub no_clean: bool,

    /// Write the table to this CSV file (default: stdout).
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write rows removed while cleaning to this CSV file.
    #[arg(long, value_name = "PATH")]
    pub removed: Option<PathBuf>,

    #[command(flatten)]
    pub db: DbArgs,
}

#[derive(Args)]
pub struct DbArgs {
    #[arg(long = "db-user", env = "RDS_USER", value_name = "USER")]
    pub user: String,

    #[arg(
        long = "db-password",
        env = "RDS_PASS",
        value_name = "PASSWORD",
        hide_env_values = true
    )]
    pub password: String,

    #[arg(long = "db-name", env = "RDS_DB", value_name = "NAME")]
    pub database: String,

    #[arg(long = "db-host", env = "RDS_SERVER", value_name = "HOST")]
    pub host: String,

    #[arg(long = "db-port", env = "RDS_PORT", default_value_t = rds_postgres::DEFAULT_PORT)]
    pub port: u16,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
