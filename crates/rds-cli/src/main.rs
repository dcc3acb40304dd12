//! rds-extract CLI.

use clap::{ColorChoice, Parser};
use rds_cli::logging::{LogConfig, LogFormat, init_logging};
use rds_notify::TeamsNotifier;
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;
use tracing::warn;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_extract, run_plan, run_render};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let notifier = cli
        .webhook
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .and_then(|url| match TeamsNotifier::new(url) {
            Ok(notifier) => Some(notifier),
            Err(error) => {
                warn!(%error, "notifications disabled");
                None
            }
        });

    let result = match &cli.command {
        Command::Render(args) => run_render(args),
        Command::Plan(args) => run_plan(args),
        Command::Run(args) => run_extract(args, notifier.as_ref()),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_accepts_raw_query_with_schema() {
        let cli = Cli::try_parse_from([
            "rds-extract",
            "run",
            "--raw-query",
            "q.sql",
            "--schema",
            "id,name",
            "--db-user",
            "u",
            "--db-password",
            "p",
            "--db-name",
            "d",
            "--db-host",
            "h",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.schema, vec!["id", "name"]);
        assert!(args.package.is_none());
        assert_eq!(args.db.port, 5432);
    }

    #[test]
    fn run_rejects_package_and_raw_query() {
        let result = Cli::try_parse_from([
            "rds-extract",
            "run",
            "package.json",
            "--raw-query",
            "q.sql",
            "--schema",
            "id",
            "--db-user",
            "u",
            "--db-password",
            "p",
            "--db-name",
            "d",
            "--db-host",
            "h",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn log_level_flag_disables_env_filter() {
        let cli = Cli::try_parse_from(["rds-extract", "--log-level", "debug", "render", "p.json"])
            .unwrap();
        let config = log_config_from_cli(&cli);
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
        assert!(!config.use_env_filter);
    }
}
