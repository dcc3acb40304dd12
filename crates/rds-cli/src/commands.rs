use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{error, info, info_span};

use rds_core::{SessionOptions, TableSession};
use rds_model::QueryPackage;
use rds_notify::{AlertKind, TeamsNotifier};
use rds_postgres::{Credentials, connect};

use rds_cli::export::{write_csv, write_removed};
use rds_cli::summary::{audit_table, plan_table};

use crate::cli::{PackageArgs, RunArgs};

fn load_session(args: &PackageArgs) -> Result<TableSession> {
    let package = QueryPackage::load(&args.package)?;
    let options = SessionOptions::default().with_exclude(args.exclude.iter().cloned());
    TableSession::from_package(package, &options)
        .with_context(|| format!("build session for {}", args.package.display()))
}

pub fn run_render(args: &PackageArgs) -> Result<()> {
    let session = load_session(args)?;
    println!("{}", session.query());
    println!();
    println!("-- expected columns: {}", session.schema().columns().join(", "));
    Ok(())
}

pub fn run_plan(args: &PackageArgs) -> Result<()> {
    let session = load_session(args)?;
    if session.clean_plan().is_empty() {
        println!("No cleaning directives.");
        return Ok(());
    }
    println!("{}", plan_table(session.clean_plan()));
    Ok(())
}

pub fn run_extract(args: &RunArgs, notifier: Option<&TeamsNotifier>) -> Result<()> {
    let options = SessionOptions::default().with_exclude(args.exclude.iter().cloned());
    let (label, mut session) = match (&args.package, &args.raw_query) {
        (Some(path), None) => {
            let package = QueryPackage::load(path)?;
            let label = package.source.table.clone();
            let session = TableSession::from_package(package, &options)
                .with_context(|| format!("build session for {}", path.display()))?;
            (label, session)
        }
        (None, Some(path)) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("read raw query {}", path.display()))?;
            let session = TableSession::from_query(&raw, &args.schema, &options)?;
            (path.display().to_string(), session)
        }
        _ => anyhow::bail!("supply either a query package or --raw-query, not both"),
    };

    let span = info_span!("run", table = %label);
    let _guard = span.enter();
    let started = Instant::now();

    let credentials = Credentials::new(
        &args.db.user,
        &args.db.password,
        &args.db.database,
        &args.db.host,
    )
    .with_port(args.db.port);

    let mut executor = match connect(&credentials) {
        Ok(executor) => executor,
        Err(err) => {
            alert_failure(notifier, &label, "RDS connection failed", &err.to_string());
            return Err(err.into());
        }
    };

    let mut table = match session.execute(&mut executor, !args.no_clean) {
        Ok(table) => table.clone(),
        Err(err) => {
            error!(error = %err, "extraction failed");
            if !session.missing_fields().is_empty() {
                eprintln!("Missing fields: {}", session.missing_fields().join(", "));
            }
            alert_failure(notifier, &label, "Extraction failed", &err.to_string());
            return Err(err.into());
        }
    };
    if let Err(err) = executor.close() {
        error!(error = %err, "failed to close database connection");
    }

    write_csv(&mut table, args.output.as_deref())?;
    if let Some(path) = &args.removed {
        let rows = write_removed(session.removed(), path)?;
        info!(rows, path = %path.display(), "wrote removed rows");
    }

    info!(
        rows = table.height(),
        duration_ms = started.elapsed().as_millis() as u64,
        "run complete"
    );
    if !session.audit_log().is_empty() {
        eprintln!("{}", audit_table(&session));
    }
    if let Some(notifier) = notifier {
        let message = format!(
            "{} rows extracted, {} rows removed while cleaning.",
            table.height(),
            session.removed().row_count()
        );
        notifier.notify(
            AlertKind::Success,
            &format!("{label}: extract complete"),
            &message,
            None,
        );
    }
    Ok(())
}

fn alert_failure(notifier: Option<&TeamsNotifier>, label: &str, summary: &str, error: &str) {
    let Some(notifier) = notifier else {
        return;
    };
    notifier.notify(
        AlertKind::Error,
        &format!("{label}: {summary}"),
        &format!("{summary} while extracting {label}."),
        Some(error),
    );
}
