//! PostgreSQL execution handle.
//!
//! Queries run over the simple-query protocol, so every value arrives as
//! text or NULL and typing is left to the cleaning plan.

use std::fmt;
use std::time::Duration;

use postgres::{Client, Config, NoTls, SimpleQueryMessage};
use thiserror::Error;
use tracing::{debug, error, info};

use rds_core::{CellValue, ExecutorError, QueryExecutor, QueryRows};

pub const DEFAULT_PORT: u16 = 5432;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum PgError {
    #[error("failed to connect to database `{database}` on {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        database: String,
        #[source]
        source: postgres::Error,
    },

    #[error("failed to close connection: {0}")]
    Close(#[source] postgres::Error),
}

/// Connection details for one database.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub database: String,
    pub host: String,
    pub port: u16,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            database: database.into(),
            host: host.into(),
            port: DEFAULT_PORT,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("database", &self.database)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

/// Open a connection without TLS.
pub fn connect(credentials: &Credentials) -> Result<PgExecutor, PgError> {
    let client = Config::new()
        .user(&credentials.username)
        .password(&credentials.password)
        .dbname(&credentials.database)
        .host(&credentials.host)
        .port(credentials.port)
        .connect_timeout(CONNECT_TIMEOUT)
        .connect(NoTls)
        .map_err(|source| {
            error!(
                host = %credentials.host,
                database = %credentials.database,
                error = %source,
                "database connection failed"
            );
            PgError::Connect {
                host: credentials.host.clone(),
                port: credentials.port,
                database: credentials.database.clone(),
                source,
            }
        })?;
    info!(host = %credentials.host, database = %credentials.database, "connected");
    Ok(PgExecutor { client })
}

/// A live connection that runs session queries.
pub struct PgExecutor {
    client: Client,
}

impl PgExecutor {
    pub fn close(self) -> Result<(), PgError> {
        self.client.close().map_err(PgError::Close)
    }
}

impl QueryExecutor for PgExecutor {
    fn run_query(&mut self, sql: &str) -> Result<QueryRows, ExecutorError> {
        let messages = self
            .client
            .simple_query(sql)
            .map_err(|e| ExecutorError::Query(e.to_string()))?;
        let rows = collect_rows(messages);
        debug!(columns = rows.columns.len(), rows = rows.len(), "query returned");
        Ok(rows)
    }
}

/// Rows of the last result set in `messages`.
fn collect_rows(messages: Vec<SimpleQueryMessage>) -> QueryRows {
    let mut result = QueryRows::default();
    for message in messages {
        match message {
            SimpleQueryMessage::RowDescription(columns) => {
                result.columns = columns.iter().map(|c| c.name().to_string()).collect();
                result.rows.clear();
            }
            SimpleQueryMessage::Row(row) => {
                if result.columns.is_empty() {
                    result.columns = row.columns().iter().map(|c| c.name().to_string()).collect();
                }
                let cells = (0..row.len())
                    .map(|idx| CellValue::from(row.get(idx)))
                    .collect();
                result.rows.push(cells);
            }
            _ => {}
        }
    }
    result
}
