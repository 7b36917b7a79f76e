use std::collections::HashSet;

use dotenvy::dotenv;
use futures::TryStreamExt;
use sqlx::{AnyConnection, Connection, Executor, any::AnyRow};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// The SQL flavour spoken by the database on the other end of a [`Database`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    #[must_use]
    pub fn from_connection_string(input: &str) -> Option<Self> {
        let lower = input.to_lowercase();

        if lower.starts_with("postgres") {
            Some(Self::Postgres)
        } else if lower.starts_with("sqlite") {
            Some(Self::Sqlite)
        } else {
            None
        }
    }
}

/// Attempt to retrieve the database URL from the `DATABASE_URL` environment variable, or from a
/// corresponding `.env` file.
#[must_use]
pub fn get_database_url() -> Option<String> {
    if let Some(e) = env_file_problem(dotenv()) {
        debug!("Ignoring unreadable `.env` file: {e}");
    }

    std::env::var("DATABASE_URL").ok()
}

/// A missing `.env` file is fine; anything else about loading it is worth reporting.
fn env_file_problem<T>(result: Result<T, dotenvy::Error>) -> Option<dotenvy::Error> {
    result.err().filter(|e| !e.not_found())
}

/// A single database connection, passed explicitly to every operation.
///
/// Statements never auto-commit: the first statement after a commit or rollback opens a new
/// transaction, which stays open until [`Database::commit`] or [`Database::rollback`]. After a
/// failed statement the transaction has to be rolled back before anything else will succeed on
/// PostgreSQL.
pub struct Database {
    connection: AnyConnection,
    dialect: Dialect,
    in_transaction: bool,
    created_tables: HashSet<String>,
    // Created inside the open transaction, forgotten again if it is rolled back.
    pending_tables: Vec<String>,
}

impl Database {
    /// Connect using a connection string.
    ///
    /// Supports:
    /// - `postgresql://...` or `postgres://...` for PostgreSQL
    /// - `sqlite://...` or `sqlite:...` for SQLite
    ///
    /// The matching driver has to be enabled through this crate's `postgres` / `sqlite` features.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedDatabase`] for any other URL, or the driver's connection error.
    pub async fn connect(url: &str) -> Result<Self> {
        let Some(dialect) = Dialect::from_connection_string(url) else {
            return Err(Error::UnsupportedDatabase(url.to_string()));
        };

        sqlx::any::install_default_drivers();

        info!("Connecting to {dialect:?} database");
        let connection = AnyConnection::connect(url).await?;

        Ok(Self {
            connection,
            dialect,
            in_transaction: false,
            created_tables: HashSet::new(),
            pending_tables: vec![],
        })
    }

    /// Connect to the database named by `DATABASE_URL`, see [`get_database_url`].
    ///
    /// # Errors
    ///
    /// [`Error::MissingDatabaseUrl`] if no URL is configured, otherwise as [`Database::connect`].
    pub async fn connect_from_env() -> Result<Self> {
        let url = get_database_url().ok_or(Error::MissingDatabaseUrl)?;
        Self::connect(&url).await
    }

    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[must_use]
    pub const fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Execute a SQL statement, returning the rows it produced, or `None` if it produced none.
    ///
    /// Opens a transaction first if none is active.
    ///
    /// # Errors
    ///
    /// Whatever the database reports. The transaction is left open; roll it back before
    /// continuing.
    pub async fn execute(&mut self, query: &str) -> Result<Option<Vec<AnyRow>>> {
        if !self.in_transaction {
            self.connection.execute("BEGIN").await?;
            self.in_transaction = true;
        }

        debug!("Executing SQL query `{query}`");

        let rows = self
            .connection
            .fetch(query)
            .try_collect::<Vec<_>>()
            .await?;

        Ok(if rows.is_empty() { None } else { Some(rows) })
    }

    /// Commit the open transaction, if any.
    ///
    /// # Errors
    ///
    /// If the database refuses the commit.
    pub async fn commit(&mut self) -> Result<()> {
        if self.in_transaction {
            debug!("Committing transaction");
            self.in_transaction = false;
            self.pending_tables.clear();
            self.connection.execute("COMMIT").await?;
        }

        Ok(())
    }

    /// Roll back the open transaction, if any.
    ///
    /// # Errors
    ///
    /// If the database refuses the rollback.
    pub async fn rollback(&mut self) -> Result<()> {
        if self.in_transaction {
            debug!("Rolling back transaction");
            self.in_transaction = false;
            for table_name in self.pending_tables.drain(..) {
                self.created_tables.remove(&table_name);
            }
            self.connection.execute("ROLLBACK").await?;
        }

        Ok(())
    }

    /// Close the connection. Uncommitted work is discarded by the database.
    ///
    /// # Errors
    ///
    /// If the connection could not be shut down cleanly.
    pub async fn close(self) -> Result<()> {
        self.connection.close().await?;
        Ok(())
    }

    pub(crate) fn is_table_created(&self, table_name: &str) -> bool {
        self.created_tables.contains(table_name)
    }

    pub(crate) fn mark_table_created(&mut self, table_name: &str) {
        if self.created_tables.insert(table_name.to_string()) && self.in_transaction {
            self.pending_tables.push(table_name.to_string());
        }
    }
}
