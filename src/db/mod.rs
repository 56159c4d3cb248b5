//! SQLite storage: connection handle, migrations, and the user entity.

mod repository;
mod schema;
mod user;

pub use repository::UserRepository;
pub use schema::MIGRATIONS;
pub use user::{User, BANNED_STATUS};

use std::path::Path;
use std::rc::Rc;

use rusqlite::{Connection, Transaction};
use tracing::{debug, info};

use crate::Result;

/// Handle to a single SQLite connection.
///
/// Clones share the connection. The handle is request-scoped and not `Send`;
/// entities carry a clone so they can build their default collaborators.
#[derive(Clone)]
pub struct Database {
    conn: Rc<Connection>,
}

impl Database {
    /// Open a database at `path`, creating it if needed, and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening database at {:?}", path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::configure_connection(&conn)?;

        let db = Self {
            conn: Rc::new(conn),
        };
        db.migrate()?;

        Ok(db)
    }

    /// Open an in-memory database for testing.
    pub fn open_in_memory() -> Result<Self> {
        debug!("Opening in-memory database");
        let conn = Connection::open_in_memory()?;
        Self::configure_connection(&conn)?;

        let db = Self {
            conn: Rc::new(conn),
        };
        db.migrate()?;

        Ok(db)
    }

    fn configure_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let _: i64 = conn.query_row("PRAGMA busy_timeout = 5000", [], |row| row.get(0))?;
        Ok(())
    }

    /// Get a reference to the underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction on the shared connection.
    pub fn transaction(&self) -> Result<Transaction<'_>> {
        Ok(self.conn.unchecked_transaction()?)
    }

    /// Get the current schema version.
    pub fn schema_version(&self) -> Result<i64> {
        if !self.table_exists("schema_version")? {
            return Ok(0);
        }

        let version: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )?;

        Ok(version)
    }

    /// Apply pending migrations.
    pub fn migrate(&self) -> Result<()> {
        let current_version = self.schema_version()?;

        if current_version as usize >= MIGRATIONS.len() {
            debug!("Database is up to date (version {})", current_version);
            return Ok(());
        }

        info!(
            "Migrating database from version {} to {}",
            current_version,
            MIGRATIONS.len()
        );

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version     INTEGER PRIMARY KEY,
                applied_at  TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        for (i, migration) in MIGRATIONS.iter().enumerate().skip(current_version as usize) {
            let version = (i + 1) as i64;
            info!("Applying migration v{}", version);

            let tx = self.transaction()?;
            tx.execute_batch(migration)?;
            tx.execute("INSERT INTO schema_version (version) VALUES (?)", [version])?;
            tx.commit()?;
        }

        Ok(())
    }

    /// Check if a table exists.
    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?)",
            [table_name],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish()
    }
}
