use rusqlite::Connection;
use std::path::Path;
use anyhow::{Context, Result};
use crate::config::Config;
use crate::db::migrations::MigrationManager;

/// Database connection manager
///
/// The process entry point opens the connection once and hands it to the
/// stores; nothing in the library holds a global handle.
pub struct DbConnection;

impl DbConnection {
    /// Connect to the database named by the configuration
    pub fn connect(config: &Config) -> Result<Connection> {
        Self::connect_at(&config.database_path())
    }

    /// Connect to a database file, creating it and parent directories if needed
    pub fn connect_at(db_path: &Path) -> Result<Connection> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database: {}", db_path.display()))?;
        log::debug!("Opened database at {}", db_path.display());

        Self::prepare(&conn)?;
        Ok(conn)
    }

    /// Connect to an in-memory database (for testing)
    pub fn connect_in_memory() -> Result<Connection> {
        let conn = Connection::open_in_memory()
            .context("Failed to open in-memory database")?;
        Self::prepare(&conn)?;
        Ok(conn)
    }

    /// Close the connection, surfacing any error from the final flush
    pub fn disconnect(conn: Connection) -> Result<()> {
        conn.close()
            .map_err(|(_, e)| e)
            .context("Failed to close database")
    }

    fn prepare(conn: &Connection) -> Result<()> {
        // Must run outside any transaction to take effect
        conn.execute("PRAGMA foreign_keys=ON", [])
            .context("Failed to enable foreign keys")?;
        MigrationManager::initialize(conn)
            .context("Failed to initialize database schema")?;
        Ok(())
    }
}
