use rusqlite::{Connection, Result};
use std::collections::HashMap;

/// Current database schema version
const CURRENT_VERSION: u32 = 2;

/// Migration system for managing database schema versions
pub struct MigrationManager;

impl MigrationManager {
    /// Initialize the database with the current schema
    /// This creates the schema_version table and applies all migrations
    pub fn initialize(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            )",
            [],
        )?;

        let current_version = Self::get_version(conn)?;
        if current_version < CURRENT_VERSION {
            log::info!(
                "Migrating schema from version {} to {}",
                current_version,
                CURRENT_VERSION
            );
        }

        for version in (current_version + 1)..=CURRENT_VERSION {
            Self::apply_migration(conn, version)?;
        }

        Ok(())
    }

    /// Apply a specific migration by version number
    fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
        let migrations = get_migrations();
        if let Some(migration) = migrations.get(&version) {
            let tx = conn.unchecked_transaction()?;
            migration(&tx)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                [version],
            )?;
            tx.commit()?;
            log::debug!("Applied migration v{}", version);
            Ok(())
        } else {
            Err(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_MISUSE),
                Some(format!("No migration found for version {}", version)),
            ))
        }
    }

    /// Get the current schema version
    pub fn get_version(conn: &Connection) -> Result<u32> {
        conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
    }
}

type Migration = fn(&rusqlite::Transaction) -> Result<(), rusqlite::Error>;

/// Get all migrations indexed by version
fn get_migrations() -> HashMap<u32, Migration> {
    let mut migrations: HashMap<u32, Migration> = HashMap::new();
    migrations.insert(1, migration_v1);
    migrations.insert(2, migration_v2);
    migrations
}

/// Migration v1: boards and their pipeline stages
fn migration_v1(tx: &rusqlite::Transaction) -> Result<(), rusqlite::Error> {
    tx.execute(
        "CREATE TABLE boards (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_ts INTEGER NOT NULL,
            modified_ts INTEGER NOT NULL
        )",
        [],
    )?;

    // No UNIQUE(board_id, position): range shifts update rows in place, and a
    // reactivated stage may share its stale slot with a newer stage.
    tx.execute(
        "CREATE TABLE stages (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            position INTEGER NOT NULL CHECK(position >= 1),
            board_id INTEGER NOT NULL REFERENCES boards(id),
            is_active INTEGER NOT NULL DEFAULT 1,
            created_ts INTEGER NOT NULL,
            modified_ts INTEGER NOT NULL
        )",
        [],
    )?;
    tx.execute(
        "CREATE INDEX idx_stages_board_position ON stages(board_id, position)",
        [],
    )?;

    // board_id is fixed at creation
    tx.execute(
        "CREATE TRIGGER trg_stages_board_immutable
         BEFORE UPDATE OF board_id ON stages
         WHEN NEW.board_id != OLD.board_id
         BEGIN
             SELECT RAISE(ABORT, 'stage board cannot change');
         END",
        [],
    )?;

    Ok(())
}

/// Migration v2: departments and users
fn migration_v2(tx: &rusqlite::Transaction) -> Result<(), rusqlite::Error> {
    tx.execute(
        "CREATE TABLE departments (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            icon TEXT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_ts INTEGER NOT NULL,
            modified_ts INTEGER NOT NULL
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            photo TEXT NULL,
            email TEXT NOT NULL UNIQUE,
            mobile TEXT NOT NULL,
            level TEXT NOT NULL CHECK(level IN ('admin','user')),
            code TEXT NULL,
            created_ts INTEGER NOT NULL,
            modified_ts INTEGER NOT NULL
        )",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn open() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("PRAGMA foreign_keys=ON", []).unwrap();
        conn
    }

    #[test]
    fn test_migration_applies_cleanly() {
        let conn = open();
        MigrationManager::initialize(&conn).unwrap();

        let version = MigrationManager::get_version(&conn).unwrap();
        assert_eq!(version, CURRENT_VERSION);
    }

    #[test]
    fn test_migration_is_idempotent() {
        let conn = open();

        MigrationManager::initialize(&conn).unwrap();
        MigrationManager::initialize(&conn).unwrap();

        let version = MigrationManager::get_version(&conn).unwrap();
        assert_eq!(version, CURRENT_VERSION);
    }

    #[test]
    fn test_foreign_key_constraints() {
        let conn = open();
        MigrationManager::initialize(&conn).unwrap();

        // Stage referencing a missing board
        let result = conn.execute(
            "INSERT INTO stages (name, position, board_id, created_ts, modified_ts)
             VALUES ('Lead', 1, 999, 1000, 1000)",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_position_must_be_positive() {
        let conn = open();
        MigrationManager::initialize(&conn).unwrap();
        conn.execute(
            "INSERT INTO boards (name, created_ts, modified_ts) VALUES ('Sales', 1, 1)",
            [],
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO stages (name, position, board_id, created_ts, modified_ts)
             VALUES ('Lead', 0, 1, 1000, 1000)",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_stage_board_cannot_change() {
        let conn = open();
        MigrationManager::initialize(&conn).unwrap();
        conn.execute(
            "INSERT INTO boards (name, created_ts, modified_ts) VALUES ('Sales', 1, 1), ('Support', 1, 1)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO stages (name, position, board_id, created_ts, modified_ts)
             VALUES ('Lead', 1, 1, 1000, 1000)",
            [],
        )
        .unwrap();

        let result = conn.execute("UPDATE stages SET board_id = 2 WHERE id = 1", []);
        assert!(result.is_err());
    }
}
