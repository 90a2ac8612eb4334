use rusqlite::{Connection, OptionalExtension, Row};
use crate::error::{CrmError, Entity, Result};
use crate::models::Board;

const BOARD_COLUMNS: &str = "id, name, is_active, created_ts, modified_ts";

fn board_from_row(row: &Row<'_>) -> rusqlite::Result<Board> {
    Ok(Board {
        id: row.get(0)?,
        name: row.get(1)?,
        is_active: row.get::<_, i64>(2)? != 0,
        created_ts: row.get(3)?,
        modified_ts: row.get(4)?,
    })
}

/// Board repository for database operations
pub struct BoardRepo;

impl BoardRepo {
    /// Create a new board
    pub fn create(conn: &Connection, name: &str, active: bool) -> Result<Board> {
        let now = chrono::Utc::now().timestamp();
        conn.execute(
            "INSERT INTO boards (name, is_active, created_ts, modified_ts) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![name, active as i64, now, now],
        )?;

        Ok(Board {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            is_active: active,
            created_ts: now,
            modified_ts: now,
        })
    }

    /// Get board by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Board>> {
        let sql = format!("SELECT {} FROM boards WHERE id = ?1", BOARD_COLUMNS);
        let board = conn.query_row(&sql, [id], board_from_row).optional()?;
        Ok(board)
    }

    pub fn exists(conn: &Connection, id: i64) -> Result<bool> {
        let found: Option<i64> = conn
            .query_row("SELECT 1 FROM boards WHERE id = ?1", [id], |row| row.get(0))
            .optional()?;
        Ok(found.is_some())
    }

    /// List boards with the given active flag, newest first
    pub fn list(conn: &Connection, active: bool) -> Result<Vec<Board>> {
        let sql = format!(
            "SELECT {} FROM boards WHERE is_active = ?1 ORDER BY created_ts DESC, id DESC",
            BOARD_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([active as i64], board_from_row)?;

        let mut boards = Vec::new();
        for row in rows {
            boards.push(row?);
        }
        Ok(boards)
    }

    /// Rename a board
    pub fn rename(conn: &Connection, id: i64, name: &str) -> Result<Board> {
        let now = chrono::Utc::now().timestamp();
        let updated = conn.execute(
            "UPDATE boards SET name = ?1, modified_ts = ?2 WHERE id = ?3",
            rusqlite::params![name, now, id],
        )?;
        Self::reload(conn, id, updated)
    }

    /// Set the active flag
    pub fn set_active(conn: &Connection, id: i64, active: bool) -> Result<Board> {
        let now = chrono::Utc::now().timestamp();
        let updated = conn.execute(
            "UPDATE boards SET is_active = ?1, modified_ts = ?2 WHERE id = ?3",
            rusqlite::params![active as i64, now, id],
        )?;
        Self::reload(conn, id, updated)
    }

    fn reload(conn: &Connection, id: i64, updated: usize) -> Result<Board> {
        if updated == 0 {
            return Err(CrmError::not_found(Entity::Board, id));
        }
        Self::get_by_id(conn, id)?.ok_or_else(|| CrmError::not_found(Entity::Board, id))
    }
}
