use rusqlite::{Connection, OptionalExtension, Row};
use crate::error::{CrmError, Entity, Result};
use crate::models::{Shift, Stage};

const STAGE_COLUMNS: &str = "id, name, position, board_id, is_active, created_ts, modified_ts";

fn stage_from_row(row: &Row<'_>) -> rusqlite::Result<Stage> {
    Ok(Stage {
        id: row.get(0)?,
        name: row.get(1)?,
        position: row.get(2)?,
        board_id: row.get(3)?,
        is_active: row.get::<_, i64>(4)? != 0,
        created_ts: row.get(5)?,
        modified_ts: row.get(6)?,
    })
}

/// Stage repository for database operations
///
/// Plain row access for pipeline stages. None of these methods enforce the
/// ordering rules on their own; that is the job of
/// [`StageEngine`](crate::pipeline::StageEngine), which calls them inside a
/// transaction.
///
/// # Example
///
/// ```no_run
/// use crm::db::DbConnection;
/// use crm::repo::{BoardRepo, StageRepo};
///
/// let conn = DbConnection::connect_in_memory().unwrap();
/// let board = BoardRepo::create(&conn, "Sales", true).unwrap();
/// StageRepo::create(&conn, "Lead", 1, board.id).unwrap();
/// let stages = StageRepo::list_by_board(&conn, board.id).unwrap();
/// ```
pub struct StageRepo;

impl StageRepo {
    /// Insert a new active stage at the given position
    pub fn create(conn: &Connection, name: &str, position: i64, board_id: i64) -> Result<Stage> {
        let now = chrono::Utc::now().timestamp();
        conn.execute(
            "INSERT INTO stages (name, position, board_id, is_active, created_ts, modified_ts)
             VALUES (?1, ?2, ?3, 1, ?4, ?5)",
            rusqlite::params![name, position, board_id, now, now],
        )?;

        let id = conn.last_insert_rowid();
        Ok(Stage {
            id,
            name: name.to_string(),
            position,
            board_id,
            is_active: true,
            created_ts: now,
            modified_ts: now,
        })
    }

    /// Get stage by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Stage>> {
        let sql = format!("SELECT {} FROM stages WHERE id = ?1", STAGE_COLUMNS);
        let stage = conn.query_row(&sql, [id], stage_from_row).optional()?;
        Ok(stage)
    }

    /// Get the active stage occupying a position on a board
    pub fn get_active_at(conn: &Connection, board_id: i64, position: i64) -> Result<Option<Stage>> {
        let sql = format!(
            "SELECT {} FROM stages
             WHERE board_id = ?1 AND position = ?2 AND is_active = 1
             ORDER BY id LIMIT 1",
            STAGE_COLUMNS
        );
        let stage = conn
            .query_row(&sql, rusqlite::params![board_id, position], stage_from_row)
            .optional()?;
        Ok(stage)
    }

    /// List every stage of a board (active and inactive) ordered by position
    pub fn list_by_board(conn: &Connection, board_id: i64) -> Result<Vec<Stage>> {
        Self::query_board(conn, board_id, false)
    }

    /// List the active stages of a board ordered by position
    pub fn list_active_by_board(conn: &Connection, board_id: i64) -> Result<Vec<Stage>> {
        Self::query_board(conn, board_id, true)
    }

    fn query_board(conn: &Connection, board_id: i64, active_only: bool) -> Result<Vec<Stage>> {
        let filter = if active_only { "AND is_active = 1" } else { "" };
        let sql = format!(
            "SELECT {} FROM stages WHERE board_id = ?1 {} ORDER BY position, id",
            STAGE_COLUMNS, filter
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([board_id], stage_from_row)?;

        let mut stages = Vec::new();
        for row in rows {
            stages.push(row?);
        }
        Ok(stages)
    }

    /// Count active stages on a board
    pub fn count_active(conn: &Connection, board_id: i64) -> Result<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM stages WHERE board_id = ?1 AND is_active = 1",
            [board_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Rename a stage
    pub fn update_name(conn: &Connection, id: i64, name: &str) -> Result<Stage> {
        let now = chrono::Utc::now().timestamp();
        let updated = conn.execute(
            "UPDATE stages SET name = ?1, modified_ts = ?2 WHERE id = ?3",
            rusqlite::params![name, now, id],
        )?;
        Self::reload(conn, id, updated)
    }

    /// Set a stage's position directly
    pub fn update_position(conn: &Connection, id: i64, position: i64) -> Result<Stage> {
        let now = chrono::Utc::now().timestamp();
        let updated = conn.execute(
            "UPDATE stages SET position = ?1, modified_ts = ?2 WHERE id = ?3",
            rusqlite::params![position, now, id],
        )?;
        Self::reload(conn, id, updated)
    }

    /// Set the active flag; position is left as is
    pub fn set_active(conn: &Connection, id: i64, active: bool) -> Result<Stage> {
        let now = chrono::Utc::now().timestamp();
        let updated = conn.execute(
            "UPDATE stages SET is_active = ?1, modified_ts = ?2 WHERE id = ?3",
            rusqlite::params![active as i64, now, id],
        )?;
        Self::reload(conn, id, updated)
    }

    /// Shift every active stage of a board whose position lies in
    /// `[min, max]` (or `[min, +inf)` without `max`) by one, in a single
    /// statement. Returns the number of stages moved.
    pub fn shift_positions(
        conn: &Connection,
        board_id: i64,
        shift: Shift,
        min: i64,
        max: Option<i64>,
    ) -> Result<usize> {
        let now = chrono::Utc::now().timestamp();
        let moved = conn.execute(
            "UPDATE stages SET position = position + ?1, modified_ts = ?2
             WHERE board_id = ?3 AND is_active = 1
               AND position >= ?4 AND (?5 IS NULL OR position <= ?5)",
            rusqlite::params![shift.delta(), now, board_id, min, max],
        )?;
        log::debug!(
            "Shifted {} stage(s) on board {} by {} in [{}, {}]",
            moved,
            board_id,
            shift.delta(),
            min,
            max.map(|m| m.to_string()).unwrap_or_else(|| "inf".to_string())
        );
        Ok(moved)
    }

    fn reload(conn: &Connection, id: i64, updated: usize) -> Result<Stage> {
        if updated == 0 {
            return Err(CrmError::not_found(Entity::Stage, id));
        }
        Self::get_by_id(conn, id)?.ok_or_else(|| CrmError::not_found(Entity::Stage, id))
    }
}
