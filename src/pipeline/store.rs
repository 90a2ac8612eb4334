use rusqlite::{Connection, Transaction, TransactionBehavior};
use crate::error::Result;
use crate::models::{Shift, Stage};
use crate::repo::{BoardRepo, StageRepo};

/// Stage persistence required by the ordering engine
pub trait StageStore {
    fn find_stage(&self, id: i64) -> Result<Option<Stage>>;
    /// Active stage at `position` on `board_id`, if any
    fn find_active_at(&self, board_id: i64, position: i64) -> Result<Option<Stage>>;
    /// Every stage of the board, ordered by position
    fn list_stages(&self, board_id: i64) -> Result<Vec<Stage>>;
    fn list_active_stages(&self, board_id: i64) -> Result<Vec<Stage>>;
    fn count_active(&self, board_id: i64) -> Result<i64>;
    fn create_stage(&self, name: &str, position: i64, board_id: i64) -> Result<Stage>;
    fn update_name(&self, id: i64, name: &str) -> Result<Stage>;
    fn update_position(&self, id: i64, position: i64) -> Result<Stage>;
    fn set_active(&self, id: i64, active: bool) -> Result<Stage>;
    /// Bulk shift of the active stages in `[min, max]`, or `[min, +inf)`
    fn shift_positions(&self, board_id: i64, shift: Shift, min: i64, max: Option<i64>) -> Result<()>;
}

/// Board persistence required by the ordering engine
pub trait BoardStore {
    fn board_exists(&self, board_id: i64) -> Result<bool>;
}

/// Runs a sequence of store calls as one unit: all of them or none
pub trait Atomic {
    fn atomically<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>;
}

/// SQLite-backed store over a borrowed connection
///
/// The connection's lifecycle belongs to whoever opened it.
pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl StageStore for SqliteStore<'_> {
    fn find_stage(&self, id: i64) -> Result<Option<Stage>> {
        StageRepo::get_by_id(self.conn, id)
    }

    fn find_active_at(&self, board_id: i64, position: i64) -> Result<Option<Stage>> {
        StageRepo::get_active_at(self.conn, board_id, position)
    }

    fn list_stages(&self, board_id: i64) -> Result<Vec<Stage>> {
        StageRepo::list_by_board(self.conn, board_id)
    }

    fn list_active_stages(&self, board_id: i64) -> Result<Vec<Stage>> {
        StageRepo::list_active_by_board(self.conn, board_id)
    }

    fn count_active(&self, board_id: i64) -> Result<i64> {
        StageRepo::count_active(self.conn, board_id)
    }

    fn create_stage(&self, name: &str, position: i64, board_id: i64) -> Result<Stage> {
        StageRepo::create(self.conn, name, position, board_id)
    }

    fn update_name(&self, id: i64, name: &str) -> Result<Stage> {
        StageRepo::update_name(self.conn, id, name)
    }

    fn update_position(&self, id: i64, position: i64) -> Result<Stage> {
        StageRepo::update_position(self.conn, id, position)
    }

    fn set_active(&self, id: i64, active: bool) -> Result<Stage> {
        StageRepo::set_active(self.conn, id, active)
    }

    fn shift_positions(&self, board_id: i64, shift: Shift, min: i64, max: Option<i64>) -> Result<()> {
        StageRepo::shift_positions(self.conn, board_id, shift, min, max)?;
        Ok(())
    }
}

impl BoardStore for SqliteStore<'_> {
    fn board_exists(&self, board_id: i64) -> Result<bool> {
        BoardRepo::exists(self.conn, board_id)
    }
}

impl Atomic for SqliteStore<'_> {
    fn atomically<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        // Take the write lock before the precondition reads.
        // Dropping the transaction without commit rolls it back.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let value = f()?;
        tx.commit()?;
        Ok(value)
    }
}
