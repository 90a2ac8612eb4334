use rusqlite::Connection;
use crate::error::{CrmError, Entity, Result};
use crate::models::Board;
use crate::repo::BoardRepo;
use crate::validate::validate_name;

pub const MSG_BOARD_DEACTIVATED: &str = "Board deactivated successfully";

/// Board management on top of [`BoardRepo`]
pub struct BoardService<'c> {
    conn: &'c Connection,
}

impl<'c> BoardService<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, name: &str, active: bool) -> Result<Board> {
        let name = validate_name(name, "Board name")?;
        let board = BoardRepo::create(self.conn, &name, active)?;
        log::info!("Created board {} '{}'", board.id, board.name);
        Ok(board)
    }

    /// Boards with the given status; defaults to active ones
    pub fn list(&self, active: Option<bool>) -> Result<Vec<Board>> {
        BoardRepo::list(self.conn, active.unwrap_or(true))
    }

    pub fn get(&self, id: i64) -> Result<Board> {
        BoardRepo::get_by_id(self.conn, id)?.ok_or_else(|| CrmError::not_found(Entity::Board, id))
    }

    pub fn rename(&self, id: i64, name: &str) -> Result<Board> {
        self.get(id)?;
        let name = validate_name(name, "Board name")?;
        BoardRepo::rename(self.conn, id, &name)
    }

    pub fn set_status(&self, id: i64, active: bool) -> Result<Board> {
        self.get(id)?;
        let board = BoardRepo::set_active(self.conn, id, active)?;
        log::info!("Board {} is now {}", id, if active { "active" } else { "inactive" });
        Ok(board)
    }

    pub fn deactivate(&self, id: i64) -> Result<&'static str> {
        self.set_status(id, false)?;
        Ok(MSG_BOARD_DEACTIVATED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use crate::error::ErrorKind;

    #[test]
    fn test_create_trims_and_validates() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let service = BoardService::new(&conn);

        let board = service.create("  Sales  ", true).unwrap();
        assert_eq!(board.name, "Sales");
        assert_eq!(service.create("", true).unwrap_err().kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_list_defaults_to_active() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let service = BoardService::new(&conn);
        service.create("Sales", true).unwrap();
        service.create("Archive", false).unwrap();

        assert_eq!(service.list(None).unwrap().len(), 1);
        assert_eq!(service.list(Some(false)).unwrap()[0].name, "Archive");
    }

    #[test]
    fn test_deactivate() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let service = BoardService::new(&conn);
        let board = service.create("Sales", true).unwrap();

        assert_eq!(service.deactivate(board.id).unwrap(), MSG_BOARD_DEACTIVATED);
        assert!(!service.get(board.id).unwrap().is_active);
    }

    #[test]
    fn test_missing_board() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let service = BoardService::new(&conn);

        assert_eq!(service.get(3).unwrap_err().kind(), ErrorKind::NotFound(Entity::Board));
        assert_eq!(
            service.rename(3, "Whatever").unwrap_err().kind(),
            ErrorKind::NotFound(Entity::Board)
        );
    }
}
