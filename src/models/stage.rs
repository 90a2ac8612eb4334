use serde::{Deserialize, Serialize};

/// Pipeline stage model
///
/// `position` is 1-based and only meaningful among the active stages of the
/// same board. An inactive stage keeps the position it had when it was
/// deactivated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: i64,
    pub name: String,
    pub position: i64,
    pub board_id: i64,
    pub is_active: bool,
    pub created_ts: i64,
    pub modified_ts: i64,
}

/// Direction of a bulk position shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    Increment,
    Decrement,
}

impl Shift {
    pub fn delta(&self) -> i64 {
        match self {
            Shift::Increment => 1,
            Shift::Decrement => -1,
        }
    }
}
