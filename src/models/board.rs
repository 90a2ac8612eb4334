use serde::{Deserialize, Serialize};

/// Board model
///
/// A board owns an ordered pipeline of stages. Boards are deactivated
/// rather than deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub created_ts: i64,
    pub modified_ts: i64,
}
