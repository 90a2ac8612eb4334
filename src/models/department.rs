use serde::{Deserialize, Serialize};

/// Department model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub icon: Option<String>,
    pub is_active: bool,
    pub created_ts: i64,
    pub modified_ts: i64,
}

/// Partial update for a department; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct DepartmentPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
}
