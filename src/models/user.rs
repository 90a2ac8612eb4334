use serde::{Deserialize, Serialize};

/// Access level of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserLevel {
    Admin,
    User,
}

impl UserLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserLevel::Admin => "admin",
            UserLevel::User => "user",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserLevel::Admin),
            "user" => Some(UserLevel::User),
            _ => None,
        }
    }
}

/// User model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub photo: Option<String>,
    pub email: String,
    pub mobile: String,
    pub level: UserLevel,
    pub code: Option<String>,
    pub created_ts: i64,
    pub modified_ts: i64,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.level == UserLevel::Admin
    }
}

/// Fields for a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub photo: Option<String>,
    pub email: String,
    pub mobile: String,
    pub level: UserLevel,
    pub code: Option<String>,
}

/// Partial update for a user; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub photo: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub level: Option<UserLevel>,
    pub code: Option<String>,
}
