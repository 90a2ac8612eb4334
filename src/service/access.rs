use rusqlite::Connection;
use crate::error::{CrmError, Result};
use crate::models::{NewUser, User, UserLevel};
use crate::repo::UserRepo;
use crate::service::UserService;

/// Resolve the acting user and require the admin level.
///
/// Every resource command is admin-only.
pub fn require_admin(conn: &Connection, acting_email: Option<&str>) -> Result<User> {
    let email = acting_email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| {
            CrmError::Unauthenticated(
                "No acting user. Pass --as <email>, set CRM_USER, or set auth.user in the rc file".to_string(),
            )
        })?;

    let user = UserRepo::get_by_email(conn, &email)?
        .ok_or_else(|| CrmError::Unauthenticated(format!("Unknown user '{}'", email)))?;

    if !user.is_admin() {
        log::warn!("Denied non-admin user {} <{}>", user.id, user.email);
        return Err(CrmError::Forbidden(
            "Access denied. Only administrators can perform this operation".to_string(),
        ));
    }
    Ok(user)
}

/// Create the first administrator of an empty installation
pub fn bootstrap_admin(conn: &Connection, admin: NewUser) -> Result<User> {
    if UserRepo::count(conn)? > 0 {
        return Err(CrmError::Conflict(
            "Users already exist; ask an administrator to add you".to_string(),
        ));
    }
    let admin = NewUser {
        level: UserLevel::Admin,
        ..admin
    };
    UserService::new(conn).create(admin)
}
