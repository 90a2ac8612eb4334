use rusqlite::{Connection, OptionalExtension, Row};
use crate::error::{CrmError, Entity, Result};
use crate::models::{NewUser, User, UserLevel, UserPatch};

const USER_COLUMNS: &str = "id, name, photo, email, mobile, level, code, created_ts, modified_ts";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let level: String = row.get(5)?;
    let level = UserLevel::from_str(&level).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            rusqlite::types::Type::Text,
            format!("unknown user level '{}'", level).into(),
        )
    })?;
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        photo: row.get(2)?,
        email: row.get(3)?,
        mobile: row.get(4)?,
        level,
        code: row.get(6)?,
        created_ts: row.get(7)?,
        modified_ts: row.get(8)?,
    })
}

/// Maps a UNIQUE violation on `users.email` to a conflict
fn map_email_conflict(err: rusqlite::Error, email: &str) -> CrmError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            CrmError::Conflict(format!("Email '{}' is already in use", email))
        }
        _ => CrmError::Storage(err),
    }
}

/// User repository for database operations
pub struct UserRepo;

impl UserRepo {
    pub fn create(conn: &Connection, user: &NewUser) -> Result<User> {
        let now = chrono::Utc::now().timestamp();
        conn.execute(
            "INSERT INTO users (name, photo, email, mobile, level, code, created_ts, modified_ts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                user.name,
                user.photo,
                user.email,
                user.mobile,
                user.level.as_str(),
                user.code,
                now,
                now
            ],
        )
        .map_err(|e| map_email_conflict(e, &user.email))?;

        Ok(User {
            id: conn.last_insert_rowid(),
            name: user.name.clone(),
            photo: user.photo.clone(),
            email: user.email.clone(),
            mobile: user.mobile.clone(),
            level: user.level,
            code: user.code.clone(),
            created_ts: now,
            modified_ts: now,
        })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        let user = conn.query_row(&sql, [id], user_from_row).optional()?;
        Ok(user)
    }

    pub fn get_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS);
        let user = conn.query_row(&sql, [email], user_from_row).optional()?;
        Ok(user)
    }

    pub fn list(conn: &Connection) -> Result<Vec<User>> {
        let sql = format!("SELECT {} FROM users ORDER BY name, id", USER_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], user_from_row)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Apply a partial update; `None` fields are left untouched
    pub fn update(conn: &Connection, id: i64, patch: &UserPatch) -> Result<User> {
        let now = chrono::Utc::now().timestamp();
        let updated = conn
            .execute(
                "UPDATE users SET
                    name = COALESCE(?1, name),
                    photo = COALESCE(?2, photo),
                    email = COALESCE(?3, email),
                    mobile = COALESCE(?4, mobile),
                    level = COALESCE(?5, level),
                    code = COALESCE(?6, code),
                    modified_ts = ?7
                 WHERE id = ?8",
                rusqlite::params![
                    patch.name,
                    patch.photo,
                    patch.email,
                    patch.mobile,
                    patch.level.map(|l| l.as_str()),
                    patch.code,
                    now,
                    id
                ],
            )
            .map_err(|e| map_email_conflict(e, patch.email.as_deref().unwrap_or_default()))?;
        if updated == 0 {
            return Err(CrmError::not_found(Entity::User, id));
        }
        Self::get_by_id(conn, id)?.ok_or_else(|| CrmError::not_found(Entity::User, id))
    }

    /// Permanently delete a user
    pub fn delete(conn: &Connection, id: i64) -> Result<()> {
        let deleted = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
        if deleted == 0 {
            return Err(CrmError::not_found(Entity::User, id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use crate::error::ErrorKind;

    fn new_user(email: &str, level: UserLevel) -> NewUser {
        NewUser {
            name: "Maria".to_string(),
            photo: None,
            email: email.to_string(),
            mobile: "(11) 99999-9999".to_string(),
            level,
            code: None,
        }
    }

    #[test]
    fn test_create_and_lookup_by_email() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let user = UserRepo::create(&conn, &new_user("maria@crm.com", UserLevel::Admin)).unwrap();

        let found = UserRepo::get_by_email(&conn, "maria@crm.com").unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(found.is_admin());
    }

    #[test]
    fn test_duplicate_email_is_conflict() {
        let conn = DbConnection::connect_in_memory().unwrap();
        UserRepo::create(&conn, &new_user("a@crm.com", UserLevel::User)).unwrap();

        let err = UserRepo::create(&conn, &new_user("a@crm.com", UserLevel::User)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_update_level() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let user = UserRepo::create(&conn, &new_user("a@crm.com", UserLevel::User)).unwrap();

        let patch = UserPatch {
            level: Some(UserLevel::Admin),
            ..UserPatch::default()
        };
        let updated = UserRepo::update(&conn, user.id, &patch).unwrap();
        assert_eq!(updated.level, UserLevel::Admin);
        assert_eq!(updated.email, "a@crm.com");
    }

    #[test]
    fn test_delete() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let user = UserRepo::create(&conn, &new_user("a@crm.com", UserLevel::User)).unwrap();

        UserRepo::delete(&conn, user.id).unwrap();
        assert!(UserRepo::get_by_id(&conn, user.id).unwrap().is_none());
        assert_eq!(
            UserRepo::delete(&conn, user.id).unwrap_err().kind(),
            ErrorKind::NotFound(Entity::User)
        );
    }
}
