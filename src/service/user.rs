use rusqlite::Connection;
use crate::error::{CrmError, Entity, Result};
use crate::models::{NewUser, User, UserPatch};
use crate::repo::UserRepo;
use crate::validate::{validate_email, validate_mobile, validate_name, validate_optional, validate_photo_url};

pub const MSG_USER_DELETED: &str = "User deleted successfully";

const CODE_MAX: usize = 50;

/// User management on top of [`UserRepo`]
pub struct UserService<'c> {
    conn: &'c Connection,
}

impl<'c> UserService<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, user: NewUser) -> Result<User> {
        let user = NewUser {
            name: validate_name(&user.name, "Name")?,
            photo: user.photo.as_deref().map(validate_photo_url).transpose()?,
            email: validate_email(&user.email)?,
            mobile: validate_mobile(&user.mobile)?,
            level: user.level,
            code: validate_optional(user.code.as_deref(), "Code", CODE_MAX)?,
        };
        let created = UserRepo::create(self.conn, &user)?;
        log::info!("Created user {} <{}> as {}", created.id, created.email, created.level.as_str());
        Ok(created)
    }

    pub fn list(&self) -> Result<Vec<User>> {
        UserRepo::list(self.conn)
    }

    pub fn get(&self, id: i64) -> Result<User> {
        UserRepo::get_by_id(self.conn, id)?.ok_or_else(|| CrmError::not_found(Entity::User, id))
    }

    pub fn update(&self, id: i64, patch: UserPatch) -> Result<User> {
        self.get(id)?;
        let patch = UserPatch {
            name: patch.name.as_deref().map(|n| validate_name(n, "Name")).transpose()?,
            photo: patch.photo.as_deref().map(validate_photo_url).transpose()?,
            email: patch.email.as_deref().map(validate_email).transpose()?,
            mobile: patch.mobile.as_deref().map(validate_mobile).transpose()?,
            level: patch.level,
            code: validate_optional(patch.code.as_deref(), "Code", CODE_MAX)?,
        };
        UserRepo::update(self.conn, id, &patch)
    }

    pub fn delete(&self, id: i64) -> Result<&'static str> {
        self.get(id)?;
        UserRepo::delete(self.conn, id)?;
        log::info!("Deleted user {}", id);
        Ok(MSG_USER_DELETED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use crate::error::ErrorKind;
    use crate::models::UserLevel;

    fn input(email: &str) -> NewUser {
        NewUser {
            name: "  Joana  ".to_string(),
            photo: None,
            email: email.to_string(),
            mobile: "(21) 98888-7777".to_string(),
            level: UserLevel::User,
            code: Some(" J01 ".to_string()),
        }
    }

    #[test]
    fn test_create_normalizes_fields() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let service = UserService::new(&conn);

        let user = service.create(input("Joana@CRM.com")).unwrap();
        assert_eq!(user.name, "Joana");
        assert_eq!(user.email, "joana@crm.com");
        assert_eq!(user.code.as_deref(), Some("J01"));
    }

    #[test]
    fn test_create_rejects_bad_mobile() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let service = UserService::new(&conn);
        let mut bad = input("a@crm.com");
        bad.mobile = "21988887777".to_string();

        assert_eq!(service.create(bad).unwrap_err().kind(), ErrorKind::InvalidArgument);
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_update_email_conflict() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let service = UserService::new(&conn);
        service.create(input("a@crm.com")).unwrap();
        let b = service.create(input("b@crm.com")).unwrap();

        let patch = UserPatch {
            email: Some("A@crm.com".to_string()),
            ..UserPatch::default()
        };
        assert_eq!(service.update(b.id, patch).unwrap_err().kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_delete_missing() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let service = UserService::new(&conn);

        assert_eq!(service.delete(8).unwrap_err().kind(), ErrorKind::NotFound(Entity::User));
    }
}
