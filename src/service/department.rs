use rusqlite::Connection;
use crate::error::{CrmError, Entity, Result};
use crate::models::{Department, DepartmentPatch};
use crate::repo::DepartmentRepo;
use crate::validate::{validate_name, validate_optional};

pub const MSG_DEPARTMENT_DEACTIVATED: &str = "Department deactivated successfully";

const ICON_MAX: usize = 255;

/// Department management on top of [`DepartmentRepo`]
pub struct DepartmentService<'c> {
    conn: &'c Connection,
}

impl<'c> DepartmentService<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, name: &str, icon: Option<&str>, active: bool) -> Result<Department> {
        let name = validate_name(name, "Department name")?;
        let icon = validate_optional(icon, "Icon", ICON_MAX)?;
        let department = DepartmentRepo::create(self.conn, &name, icon.as_deref(), active)?;
        log::info!("Created department {} '{}'", department.id, department.name);
        Ok(department)
    }

    /// Active departments only
    pub fn list(&self) -> Result<Vec<Department>> {
        DepartmentRepo::list_active(self.conn)
    }

    pub fn get(&self, id: i64) -> Result<Department> {
        DepartmentRepo::get_by_id(self.conn, id)?
            .ok_or_else(|| CrmError::not_found(Entity::Department, id))
    }

    pub fn update(&self, id: i64, patch: DepartmentPatch) -> Result<Department> {
        self.get(id)?;
        let patch = DepartmentPatch {
            name: patch
                .name
                .as_deref()
                .map(|n| validate_name(n, "Department name"))
                .transpose()?,
            icon: validate_optional(patch.icon.as_deref(), "Icon", ICON_MAX)?,
            is_active: patch.is_active,
        };
        DepartmentRepo::update(self.conn, id, &patch)
    }

    pub fn deactivate(&self, id: i64) -> Result<&'static str> {
        self.get(id)?;
        DepartmentRepo::deactivate(self.conn, id)?;
        log::info!("Deactivated department {}", id);
        Ok(MSG_DEPARTMENT_DEACTIVATED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use crate::error::ErrorKind;

    #[test]
    fn test_update_rejects_blank_name() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let service = DepartmentService::new(&conn);
        let dept = service.create("Sales", None, true).unwrap();

        let patch = DepartmentPatch {
            name: Some("  ".to_string()),
            ..DepartmentPatch::default()
        };
        assert_eq!(service.update(dept.id, patch).unwrap_err().kind(), ErrorKind::InvalidArgument);
        assert_eq!(service.get(dept.id).unwrap().name, "Sales");
    }

    #[test]
    fn test_icon_length() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let service = DepartmentService::new(&conn);
        let long = "i".repeat(256);

        let err = service.create("Sales", Some(&long), true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_deactivate_missing() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let service = DepartmentService::new(&conn);

        assert_eq!(
            service.deactivate(1).unwrap_err().kind(),
            ErrorKind::NotFound(Entity::Department)
        );
    }
}
