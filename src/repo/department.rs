use rusqlite::{Connection, OptionalExtension, Row};
use crate::error::{CrmError, Entity, Result};
use crate::models::{Department, DepartmentPatch};

const DEPARTMENT_COLUMNS: &str = "id, name, icon, is_active, created_ts, modified_ts";

fn department_from_row(row: &Row<'_>) -> rusqlite::Result<Department> {
    Ok(Department {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: row.get(2)?,
        is_active: row.get::<_, i64>(3)? != 0,
        created_ts: row.get(4)?,
        modified_ts: row.get(5)?,
    })
}

/// Department repository for database operations
pub struct DepartmentRepo;

impl DepartmentRepo {
    pub fn create(conn: &Connection, name: &str, icon: Option<&str>, active: bool) -> Result<Department> {
        let now = chrono::Utc::now().timestamp();
        conn.execute(
            "INSERT INTO departments (name, icon, is_active, created_ts, modified_ts)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![name, icon, active as i64, now, now],
        )?;

        Ok(Department {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            icon: icon.map(|s| s.to_string()),
            is_active: active,
            created_ts: now,
            modified_ts: now,
        })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Department>> {
        let sql = format!("SELECT {} FROM departments WHERE id = ?1", DEPARTMENT_COLUMNS);
        let department = conn.query_row(&sql, [id], department_from_row).optional()?;
        Ok(department)
    }

    /// List active departments ordered by name
    pub fn list_active(conn: &Connection) -> Result<Vec<Department>> {
        let sql = format!(
            "SELECT {} FROM departments WHERE is_active = 1 ORDER BY name, id",
            DEPARTMENT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], department_from_row)?;

        let mut departments = Vec::new();
        for row in rows {
            departments.push(row?);
        }
        Ok(departments)
    }

    /// Apply a partial update; an empty patch only touches `modified_ts`
    pub fn update(conn: &Connection, id: i64, patch: &DepartmentPatch) -> Result<Department> {
        let now = chrono::Utc::now().timestamp();
        let updated = conn.execute(
            "UPDATE departments SET
                name = COALESCE(?1, name),
                icon = COALESCE(?2, icon),
                is_active = COALESCE(?3, is_active),
                modified_ts = ?4
             WHERE id = ?5",
            rusqlite::params![
                patch.name,
                patch.icon,
                patch.is_active.map(|a| a as i64),
                now,
                id
            ],
        )?;
        if updated == 0 {
            return Err(CrmError::not_found(Entity::Department, id));
        }
        Self::get_by_id(conn, id)?.ok_or_else(|| CrmError::not_found(Entity::Department, id))
    }

    /// Soft delete
    pub fn deactivate(conn: &Connection, id: i64) -> Result<Department> {
        let patch = DepartmentPatch {
            is_active: Some(false),
            ..DepartmentPatch::default()
        };
        Self::update(conn, id, &patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let dept = DepartmentRepo::create(&conn, "Vendas", Some("cart"), true).unwrap();

        let patch = DepartmentPatch {
            name: Some("Comercial".to_string()),
            ..DepartmentPatch::default()
        };
        let updated = DepartmentRepo::update(&conn, dept.id, &patch).unwrap();
        assert_eq!(updated.name, "Comercial");
        assert_eq!(updated.icon.as_deref(), Some("cart"));
        assert!(updated.is_active);
    }

    #[test]
    fn test_deactivate_hides_from_listing() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let a = DepartmentRepo::create(&conn, "A", None, true).unwrap();
        DepartmentRepo::create(&conn, "B", None, true).unwrap();

        DepartmentRepo::deactivate(&conn, a.id).unwrap();
        let listed = DepartmentRepo::list_active(&conn).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "B");

        // Still retrievable by id
        let a = DepartmentRepo::get_by_id(&conn, a.id).unwrap().unwrap();
        assert!(!a.is_active);
    }

    #[test]
    fn test_update_missing() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let err = DepartmentRepo::deactivate(&conn, 9).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::NotFound(Entity::Department));
    }
}
