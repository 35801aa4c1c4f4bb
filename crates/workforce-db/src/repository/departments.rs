//! Department operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::Department;
use crate::repository::Database;

impl Database {
    // ==================== Department Operations ====================

    /// Insert a new department
    ///
    /// Department names are unique ignoring case.
    pub async fn insert_department(&self, name: &str) -> Result<Department, DbError> {
        let now = Utc::now();

        if self.get_department_by_name(name).await?.is_some() {
            return Err(DbError::Duplicate(format!("Department '{}' already exists", name)));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO departments (name, created_at, updated_at)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_constraint(e, format!("Department '{}' already exists", name)))?;

        let id: i64 = result.get("id");

        Ok(Department {
            id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a department by ID
    pub async fn get_department_by_id(&self, id: i64) -> Result<Option<Department>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, name, created_at, updated_at
            FROM departments
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Department::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get a department by name, ignoring case
    pub async fn get_department_by_name(&self, name: &str) -> Result<Option<Department>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, name, created_at, updated_at
            FROM departments
            WHERE name = ? COLLATE NOCASE
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Department::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all departments
    pub async fn list_departments(&self) -> Result<Vec<Department>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, created_at, updated_at
            FROM departments
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Department::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Rename a department
    pub async fn update_department_name(&self, id: i64, name: &str) -> Result<bool, DbError> {
        let now = Utc::now();

        if let Some(existing) = self.get_department_by_name(name).await?
            && existing.id != id
        {
            return Err(DbError::Duplicate(format!("Department '{}' already exists", name)));
        }

        let result = sqlx::query(
            r#"
            UPDATE departments
            SET name = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(name)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_constraint(e, format!("Department '{}' already exists", name)))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a department
    ///
    /// Fails with [`DbError::Referenced`] while employees still belong to it.
    pub async fn delete_department(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DbError::from_constraint(e, format!("Department {} still has employees", id))
            })?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::repository::test_support::temp_db;

    #[tokio::test]
    async fn test_insert_and_get_department() {
        let (db, _dir) = temp_db().await;

        let dept = db.insert_department("Engineering").await.unwrap();
        let fetched = db.get_department_by_id(dept.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Engineering");

        let by_name = db.get_department_by_name("engineering").await.unwrap();
        assert_eq!(by_name.map(|d| d.id), Some(dept.id));
    }

    #[tokio::test]
    async fn test_duplicate_name_ignores_case() {
        let (db, _dir) = temp_db().await;

        db.insert_department("Finance").await.unwrap();
        let result = db.insert_department("FINANCE").await;
        assert!(matches!(result, Err(DbError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_rename_department() {
        let (db, _dir) = temp_db().await;

        let hr = db.insert_department("HR").await.unwrap();
        let it = db.insert_department("IT").await.unwrap();

        // Changing only the case of its own name is allowed
        assert!(db.update_department_name(hr.id, "hr").await.unwrap());

        let result = db.update_department_name(hr.id, "it").await;
        assert!(matches!(result, Err(DbError::Duplicate(_))));

        assert!(!db.update_department_name(it.id + 100, "Ops").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_department() {
        let (db, _dir) = temp_db().await;

        let dept = db.insert_department("Legal").await.unwrap();
        assert!(db.delete_department(dept.id).await.unwrap());
        assert!(!db.delete_department(dept.id).await.unwrap());
        assert!(db.get_department_by_id(dept.id).await.unwrap().is_none());
    }
}
