//! Employee operations

use std::collections::HashMap;

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{Employee, NewEmployee, Role, UpdateEmployee};
use crate::repository::Database;
use crate::utils::format_date;

const EMPLOYEE_COLUMNS: &str = "id, name, email, password_hash, role, salary, hire_date, department_id, created_at, updated_at";

impl Database {
    // ==================== Employee Operations ====================

    /// Insert a new employee
    pub async fn insert_employee(&self, employee: NewEmployee) -> Result<Employee, DbError> {
        let now = Utc::now();

        // Check if email is already taken
        if self.get_employee_by_email(&employee.email).await?.is_some() {
            return Err(DbError::Duplicate(format!(
                "Employee with email {} already exists",
                employee.email
            )));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO employees (name, email, password_hash, role, salary, hire_date, department_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&employee.name)
        .bind(&employee.email)
        .bind(&employee.password_hash)
        .bind(employee.role.as_str())
        .bind(employee.salary)
        .bind(format_date(employee.hire_date))
        .bind(employee.department_id)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DbError::from_constraint(
                e,
                format!("Employee with email {} already exists", employee.email),
            )
        })?;

        let id: i64 = result.get("id");

        Ok(Employee {
            id,
            name: employee.name,
            email: employee.email,
            password_hash: employee.password_hash,
            role: employee.role,
            salary: employee.salary,
            hire_date: employee.hire_date,
            department_id: employee.department_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get an employee by email
    pub async fn get_employee_by_email(&self, email: &str) -> Result<Option<Employee>, DbError> {
        let result = sqlx::query(&format!(
            "SELECT {} FROM employees WHERE email = ?",
            EMPLOYEE_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Employee::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get an employee by ID
    pub async fn get_employee_by_id(&self, id: i64) -> Result<Option<Employee>, DbError> {
        let result = sqlx::query(&format!(
            "SELECT {} FROM employees WHERE id = ?",
            EMPLOYEE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Employee::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all employees
    pub async fn list_employees(&self) -> Result<Vec<Employee>, DbError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM employees ORDER BY id",
            EMPLOYEE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Employee::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Update an employee's editable fields
    pub async fn update_employee(&self, id: i64, update: UpdateEmployee) -> Result<bool, DbError> {
        let now = Utc::now();

        if let Some(existing) = self.get_employee_by_email(&update.email).await?
            && existing.id != id
        {
            return Err(DbError::Duplicate(format!(
                "Employee with email {} already exists",
                update.email
            )));
        }

        let result = sqlx::query(
            r#"
            UPDATE employees
            SET name = ?, email = ?, salary = ?, hire_date = ?, department_id = ?,
                role = COALESCE(?, role), updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(&update.email)
        .bind(update.salary)
        .bind(format_date(update.hire_date))
        .bind(update.department_id)
        .bind(update.role.as_ref().map(Role::as_str))
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DbError::from_constraint(
                e,
                format!("Employee with email {} already exists", update.email),
            )
        })?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an employee
    pub async fn delete_employee(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count employees assigned to a department
    pub async fn count_employees_in_department(&self, department_id: i64) -> Result<i64, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM employees WHERE department_id = ?")
            .bind(department_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(result.get("count"))
    }

    /// Employee headcount keyed by department ID
    ///
    /// Departments without employees are absent from the map.
    pub async fn count_employees_by_department(&self) -> Result<HashMap<i64, i64>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT department_id, COUNT(*) as count
            FROM employees
            GROUP BY department_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<(i64, i64), DbError> {
                Ok((row.try_get("department_id")?, row.try_get("count")?))
            })
            .collect()
    }

    /// Check if any employees exist
    pub async fn has_employees(&self) -> Result<bool, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM employees")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = result.get("count");
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::error::DbError;
    use crate::models::{NewEmployee, Role, UpdateEmployee};
    use crate::repository::test_support::temp_db;

    fn new_employee(email: &str, department_id: i64) -> NewEmployee {
        NewEmployee {
            name: "Jane Doe".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::User,
            salary: 5000.0,
            hire_date: NaiveDate::from_ymd_opt(2022, 3, 14).unwrap(),
            department_id,
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup_employee() {
        let (db, _dir) = temp_db().await;
        let dept = db.insert_department("Engineering").await.unwrap();

        let created = db.insert_employee(new_employee("jane@example.com", dept.id)).await.unwrap();
        assert!(db.has_employees().await.unwrap());

        let by_email = db.get_employee_by_email("jane@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
        assert_eq!(by_email.role, Role::User);
        assert_eq!(by_email.hire_date, NaiveDate::from_ymd_opt(2022, 3, 14).unwrap());
        assert_eq!(by_email.department_id, dept.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (db, _dir) = temp_db().await;
        let dept = db.insert_department("Engineering").await.unwrap();

        db.insert_employee(new_employee("dup@example.com", dept.id)).await.unwrap();
        let result = db.insert_employee(new_employee("dup@example.com", dept.id)).await;
        assert!(matches!(result, Err(DbError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_missing_department_violates_foreign_key() {
        let (db, _dir) = temp_db().await;

        let result = db.insert_employee(new_employee("orphan@example.com", 42)).await;
        assert!(matches!(result, Err(DbError::Referenced(_))));
    }

    #[tokio::test]
    async fn test_update_employee_keeps_role_when_absent() {
        let (db, _dir) = temp_db().await;
        let dept = db.insert_department("Engineering").await.unwrap();
        let other = db.insert_department("Sales").await.unwrap();
        let created = db.insert_employee(new_employee("a@example.com", dept.id)).await.unwrap();

        let update = UpdateEmployee {
            name: "Jane Smith".to_string(),
            email: "jane.smith@example.com".to_string(),
            salary: 6100.5,
            hire_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            department_id: other.id,
            role: None,
        };
        assert!(db.update_employee(created.id, update.clone()).await.unwrap());

        let updated = db.get_employee_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(updated.name, "Jane Smith");
        assert_eq!(updated.department_id, other.id);
        assert_eq!(updated.role, Role::User);

        let promote = UpdateEmployee { role: Some(Role::Admin), ..update };
        db.update_employee(created.id, promote).await.unwrap();
        let promoted = db.get_employee_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(promoted.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_department_with_employees_cannot_be_deleted() {
        let (db, _dir) = temp_db().await;
        let dept = db.insert_department("Engineering").await.unwrap();
        let emp = db.insert_employee(new_employee("b@example.com", dept.id)).await.unwrap();

        let result = db.delete_department(dept.id).await;
        assert!(matches!(result, Err(DbError::Referenced(_))));

        assert!(db.delete_employee(emp.id).await.unwrap());
        assert!(db.delete_department(dept.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_count_employees_by_department() {
        let (db, _dir) = temp_db().await;
        let eng = db.insert_department("Engineering").await.unwrap();
        let sales = db.insert_department("Sales").await.unwrap();
        let empty = db.insert_department("Empty").await.unwrap();

        db.insert_employee(new_employee("c1@example.com", eng.id)).await.unwrap();
        db.insert_employee(new_employee("c2@example.com", eng.id)).await.unwrap();
        db.insert_employee(new_employee("c3@example.com", sales.id)).await.unwrap();

        let counts = db.count_employees_by_department().await.unwrap();
        assert_eq!(counts.get(&eng.id), Some(&2));
        assert_eq!(counts.get(&sales.id), Some(&1));
        assert_eq!(counts.get(&empty.id), None);
        assert_eq!(db.count_employees_in_department(empty.id).await.unwrap(), 0);
    }
}
