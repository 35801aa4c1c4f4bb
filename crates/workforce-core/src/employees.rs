//! Employee management service

use std::collections::HashMap;

use tracing::{debug, info};
use workforce_auth::PasswordHasher;
use workforce_db::{Database, Department, Employee, NewEmployee, Role, UpdateEmployee};

use crate::error::CoreError;
use crate::validation::EmployeeInput;

/// Employee together with the name of its department
#[derive(Debug, Clone)]
pub struct EmployeeRecord {
    pub employee: Employee,
    pub department_name: String,
}

/// Employee CRUD with the business rules around it
pub struct EmployeeService {
    db: Database,
    hasher: PasswordHasher,
    default_password: String,
}

impl EmployeeService {
    /// `default_password` is hashed and assigned to every new employee
    pub fn new(db: Database, hasher: PasswordHasher, default_password: impl Into<String>) -> Self {
        Self {
            db,
            hasher,
            default_password: default_password.into(),
        }
    }

    async fn require_department(&self, id: i64) -> Result<Department, CoreError> {
        self.db
            .get_department_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Department with ID {} not found", id)))
    }

    async fn require_employee(&self, id: i64) -> Result<Employee, CoreError> {
        self.db
            .get_employee_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Employee with ID {} not found", id)))
    }

    /// Create an employee with the default password
    pub async fn create(&self, input: EmployeeInput) -> Result<EmployeeRecord, CoreError> {
        let valid = input.validate()?;

        if self.db.get_employee_by_email(&valid.email).await?.is_some() {
            return Err(CoreError::Duplicate(format!(
                "Employee with email {} already exists",
                valid.email
            )));
        }

        let department = self.require_department(valid.department_id).await?;
        let password_hash = self.hasher.hash(&self.default_password)?;

        let employee = self
            .db
            .insert_employee(NewEmployee {
                name: valid.name,
                email: valid.email,
                password_hash,
                role: valid.role.unwrap_or_default(),
                salary: valid.salary,
                hire_date: valid.hire_date,
                department_id: department.id,
            })
            .await?;

        info!(
            "Created employee {} ({}) in department {}",
            employee.email, employee.role, department.name
        );

        Ok(EmployeeRecord {
            employee,
            department_name: department.name,
        })
    }

    /// List all employees
    pub async fn list(&self) -> Result<Vec<EmployeeRecord>, CoreError> {
        let departments: HashMap<i64, String> = self
            .db
            .list_departments()
            .await?
            .into_iter()
            .map(|d| (d.id, d.name))
            .collect();

        let employees = self.db.list_employees().await?;
        debug!("Listing {} employees", employees.len());

        Ok(employees
            .into_iter()
            .map(|employee| EmployeeRecord {
                department_name: departments
                    .get(&employee.department_id)
                    .cloned()
                    .unwrap_or_default(),
                employee,
            })
            .collect())
    }

    /// Get one employee
    pub async fn get(&self, id: i64) -> Result<EmployeeRecord, CoreError> {
        let employee = self.require_employee(id).await?;
        let department = self.require_department(employee.department_id).await?;
        Ok(EmployeeRecord {
            employee,
            department_name: department.name,
        })
    }

    /// Replace an employee's editable fields
    ///
    /// The role is only changed when the input names one.
    pub async fn update(&self, id: i64, input: EmployeeInput) -> Result<EmployeeRecord, CoreError> {
        let valid = input.validate()?;
        self.require_employee(id).await?;

        if let Some(existing) = self.db.get_employee_by_email(&valid.email).await?
            && existing.id != id
        {
            return Err(CoreError::Duplicate(format!(
                "Employee with email {} already exists",
                valid.email
            )));
        }

        let department = self.require_department(valid.department_id).await?;

        let updated = self
            .db
            .update_employee(
                id,
                UpdateEmployee {
                    name: valid.name,
                    email: valid.email,
                    salary: valid.salary,
                    hire_date: valid.hire_date,
                    department_id: department.id,
                    role: valid.role,
                },
            )
            .await?;
        if !updated {
            return Err(CoreError::NotFound(format!("Employee with ID {} not found", id)));
        }

        let employee = self.require_employee(id).await?;
        info!("Updated employee {}", employee.email);

        Ok(EmployeeRecord {
            employee,
            department_name: department.name,
        })
    }

    /// Delete an employee on behalf of `caller_email`
    ///
    /// Callers cannot delete their own account.
    pub async fn delete(&self, id: i64, caller_email: &str) -> Result<(), CoreError> {
        let employee = self.require_employee(id).await?;

        if employee.email == caller_email {
            return Err(CoreError::Conflict(
                "You cannot delete your own account".to_string(),
            ));
        }

        if !self.db.delete_employee(id).await? {
            return Err(CoreError::NotFound(format!("Employee with ID {} not found", id)));
        }

        info!("Deleted employee {} (by {})", employee.email, caller_email);
        Ok(())
    }

    /// Create the first administrator when the store holds no employees
    ///
    /// Returns `true` when an account was created.
    pub async fn bootstrap_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
        department_name: &str,
    ) -> Result<bool, CoreError> {
        if self.db.has_employees().await? {
            return Ok(false);
        }

        let department = match self.db.get_department_by_name(department_name).await? {
            Some(department) => department,
            None => self.db.insert_department(department_name).await?,
        };

        let password_hash = self.hasher.hash(password)?;
        self.db
            .insert_employee(NewEmployee {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
                role: Role::Admin,
                salary: 1.0,
                hire_date: chrono::Local::now().date_naive(),
                department_id: department.id,
            })
            .await?;

        info!("Created bootstrap administrator {}", email);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{cheap_hasher, seed_employee, temp_db};

    fn input(email: &str, department_id: i64) -> EmployeeInput {
        EmployeeInput {
            name: Some("Jane Doe".to_string()),
            email: Some(email.to_string()),
            salary: Some(5200.5),
            hire_date: Some("2022-05-01".to_string()),
            department_id: Some(department_id),
            role: None,
        }
    }

    fn service(db: &Database) -> EmployeeService {
        EmployeeService::new(db.clone(), cheap_hasher(), "changeme")
    }

    #[tokio::test]
    async fn test_create_uses_defaults() {
        let (db, _dir) = temp_db().await;
        let dept = db.insert_department("Engineering").await.unwrap();
        let employees = service(&db);

        let record = employees.create(input("jane@x.com", dept.id)).await.unwrap();
        assert_eq!(record.department_name, "Engineering");
        assert_eq!(record.employee.role, Role::User);

        let stored = db.get_employee_by_email("jane@x.com").await.unwrap().unwrap();
        assert!(cheap_hasher().verify("changeme", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email_and_missing_department() {
        let (db, _dir) = temp_db().await;
        let dept = db.insert_department("Engineering").await.unwrap();
        let employees = service(&db);

        employees.create(input("jane@x.com", dept.id)).await.unwrap();
        let duplicate = employees.create(input("jane@x.com", dept.id)).await;
        assert!(matches!(duplicate, Err(CoreError::Duplicate(_))));

        let orphan = employees.create(input("john@x.com", 999)).await;
        assert!(matches!(orphan, Err(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_checks_email_owner() {
        let (db, _dir) = temp_db().await;
        let dept = db.insert_department("Engineering").await.unwrap();
        let employees = service(&db);

        let jane = employees.create(input("jane@x.com", dept.id)).await.unwrap();
        employees.create(input("john@x.com", dept.id)).await.unwrap();

        let taken = employees.update(jane.employee.id, input("john@x.com", dept.id)).await;
        assert!(matches!(taken, Err(CoreError::Duplicate(_))));

        let mut promote = input("jane@x.com", dept.id);
        promote.role = Some("ADMIN".to_string());
        let updated = employees.update(jane.employee.id, promote).await.unwrap();
        assert_eq!(updated.employee.role, Role::Admin);

        let missing = employees.update(999, input("ghost@x.com", dept.id)).await;
        assert!(matches!(missing, Err(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_cannot_delete_own_account() {
        let (db, _dir) = temp_db().await;
        let admin = seed_employee(&db, "admin@x.com", "p", Role::Admin).await;
        let other = seed_employee(&db, "other@x.com", "p", Role::User).await;
        let employees = service(&db);

        let own = employees.delete(admin.id, "admin@x.com").await;
        assert!(matches!(own, Err(CoreError::Conflict(_))));

        employees.delete(other.id, "admin@x.com").await.unwrap();
        assert!(db.get_employee_by_id(other.id).await.unwrap().is_none());

        let gone = employees.delete(other.id, "admin@x.com").await;
        assert!(matches!(gone, Err(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_own_account_check_is_exact() {
        let (db, _dir) = temp_db().await;
        seed_employee(&db, "a@x.com", "p", Role::Admin).await;
        let upper = seed_employee(&db, "A@x.com", "p", Role::User).await;
        let employees = service(&db);

        employees.delete(upper.id, "a@x.com").await.unwrap();
        assert!(db.get_employee_by_id(upper.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_includes_department_names() {
        let (db, _dir) = temp_db().await;
        let eng = db.insert_department("Engineering").await.unwrap();
        let sales = db.insert_department("Sales").await.unwrap();
        let employees = service(&db);

        employees.create(input("a@x.com", eng.id)).await.unwrap();
        employees.create(input("b@x.com", sales.id)).await.unwrap();

        let names: Vec<String> = employees
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.department_name)
            .collect();
        assert_eq!(names, vec!["Engineering", "Sales"]);
    }

    #[tokio::test]
    async fn test_bootstrap_admin_runs_once() {
        let (db, _dir) = temp_db().await;
        let employees = service(&db);

        let created = employees
            .bootstrap_admin("Admin", "admin@x.com", "secret", "Administration")
            .await
            .unwrap();
        assert!(created);

        let admin = db.get_employee_by_email("admin@x.com").await.unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);

        let again = employees
            .bootstrap_admin("Admin", "other@x.com", "secret", "Administration")
            .await
            .unwrap();
        assert!(!again);
    }
}
