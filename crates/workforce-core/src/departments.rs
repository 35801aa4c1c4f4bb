//! Department management service

use tracing::info;
use workforce_db::{Database, Department};

use crate::error::CoreError;
use crate::validation::validate_department_name;

pub struct DepartmentService {
    db: Database,
}

impl DepartmentService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn require(&self, id: i64) -> Result<Department, CoreError> {
        self.db
            .get_department_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Department with ID {} not found", id)))
    }

    /// Create a department; names are unique ignoring case
    pub async fn create(&self, name: Option<&str>) -> Result<Department, CoreError> {
        let name = validate_department_name(name)?;
        let department = self.db.insert_department(&name).await?;
        info!("Created department {} (id {})", department.name, department.id);
        Ok(department)
    }

    pub async fn list(&self) -> Result<Vec<Department>, CoreError> {
        Ok(self.db.list_departments().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Department, CoreError> {
        self.require(id).await
    }

    /// Rename a department
    pub async fn update(&self, id: i64, name: Option<&str>) -> Result<Department, CoreError> {
        let name = validate_department_name(name)?;
        self.require(id).await?;

        self.db.update_department_name(id, &name).await?;
        let department = self.require(id).await?;
        info!("Renamed department {} to {}", id, department.name);
        Ok(department)
    }

    /// Delete a department that no employee references
    pub async fn delete(&self, id: i64) -> Result<(), CoreError> {
        let department = self.require(id).await?;

        let assigned = self.db.count_employees_in_department(id).await?;
        if assigned > 0 {
            return Err(CoreError::Conflict(format!(
                "Cannot delete department {} because it has {} employee(s) assigned",
                department.name, assigned
            )));
        }

        self.db.delete_department(id).await?;
        info!("Deleted department {}", department.name);
        Ok(())
    }
}
