//! Workforce Core Business Logic
//!
//! This crate provides the services behind the Workforce API: login,
//! employee and department management, and the daily headcount summary job
//! with its scheduler.

pub mod auth;
pub mod departments;
pub mod employees;
pub mod error;
pub mod summary;
pub mod validation;

pub use auth::{AuthService, LoginOutcome};
pub use departments::DepartmentService;
pub use employees::{EmployeeRecord, EmployeeService};
pub use error::CoreError;
pub use summary::{
    DailySchedule, DailySummaryJob, SummaryRecord, SummaryRunReport, spawn_daily_summary_task,
};
pub use validation::{EmployeeInput, ValidEmployee, ValidationErrors};

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use tempfile::TempDir;
    use workforce_auth::PasswordHasher;
    use workforce_db::{Database, Employee, NewEmployee, Role};

    pub async fn temp_db() -> (Database, TempDir) {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite:{}/test.db?mode=rwc", dir.path().display());
        let db = Database::new(&url).await.unwrap();
        (db, dir)
    }

    pub fn cheap_hasher() -> PasswordHasher {
        PasswordHasher::new(1024, 1, 1).unwrap()
    }

    /// Insert an employee into the "Engineering" department
    pub async fn seed_employee(db: &Database, email: &str, password: &str, role: Role) -> Employee {
        let department = match db.get_department_by_name("Engineering").await.unwrap() {
            Some(department) => department,
            None => db.insert_department("Engineering").await.unwrap(),
        };

        db.insert_employee(NewEmployee {
            name: "Test Employee".to_string(),
            email: email.to_string(),
            password_hash: cheap_hasher().hash(password).unwrap(),
            role,
            salary: 1000.0,
            hire_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            department_id: department.id,
        })
        .await
        .unwrap()
    }
}
