//! Request/Response DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use workforce_core::{EmployeeInput, EmployeeRecord, LoginOutcome, SummaryRecord};
use workforce_db::utils::DATE_FORMAT;
use workforce_db::{Department, Role};

// ==================== Auth Types ====================

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub role: Role,
    /// Seconds until the token expires
    pub expires_in: i64,
}

impl LoginResponse {
    pub fn new(outcome: LoginOutcome, expires_in: i64) -> Self {
        Self {
            token: outcome.token,
            email: outcome.email,
            role: outcome.role,
            expires_in,
        }
    }
}

// ==================== Employee Types ====================

/// Create or update employee request
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub salary: Option<f64>,
    pub hire_date: Option<String>,
    pub department_id: Option<i64>,
    pub role: Option<String>,
}

impl From<EmployeeRequest> for EmployeeInput {
    fn from(request: EmployeeRequest) -> Self {
        EmployeeInput {
            name: request.name,
            email: request.email,
            salary: request.salary,
            hire_date: request.hire_date,
            department_id: request.department_id,
            role: request.role,
        }
    }
}

/// Employee response (without password)
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub salary: f64,
    pub hire_date: String,
    pub department_id: i64,
    pub department_name: String,
}

impl From<EmployeeRecord> for EmployeeResponse {
    fn from(record: EmployeeRecord) -> Self {
        let e = record.employee;
        Self {
            id: e.id,
            name: e.name,
            email: e.email,
            role: e.role,
            salary: e.salary,
            hire_date: e.hire_date.format(DATE_FORMAT).to_string(),
            department_id: e.department_id,
            department_name: record.department_name,
        }
    }
}

// ==================== Department Types ====================

/// Create or rename department request
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct DepartmentRequest {
    pub name: Option<String>,
}

/// Department response
#[derive(Serialize)]
pub struct DepartmentResponse {
    pub id: i64,
    pub name: String,
}

impl From<Department> for DepartmentResponse {
    fn from(department: Department) -> Self {
        Self {
            id: department.id,
            name: department.name,
        }
    }
}

// ==================== Summary Types ====================

/// Summary query parameters
#[derive(Deserialize, Default)]
pub struct SummaryQuery {
    /// `YYYY-MM-DD`; today in server-local time when absent
    pub date: Option<String>,
}

impl SummaryQuery {
    /// Parse the requested date, `Ok(None)` when none was given
    pub fn parse_date(&self) -> Result<Option<NaiveDate>, chrono::ParseError> {
        match self.date.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT).map(Some),
        }
    }
}

/// Daily summary response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub id: i64,
    pub summary_date: String,
    pub department_id: i64,
    pub department_name: String,
    pub employee_count: i64,
}

impl From<SummaryRecord> for SummaryResponse {
    fn from(record: SummaryRecord) -> Self {
        let s = record.summary;
        Self {
            id: s.id,
            summary_date: s.summary_date.format(DATE_FORMAT).to_string(),
            department_id: s.department_id,
            department_name: record.department_name,
            employee_count: s.employee_count,
        }
    }
}
