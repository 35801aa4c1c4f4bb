//! Input validation for employees, departments and logins
//!
//! Field checks never stop at the first failure: every problem is collected
//! into a [`ValidationErrors`] map keyed by the wire field name.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use workforce_db::Role;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+(([',. -][a-zA-Z ])?[a-zA-Z]*)*$").unwrap());
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").unwrap());
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_PASSWORD_LENGTH: usize = 256;

const SALARY_INTEGER_DIGITS: usize = 10;
const SALARY_FRACTION_DIGITS: usize = 2;

/// Collected field errors
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors holding a single field failure
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record a failure; the first message per field is kept
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed")?;
        for (i, (field, message)) in self.fields.iter().enumerate() {
            let sep = if i == 0 { ": " } else { ", " };
            write!(f, "{}{}: {}", sep, field, message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ==================== Employee ====================

/// Raw employee fields as received from a client
#[derive(Debug, Clone, Default)]
pub struct EmployeeInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub salary: Option<f64>,
    pub hire_date: Option<String>,
    pub department_id: Option<i64>,
    pub role: Option<String>,
}

/// Employee fields that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidEmployee {
    pub name: String,
    pub email: String,
    pub salary: f64,
    pub hire_date: NaiveDate,
    pub department_id: i64,
    /// `None` when the client did not ask for a specific role
    pub role: Option<Role>,
}

impl EmployeeInput {
    pub fn validate(self) -> Result<ValidEmployee, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = check_name(&mut errors, self.name.as_deref());
        let email = check_email(&mut errors, self.email.as_deref());
        let salary = check_salary(&mut errors, self.salary);
        let hire_date = check_hire_date(&mut errors, self.hire_date.as_deref());

        if self.department_id.is_none() {
            errors.add("departmentId", "Department ID is required");
        }

        let role = match self.role.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<Role>() {
                Ok(role) => Some(role),
                Err(_) => {
                    errors.add("role", "Role must be USER or ADMIN");
                    None
                }
            },
        };

        errors.into_result()?;

        // All `None`s above were recorded as errors, so these are present
        match (name, email, salary, hire_date, self.department_id) {
            (Some(name), Some(email), Some(salary), Some(hire_date), Some(department_id)) => {
                Ok(ValidEmployee {
                    name,
                    email,
                    salary,
                    hire_date,
                    department_id,
                    role,
                })
            }
            _ => Err(ValidationErrors::single("employee", "Incomplete employee")),
        }
    }
}

fn check_name(errors: &mut ValidationErrors, name: Option<&str>) -> Option<String> {
    let name = name.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        errors.add("name", "Name is required");
        return None;
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        errors.add(
            "name",
            format!("Name must be at most {} characters", MAX_NAME_LENGTH),
        );
        return None;
    }
    if !NAME_RE.is_match(name) {
        errors.add(
            "name",
            "Name may only contain letters, spaces and the characters ' , . -",
        );
        return None;
    }
    Some(name.to_string())
}

fn check_email(errors: &mut ValidationErrors, email: Option<&str>) -> Option<String> {
    let email = email.map(str::trim).unwrap_or_default();
    if email.is_empty() {
        errors.add("email", "Email is required");
        return None;
    }
    if email.len() > MAX_EMAIL_LENGTH || !EMAIL_RE.is_match(email) {
        errors.add("email", "Email should be valid");
        return None;
    }
    Some(email.to_string())
}

fn check_salary(errors: &mut ValidationErrors, salary: Option<f64>) -> Option<f64> {
    let Some(salary) = salary else {
        errors.add("salary", "Salary is required");
        return None;
    };
    if !salary.is_finite() || salary <= 0.0 {
        errors.add("salary", "Salary must be greater than zero");
        return None;
    }
    // Shortest round-trip decimal form, e.g. 4250.75 -> "4250.75"
    let repr = salary.to_string();
    let (integer, fraction) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    if integer.len() > SALARY_INTEGER_DIGITS || fraction.len() > SALARY_FRACTION_DIGITS {
        errors.add(
            "salary",
            "Salary must have at most 10 integer digits and 2 decimal places",
        );
        return None;
    }
    Some(salary)
}

fn check_hire_date(errors: &mut ValidationErrors, hire_date: Option<&str>) -> Option<NaiveDate> {
    let raw = hire_date.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        errors.add("hireDate", "Hire date is required");
        return None;
    }
    if !DATE_RE.is_match(raw) {
        errors.add("hireDate", "Hire date must be in the format yyyy-MM-dd");
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add("hireDate", "Hire date is not a valid calendar date");
            None
        }
    }
}

// ==================== Department ====================

/// Validate a department name, returning it trimmed
pub fn validate_department_name(name: Option<&str>) -> Result<String, ValidationErrors> {
    let name = name.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(ValidationErrors::single("name", "Department name is required"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationErrors::single(
            "name",
            format!("Department name must be at most {} characters", MAX_NAME_LENGTH),
        ));
    }
    Ok(name.to_string())
}

// ==================== Login ====================

/// Bounds check for login input, run before any hashing
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if email.trim().is_empty() {
        errors.add("email", "Email is required");
    }
    if password.is_empty() {
        errors.add("password", "Password is required");
    } else if password.len() > MAX_PASSWORD_LENGTH {
        errors.add(
            "password",
            format!("Password must be at most {} bytes", MAX_PASSWORD_LENGTH),
        );
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> EmployeeInput {
        EmployeeInput {
            name: Some("Mary-Jane O'Neil".to_string()),
            email: Some("mj@example.com".to_string()),
            salary: Some(4250.75),
            hire_date: Some("2023-02-28".to_string()),
            department_id: Some(1),
            role: None,
        }
    }

    #[test]
    fn test_valid_employee() {
        let valid = valid_input().validate().unwrap();
        assert_eq!(valid.name, "Mary-Jane O'Neil");
        assert_eq!(valid.hire_date, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
        assert_eq!(valid.role, None);
    }

    #[test]
    fn test_all_field_errors_are_collected() {
        let errors = EmployeeInput::default().validate().unwrap_err();
        for field in ["name", "email", "salary", "hireDate", "departmentId"] {
            assert!(errors.get(field).is_some(), "missing error for {}", field);
        }
    }

    #[test]
    fn test_name_pattern() {
        for name in ["Anna", "J. R. Smith", "Anne-Marie", "D'Angelo"] {
            let input = EmployeeInput { name: Some(name.to_string()), ..valid_input() };
            assert!(input.validate().is_ok(), "{} should be accepted", name);
        }
        for name in ["R2D2", "-Anna", "Anna_Smith"] {
            let input = EmployeeInput { name: Some(name.to_string()), ..valid_input() };
            let errors = input.validate().unwrap_err();
            assert!(errors.get("name").is_some(), "{} should be rejected", name);
        }
    }

    #[test]
    fn test_email_format() {
        let input = EmployeeInput { email: Some("not-an-email".to_string()), ..valid_input() };
        assert_eq!(input.validate().unwrap_err().get("email"), Some("Email should be valid"));
    }

    #[test]
    fn test_salary_bounds() {
        for salary in [0.0, -5.0, 12.345, 10_000_000_000.0] {
            let input = EmployeeInput { salary: Some(salary), ..valid_input() };
            assert!(input.validate().is_err(), "{} should be rejected", salary);
        }
        for salary in [0.01, 9_999_999_999.99, 100.0] {
            let input = EmployeeInput { salary: Some(salary), ..valid_input() };
            assert!(input.validate().is_ok(), "{} should be accepted", salary);
        }
    }

    #[test]
    fn test_hire_date_format_and_calendar() {
        let input = EmployeeInput { hire_date: Some("2023/01/01".to_string()), ..valid_input() };
        assert_eq!(
            input.validate().unwrap_err().get("hireDate"),
            Some("Hire date must be in the format yyyy-MM-dd")
        );

        let input = EmployeeInput { hire_date: Some("2023-02-30".to_string()), ..valid_input() };
        assert_eq!(
            input.validate().unwrap_err().get("hireDate"),
            Some("Hire date is not a valid calendar date")
        );
    }

    #[test]
    fn test_role_parsing() {
        let input = EmployeeInput { role: Some("admin".to_string()), ..valid_input() };
        assert_eq!(input.validate().unwrap().role, Some(Role::Admin));

        let input = EmployeeInput { role: Some("OWNER".to_string()), ..valid_input() };
        assert!(input.validate().unwrap_err().get("role").is_some());
    }

    #[test]
    fn test_department_name() {
        assert_eq!(validate_department_name(Some("  Sales ")).unwrap(), "Sales");
        assert!(validate_department_name(Some("   ")).is_err());
        assert!(validate_department_name(None).is_err());
        assert!(validate_department_name(Some(&"x".repeat(101))).is_err());
    }

    #[test]
    fn test_login_bounds() {
        assert!(validate_login("a@x.com", "p").is_ok());
        assert!(validate_login("", "p").is_err());
        let errors = validate_login("a@x.com", &"p".repeat(257)).unwrap_err();
        assert!(errors.get("password").is_some());
    }

    #[test]
    fn test_display_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "Name is required");
        errors.add("name", "ignored");
        assert_eq!(errors.to_string(), "Validation failed: name: Name is required");
    }
}
