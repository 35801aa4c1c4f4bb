//! Application state

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use workforce_auth::{AccessPolicy, JwtManager};
use workforce_core::{AuthService, DailySummaryJob, DepartmentService, EmployeeService};
use workforce_db::Database;

/// Handle used to render collected metrics
pub type MetricsHandle = PrometheusHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub policy: Arc<AccessPolicy>,
    pub auth: Arc<AuthService>,
    pub employees: Arc<EmployeeService>,
    pub departments: Arc<DepartmentService>,
    pub summaries: Arc<DailySummaryJob>,
}

impl AppState {
    pub fn new(
        db: Database,
        jwt: Arc<JwtManager>,
        policy: AccessPolicy,
        auth: Arc<AuthService>,
        employees: Arc<EmployeeService>,
        departments: Arc<DepartmentService>,
        summaries: Arc<DailySummaryJob>,
    ) -> Self {
        Self {
            db,
            jwt,
            policy: Arc::new(policy),
            auth,
            employees,
            departments,
            summaries,
        }
    }
}
