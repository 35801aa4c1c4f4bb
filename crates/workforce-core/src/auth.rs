//! Login service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::counter;
use tracing::{debug, info};
use workforce_auth::{AuthError, JwtManager, PasswordHasher};
use workforce_db::{Database, Role};

use crate::error::CoreError;
use crate::validation::validate_login;

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub email: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// Authenticates employees by email and password and issues tokens
pub struct AuthService {
    db: Database,
    jwt: Arc<JwtManager>,
    hasher: PasswordHasher,
    /// Verified against when the email is unknown, so both failure paths
    /// perform one hash verification
    dummy_hash: String,
}

impl AuthService {
    pub fn new(db: Database, jwt: Arc<JwtManager>, hasher: PasswordHasher) -> Result<Self, CoreError> {
        let dummy_hash = hasher.hash("workforce-dummy-password")?;
        Ok(Self {
            db,
            jwt,
            hasher,
            dummy_hash,
        })
    }

    pub fn jwt(&self) -> &JwtManager {
        &self.jwt
    }

    /// Check credentials and issue a token
    ///
    /// Unknown email and wrong password produce the same
    /// [`AuthError::InvalidCredentials`].
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, CoreError> {
        validate_login(email, password)?;
        let email = email.trim();

        let employee = self.db.get_employee_by_email(email).await?;

        let verified = match &employee {
            Some(employee) => self.hasher.verify(password, &employee.password_hash)?,
            None => {
                self.hasher.verify(password, &self.dummy_hash)?;
                false
            }
        };

        let employee = match employee {
            Some(employee) if verified => employee,
            _ => {
                debug!("Rejected login for {}", email);
                counter!("workforce_logins_total", "outcome" => "failure").increment(1);
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let issued = self.jwt.generate_token(&employee.email, employee.role)?;

        info!("Employee {} logged in as {}", employee.email, employee.role);
        counter!("workforce_logins_total", "outcome" => "success").increment(1);

        Ok(LoginOutcome {
            token: issued.token,
            email: employee.email,
            role: employee.role,
            expires_at: issued.expires_at,
        })
    }
}
