//! Per-route access policy
//!
//! Every request is evaluated against a table of `{method, path pattern,
//! access}` rules before it reaches a handler. Evaluation ends in one of four
//! states: no token, invalid token, valid token with an insufficient role,
//! or authorized. Only the last lets the request through.

use axum::http::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;
use workforce_db::Role;

use crate::error::AuthError;
use crate::jwt::{Claims, JwtManager};

/// Authenticated caller identity attached to a request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    /// Token subject (employee email)
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    /// Create from JWT claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            email: claims.sub.clone(),
            role: claims.role,
        }
    }
}

/// What a route demands from the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No token needed
    Public,
    /// Any valid token
    Authenticated,
    /// A valid token carrying exactly this role
    Role(Role),
}

#[derive(Debug, Clone)]
enum Segment {
    /// Literal segment that must match exactly
    Literal(String),
    /// Any single segment (`*` or `{name}`)
    Single,
    /// Zero or more trailing segments (`**`)
    Rest,
}

#[derive(Debug, Clone)]
struct RouteRule {
    method: Option<Method>,
    pattern: String,
    segments: Vec<Segment>,
    access: Access,
}

/// Ordered rule table; the first matching rule wins
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<RouteRule>,
    fallback: Access,
}

impl AccessPolicy {
    /// Create an empty policy applying `fallback` to unmatched requests
    pub fn new(fallback: Access) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    /// Append a rule; `None` as method matches every method
    pub fn rule(mut self, method: Option<Method>, pattern: &str, access: Access) -> Self {
        self.rules.push(RouteRule {
            method,
            pattern: pattern.to_string(),
            segments: compile_pattern(pattern),
            access,
        });
        self
    }

    /// Access required for a request
    pub fn required_access(&self, method: &Method, path: &str) -> Access {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        self.rules
            .iter()
            .find(|rule| {
                rule.method.as_ref().is_none_or(|m| m == method)
                    && matches_segments(&rule.segments, &segments)
            })
            .map(|rule| {
                debug!("{} {} matched access rule '{}'", method, path, rule.pattern);
                rule.access
            })
            .unwrap_or(self.fallback)
    }

    /// Evaluate a request against the policy
    ///
    /// Returns the caller identity (`None` for public routes), or the reason
    /// the request must be rejected.
    pub fn authorize(
        &self,
        jwt: &JwtManager,
        method: &Method,
        path: &str,
        authorization: Option<&str>,
    ) -> Result<Option<AuthUser>, AuthError> {
        let access = self.required_access(method, path);
        if access == Access::Public {
            return Ok(None);
        }

        let header = authorization.ok_or(AuthError::MissingAuthHeader)?;
        let token = extract_bearer_token(header)?;
        let claims = jwt.validate_token(token)?;
        let user = AuthUser::from_claims(&claims);

        if let Access::Role(required) = access
            && user.role != required
        {
            debug!(
                "{} lacks role {} for {} {}",
                user.email, required, method, path
            );
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(Some(user))
    }
}

/// Extract bearer token from authorization header
pub fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    match header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AuthError::InvalidAuthHeader),
    }
}

fn compile_pattern(pattern: &str) -> Vec<Segment> {
    pattern
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| match s {
            "**" => Segment::Rest,
            "*" => Segment::Single,
            s if s.starts_with('{') && s.ends_with('}') => Segment::Single,
            s => Segment::Literal(s.to_string()),
        })
        .collect()
}

fn matches_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match (pattern.first(), path.first()) {
        (None, None) => true,
        (Some(Segment::Rest), _) => true,
        (Some(Segment::Single), Some(_)) => matches_segments(&pattern[1..], &path[1..]),
        (Some(Segment::Literal(lit)), Some(seg)) if lit == seg => {
            matches_segments(&pattern[1..], &path[1..])
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn policy() -> AccessPolicy {
        AccessPolicy::new(Access::Authenticated)
            .rule(Some(Method::POST), "/auth/login", Access::Public)
            .rule(Some(Method::GET), "/health", Access::Public)
            .rule(Some(Method::POST), "/employees/**", Access::Role(Role::Admin))
            .rule(Some(Method::DELETE), "/employees/{id}", Access::Role(Role::Admin))
    }

    fn jwt() -> JwtManager {
        JwtManager::new("policy-test-secret", Duration::hours(1))
    }

    fn bearer(jwt: &JwtManager, role: Role) -> String {
        format!("Bearer {}", jwt.generate_token("caller@x.com", role).unwrap().token)
    }

    #[test]
    fn test_pattern_matching() {
        let policy = policy();

        assert_eq!(policy.required_access(&Method::POST, "/auth/login"), Access::Public);
        assert_eq!(
            policy.required_access(&Method::GET, "/auth/login"),
            Access::Authenticated
        );
        assert_eq!(
            policy.required_access(&Method::POST, "/employees"),
            Access::Role(Role::Admin)
        );
        assert_eq!(
            policy.required_access(&Method::DELETE, "/employees/7"),
            Access::Role(Role::Admin)
        );
        assert_eq!(
            policy.required_access(&Method::DELETE, "/employees/7/extra"),
            Access::Authenticated
        );
        assert_eq!(
            policy.required_access(&Method::GET, "/employees/7"),
            Access::Authenticated
        );
    }

    #[test]
    fn test_public_route_needs_no_token() {
        let result = policy().authorize(&jwt(), &Method::POST, "/auth/login", None);
        assert_eq!(result.unwrap(), None);
    }

    #[test]
    fn test_missing_token() {
        let result = policy().authorize(&jwt(), &Method::GET, "/employees", None);
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[test]
    fn test_invalid_token() {
        let jwt = jwt();
        let policy = policy();

        let result = policy.authorize(&jwt, &Method::GET, "/employees", Some("Basic abc"));
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));

        let result = policy.authorize(&jwt, &Method::GET, "/employees", Some("Bearer junk"));
        assert!(matches!(result, Err(AuthError::MalformedToken)));
    }

    #[test]
    fn test_insufficient_role() {
        let jwt = jwt();
        let header = bearer(&jwt, Role::User);

        let result = policy().authorize(&jwt, &Method::POST, "/employees", Some(&header));
        assert!(matches!(result, Err(AuthError::InsufficientPermissions)));
    }

    #[test]
    fn test_authorized() {
        let jwt = jwt();
        let policy = policy();

        let user_header = bearer(&jwt, Role::User);
        let user = policy
            .authorize(&jwt, &Method::GET, "/employees/3", Some(&user_header))
            .unwrap()
            .unwrap();
        assert_eq!(user.email, "caller@x.com");
        assert_eq!(user.role, Role::User);

        let admin_header = bearer(&jwt, Role::Admin);
        let admin = policy
            .authorize(&jwt, &Method::POST, "/employees", Some(&admin_header))
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def").unwrap(), "abc.def");
        assert!(extract_bearer_token("Bearer ").is_err());
        assert!(extract_bearer_token("bearer abc").is_err());
    }
}
