//! Workforce Authentication and Authorization
//!
//! This crate provides password hashing, JWT token issuance/validation,
//! and the per-route access policy that gates every request.

pub mod error;
pub mod jwt;
pub mod password;
pub mod policy;

pub use error::AuthError;
pub use jwt::{Claims, IssuedToken, JwtManager};
pub use password::PasswordHasher;
pub use policy::{Access, AccessPolicy, AuthUser, extract_bearer_token};
