//! Password hashing with Argon2id

use argon2::password_hash::{
    self, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::AuthError;

/// One-way password hasher
///
/// Every hash embeds its own random salt and cost parameters in PHC string
/// format, so two hashes of the same password differ and verification keeps
/// working after the configured cost changes.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Create a hasher with explicit Argon2 cost parameters
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::PasswordHash(format!("Invalid params: {}", e)))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::PasswordHash(format!("Hashing failed: {}", e)))
    }

    /// Verify a plaintext password against a stored hash
    ///
    /// A mismatch is `Ok(false)`; a hash that cannot be parsed is an error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AuthError::PasswordHash(format!("Invalid hash: {}", e)))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::PasswordHash(format!("Verification failed: {}", e))),
        }
    }
}

impl Default for PasswordHasher {
    /// Argon2id with 19 MiB memory, 2 iterations, parallelism 1
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}
