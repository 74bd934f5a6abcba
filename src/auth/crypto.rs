//! # Password Hashing
//!
//! Passwords are only ever stored as Argon2id hashes. Verification uses the
//! argon2 crate's constant-time comparison.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{ApiError, ApiResult};

/// Password requirements applied when a password is set or changed
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl PasswordPolicy {
    /// Validate a password against this policy
    pub fn validate(&self, password: &str) -> ApiResult<()> {
        if password.len() < self.min_length {
            return Err(ApiError::Validation(format!(
                "Password must be at least {} characters.",
                self.min_length
            )));
        }
        Ok(())
    }
}

/// Hash a password using Argon2id with a random salt
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| ApiError::Persistence)
}

/// Verify a password against its stored hash.
///
/// A malformed stored hash is treated as a failed login, not an internal
/// error, so a corrupted row cannot be used to probe the system.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
