//! # Authentication
//!
//! Password hashing and verification. Session/token management is out of
//! scope: a successful login returns the user profile directly.

pub mod crypto;

pub use crypto::{hash_password, verify_password, PasswordPolicy};
