//! Port for password hashing and verification.

use async_trait::async_trait;

use crate::domain::{Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential hashers.
    pub enum CredentialHasherError {
        /// Hashing or verification could not be carried out.
        Hashing { message: String } => "credential hashing failed: {message}",
    }
}

/// One-way password hashing.
///
/// Verification of a wrong password is `Ok(false)`; errors are reserved for
/// malformed stored hashes or hasher failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, CredentialHasherError>;

    async fn verify(
        &self,
        candidate: &str,
        stored: &PasswordHash,
    ) -> Result<bool, CredentialHasherError>;
}
