//! Argon2id password hashing.
//!
//! Hashing is CPU-bound, so both operations run on Tokio's blocking pool.
//! Hashes are PHC strings; verification reads the parameters embedded in the
//! stored hash, so raising the cost later does not invalidate old hashes.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::ports::{CredentialHasher, CredentialHasherError};
use crate::domain::{Password, PasswordHash};

/// `CredentialHasher` producing Argon2id PHC strings.
#[derive(Debug, Clone, Default)]
pub struct Argon2CredentialHasher {
    params: Params,
}

impl Argon2CredentialHasher {
    /// Hasher with the library's recommended Argon2id cost.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher with explicit cost parameters.
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn argon2(params: Params) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T, CredentialHasherError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CredentialHasherError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| CredentialHasherError::hashing(format!("hashing task failed: {err}")))?
}

#[async_trait]
impl CredentialHasher for Argon2CredentialHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, CredentialHasherError> {
        let secret = Zeroizing::new(password.expose().to_owned());
        let params = self.params.clone();
        run_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Self::argon2(params)
                .hash_password(secret.as_bytes(), &salt)
                .map(|hash| PasswordHash::new(hash.to_string()))
                .map_err(|err| CredentialHasherError::hashing(err.to_string()))
        })
        .await
    }

    async fn verify(
        &self,
        candidate: &str,
        stored: &PasswordHash,
    ) -> Result<bool, CredentialHasherError> {
        let secret = Zeroizing::new(candidate.to_owned());
        let encoded = stored.as_str().to_owned();
        let params = self.params.clone();
        run_blocking(move || {
            let parsed = password_hash::PasswordHash::new(&encoded)
                .map_err(|err| CredentialHasherError::hashing(format!("stored hash: {err}")))?;
            match Self::argon2(params).verify_password(secret.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(password_hash::Error::Password) => Ok(false),
                Err(err) => Err(CredentialHasherError::hashing(err.to_string())),
            }
        })
        .await
    }
}
