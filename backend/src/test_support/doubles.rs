//! Deterministic clock, hasher and invite-code source.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{CredentialHasher, CredentialHasherError, InviteCodeSource};
use crate::domain::{InviteCode, Password, PasswordHash};

/// Clock frozen at a chosen instant until advanced.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Reversible "hasher" for tests; never use outside them.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextHasher;

const PLAINTEXT_PREFIX: &str = "plain$";

#[async_trait]
impl CredentialHasher for PlaintextHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, CredentialHasherError> {
        Ok(PasswordHash::new(format!(
            "{PLAINTEXT_PREFIX}{}",
            password.expose()
        )))
    }

    async fn verify(
        &self,
        candidate: &str,
        stored: &PasswordHash,
    ) -> Result<bool, CredentialHasherError> {
        let Some(expected) = stored.as_str().strip_prefix(PLAINTEXT_PREFIX) else {
            return Err(CredentialHasherError::hashing("not a plaintext fixture hash"));
        };
        Ok(expected == candidate)
    }
}

/// Invite codes `T00001`, `T00002`, ... in order.
#[derive(Debug, Default)]
pub struct SequentialInviteCodes(AtomicU32);

impl InviteCodeSource for SequentialInviteCodes {
    fn next_code(&self) -> InviteCode {
        let n = self.0.fetch_add(1, Ordering::Relaxed) + 1;
        match InviteCode::new(format!("T{:05}", n % 100_000)) {
            Ok(code) => code,
            Err(error) => panic!("sequential invite code is malformed: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_codes_are_distinct_and_valid() {
        let codes = SequentialInviteCodes::default();
        let first = codes.next_code();
        let second = codes.next_code();
        assert_eq!(first.as_ref(), "T00001");
        assert_eq!(second.as_ref(), "T00002");
    }

    #[tokio::test]
    async fn plaintext_hasher_verifies_round_trip() {
        let hasher = PlaintextHasher;
        let password = Password::new("letmein123").expect("password");
        let hash = hasher.hash(&password).await.expect("hash");
        assert!(hasher.verify("letmein123", &hash).await.expect("verify"));
        assert!(!hasher.verify("letmein124", &hash).await.expect("verify"));
    }
}
