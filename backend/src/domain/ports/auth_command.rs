//! Driving port for account lifecycle: registration, login and joining a
//! company.
//!
//! Inbound adapters use this port to authenticate callers without depending
//! on credential storage or hashing details.

use async_trait::async_trait;

use crate::domain::{Error, InviteCode, LoginCredentials, Registration, UserId, UserProfile};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthCommand: Send + Sync {
    /// Create an account. Company administrators also get their company.
    async fn register(&self, registration: Registration) -> Result<UserProfile, Error>;

    /// Authenticate credentials, returning the matching profile.
    async fn login(&self, credentials: &LoginCredentials) -> Result<UserProfile, Error>;

    /// Link the user to the company owning `code`.
    async fn join_company(
        &self,
        user_id: &UserId,
        code: &InviteCode,
    ) -> Result<UserProfile, Error>;

    /// Profile of the session user.
    async fn current(&self, user_id: &UserId) -> Result<UserProfile, Error>;
}
