//! Driving ports for user-facing queries and profile edits.
//!
//! Inbound adapters (HTTP handlers) use these ports to fetch user-visible data
//! without importing outbound persistence concerns.

use async_trait::async_trait;

use crate::domain::{CompanyId, Error, ProfileChanges, User, UserId, UserProfile};

/// Domain use-case port for reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Users sharing the authenticated user's company.
    ///
    /// `company_filter`, when present, must name the caller's own company.
    async fn list_users(
        &self,
        authenticated_user: &UserId,
        company_filter: Option<CompanyId>,
    ) -> Result<Vec<User>, Error>;

    /// Profile of `target`, visible to the caller itself and to members of
    /// the same company.
    async fn user_profile(
        &self,
        authenticated_user: &UserId,
        target: &UserId,
    ) -> Result<UserProfile, Error>;
}

/// Domain use-case port for editing one's own profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileCommand: Send + Sync {
    async fn update_profile(
        &self,
        authenticated_user: &UserId,
        changes: ProfileChanges,
    ) -> Result<UserProfile, Error>;
}
