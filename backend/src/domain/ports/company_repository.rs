//! Port for company persistence, including the transactional owner
//! registration used when a company administrator signs up.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Company, CompanyId, CompanyStats, InviteCode, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by company repository adapters.
    pub enum CompanyPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "company repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "company repository query failed: {message}",
        /// The invite code collides with another company's code.
        DuplicateInviteCode => "invite code is already in use",
        /// The owning user's email collides with an existing account.
        DuplicateEmail => "email address is already registered",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Persist a new owner, their company and the owner's membership in a
    /// single transaction.
    ///
    /// `owner.company_id` is ignored on the initial insert and set to
    /// `company.id` once the company row exists. Nothing is written when any
    /// step fails.
    async fn register_owner(
        &self,
        owner: &User,
        company: &Company,
    ) -> Result<(), CompanyPersistenceError>;

    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>, CompanyPersistenceError>;

    async fn find_by_invite_code(
        &self,
        code: &InviteCode,
    ) -> Result<Option<Company>, CompanyPersistenceError>;

    /// Replace a company's invite code.
    async fn update_invite_code(
        &self,
        id: &CompanyId,
        code: &InviteCode,
        updated_at: DateTime<Utc>,
    ) -> Result<(), CompanyPersistenceError>;

    /// Ticket and member counters for the company dashboard.
    async fn stats(&self, id: &CompanyId) -> Result<CompanyStats, CompanyPersistenceError>;
}
