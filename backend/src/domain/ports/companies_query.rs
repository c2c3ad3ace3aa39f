//! Driving ports for company reads and invite-code management.

use async_trait::async_trait;

use crate::domain::{
    CompanyDetail, CompanyId, CompanyStats, CompanySummary, Error, InviteCode, UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompaniesQuery: Send + Sync {
    /// Company with owner and members; members only.
    async fn find_company(
        &self,
        authenticated_user: &UserId,
        company_id: &CompanyId,
    ) -> Result<CompanyDetail, Error>;

    /// Dashboard counters; members only.
    async fn company_stats(
        &self,
        authenticated_user: &UserId,
        company_id: &CompanyId,
    ) -> Result<CompanyStats, Error>;

    /// Resolve an invite code to the company it belongs to.
    async fn verify_invite_code(&self, code: &InviteCode) -> Result<CompanySummary, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompaniesCommand: Send + Sync {
    /// Replace the company's invite code; owner only.
    async fn regenerate_invite_code(
        &self,
        authenticated_user: &UserId,
        company_id: &CompanyId,
    ) -> Result<InviteCode, Error>;
}
