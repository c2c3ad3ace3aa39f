//! Company reads, stats and invite-code management.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::port_errors::{map_company_error, map_user_error};
use crate::domain::ports::{
    CompaniesCommand, CompaniesQuery, CompanyPersistenceError, CompanyRepository,
    InviteCodeSource, UserRepository,
};
use crate::domain::tenancy::resolve_actor;
use crate::domain::{
    Company, CompanyDetail, CompanyId, CompanyMember, CompanyStats, CompanySummary, Error, InviteCode, UserId,
};

/// Attempts made to find an unused invite code before giving up.
pub const INVITE_CODE_ATTEMPTS: u32 = 5;

/// Run `attempt` with fresh invite codes until it does not collide.
///
/// A [`CompanyPersistenceError::DuplicateInviteCode`] triggers another draw,
/// up to [`INVITE_CODE_ATTEMPTS`] in total; any other failure is returned
/// immediately.
pub(crate) async fn with_fresh_invite_code<T, F, Fut>(
    codes: &dyn InviteCodeSource,
    mut attempt: F,
) -> Result<T, Error>
where
    F: FnMut(InviteCode) -> Fut,
    Fut: Future<Output = Result<T, CompanyPersistenceError>>,
{
    for round in 1..=INVITE_CODE_ATTEMPTS {
        match attempt(codes.next_code()).await {
            Ok(value) => return Ok(value),
            Err(CompanyPersistenceError::DuplicateInviteCode) => {
                debug!(round, "invite code collision, drawing another");
            }
            Err(other) => return Err(map_company_error(other)),
        }
    }
    Err(map_company_error(
        CompanyPersistenceError::duplicate_invite_code(),
    ))
}

/// Company service implementing [`CompaniesQuery`] and [`CompaniesCommand`].
#[derive(Clone)]
pub struct CompaniesService<U, C> {
    users: Arc<U>,
    companies: Arc<C>,
    codes: Arc<dyn InviteCodeSource>,
    clock: Arc<dyn Clock>,
}

impl<U, C> CompaniesService<U, C> {
    pub fn new(
        users: Arc<U>,
        companies: Arc<C>,
        codes: Arc<dyn InviteCodeSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            companies,
            codes,
            clock,
        }
    }
}

impl<U, C> CompaniesService<U, C>
where
    U: UserRepository,
    C: CompanyRepository,
{
    async fn load_company(&self, company_id: &CompanyId) -> Result<Company, Error> {
        self.companies
            .find_by_id(company_id)
            .await
            .map_err(map_company_error)?
            .ok_or_else(|| Error::not_found("company not found"))
    }

    /// Load a company the caller belongs to: `404` when missing, `403` when
    /// it is another tenant's.
    async fn load_member_company(
        &self,
        authenticated_user: &UserId,
        company_id: &CompanyId,
    ) -> Result<Company, Error> {
        let actor = resolve_actor(self.users.as_ref(), authenticated_user).await?;
        let company = self.load_company(company_id).await?;
        actor.ensure_member_of(&company.id)?;
        Ok(company)
    }
}

#[async_trait]
impl<U, C> CompaniesQuery for CompaniesService<U, C>
where
    U: UserRepository,
    C: CompanyRepository,
{
    async fn find_company(
        &self,
        authenticated_user: &UserId,
        company_id: &CompanyId,
    ) -> Result<CompanyDetail, Error> {
        let company = self
            .load_member_company(authenticated_user, company_id)
            .await?;
        let members = self
            .users
            .list_by_company(&company.id)
            .await
            .map_err(map_user_error)?;
        let owner = match members.iter().find(|m| m.id == company.owner_id) {
            Some(owner) => owner.summary(),
            None => self
                .users
                .find_by_id(&company.owner_id)
                .await
                .map_err(map_user_error)?
                .map(|owner| owner.summary())
                .ok_or_else(|| Error::internal("company owner record is missing"))?,
        };
        let stats = self
            .companies
            .stats(&company.id)
            .await
            .map_err(map_company_error)?;

        Ok(CompanyDetail {
            member_count: members.len() as u64,
            ticket_count: stats.total_tickets,
            members: members.iter().map(CompanyMember::from).collect(),
            owner,
            company,
        })
    }

    async fn company_stats(
        &self,
        authenticated_user: &UserId,
        company_id: &CompanyId,
    ) -> Result<CompanyStats, Error> {
        let company = self
            .load_member_company(authenticated_user, company_id)
            .await?;
        self.companies
            .stats(&company.id)
            .await
            .map_err(map_company_error)
    }

    async fn verify_invite_code(&self, code: &InviteCode) -> Result<CompanySummary, Error> {
        self.companies
            .find_by_invite_code(code)
            .await
            .map_err(map_company_error)?
            .map(|company| company.summary())
            .ok_or_else(|| Error::not_found("invalid invite code"))
    }
}

#[async_trait]
impl<U, C> CompaniesCommand for CompaniesService<U, C>
where
    U: UserRepository,
    C: CompanyRepository,
{
    async fn regenerate_invite_code(
        &self,
        authenticated_user: &UserId,
        company_id: &CompanyId,
    ) -> Result<InviteCode, Error> {
        let company = self.load_company(company_id).await?;
        if !company.is_owned_by(*authenticated_user) {
            return Err(Error::forbidden(
                "only the company owner can regenerate the invite code",
            ));
        }

        let now = self.clock.utc();
        let companies = self.companies.as_ref();
        let code = with_fresh_invite_code(self.codes.as_ref(), |code| async move {
            companies.update_invite_code(company_id, &code, now).await?;
            Ok::<_, CompanyPersistenceError>(code)
        })
        .await?;
        info!(company_id = %company.id, "regenerated invite code");
        Ok(code)
    }
}

#[cfg(test)]
#[path = "companies_service_tests.rs"]
mod tests;
