//! User listing, profile lookup and profile edits.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::warn;

use crate::domain::port_errors::{EMAIL_TAKEN, map_company_error, map_user_error};
use crate::domain::ports::{CompanyRepository, UserProfileCommand, UserRepository, UsersQuery};
use crate::domain::tenancy::{load_session_user, resolve_actor};
use crate::domain::{CompanyId, Error, ProfileChanges, User, UserId, UserProfile};

/// Attach the user's company summary.
pub(crate) async fn build_profile<C>(companies: &C, user: User) -> Result<UserProfile, Error>
where
    C: CompanyRepository + ?Sized,
{
    let Some(company_id) = user.company_id else {
        return Ok(UserProfile {
            user,
            company: None,
        });
    };
    let company = companies
        .find_by_id(&company_id)
        .await
        .map_err(map_company_error)?;
    if company.is_none() {
        warn!(user_id = %user.id, company_id = %company_id, "user references a missing company");
    }
    Ok(UserProfile {
        user,
        company: company.map(|c| c.summary()),
    })
}

/// User service implementing [`UsersQuery`] and [`UserProfileCommand`].
#[derive(Clone)]
pub struct UsersService<U, C> {
    users: Arc<U>,
    companies: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<U, C> UsersService<U, C> {
    pub fn new(users: Arc<U>, companies: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            companies,
            clock,
        }
    }
}

#[async_trait]
impl<U, C> UsersQuery for UsersService<U, C>
where
    U: UserRepository,
    C: CompanyRepository,
{
    async fn list_users(
        &self,
        authenticated_user: &UserId,
        company_filter: Option<CompanyId>,
    ) -> Result<Vec<User>, Error> {
        let actor = resolve_actor(self.users.as_ref(), authenticated_user).await?;
        if let Some(requested) = company_filter {
            actor.ensure_member_of(&requested)?;
        }
        let Some(company_id) = actor.company_id else {
            return Ok(Vec::new());
        };
        self.users
            .list_by_company(&company_id)
            .await
            .map_err(map_user_error)
    }

    async fn user_profile(
        &self,
        authenticated_user: &UserId,
        target: &UserId,
    ) -> Result<UserProfile, Error> {
        let actor = resolve_actor(self.users.as_ref(), authenticated_user).await?;
        let user = self
            .users
            .find_by_id(target)
            .await
            .map_err(map_user_error)?
            .filter(|user| {
                user.id == actor.user_id
                    || (user.company_id.is_some() && user.company_id == actor.company_id)
            })
            .ok_or_else(|| Error::not_found("user not found"))?;
        build_profile(self.companies.as_ref(), user).await
    }
}

#[async_trait]
impl<U, C> UserProfileCommand for UsersService<U, C>
where
    U: UserRepository,
    C: CompanyRepository,
{
    async fn update_profile(
        &self,
        authenticated_user: &UserId,
        changes: ProfileChanges,
    ) -> Result<UserProfile, Error> {
        let user = load_session_user(self.users.as_ref(), authenticated_user).await?;
        if changes.is_empty() {
            return build_profile(self.companies.as_ref(), user).await;
        }

        if let Some(email) = changes.email.as_ref().filter(|e| **e != user.email) {
            let holder = self
                .users
                .find_by_email(email.as_ref())
                .await
                .map_err(map_user_error)?;
            if holder.is_some_and(|other| other.id != user.id) {
                return Err(Error::conflict(EMAIL_TAKEN));
            }
        }

        let updated = changes.apply(user, self.clock.utc());
        self.users.update(&updated).await.map_err(map_user_error)?;
        build_profile(self.companies.as_ref(), updated).await
    }
}

#[cfg(test)]
#[path = "users_service_tests.rs"]
mod tests;
