//! Company scoping for every authenticated operation.
//!
//! Handlers only know the session user id. Services turn it into an
//! [`Actor`] by reloading the user, so a freshly joined company takes effect
//! on the next request, and then route every tenant comparison through the
//! methods here.

use crate::domain::ports::UserRepository;
use crate::domain::port_errors::map_user_error;
use crate::domain::{CompanyId, Error, Role, User, UserId};

/// Message returned when a company-scoped operation is attempted by a user
/// without a company.
pub const NO_COMPANY: &str = "you must belong to a company";

/// Authenticated user plus the tenancy facts needed for authorisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
    pub company_id: Option<CompanyId>,
}

impl Actor {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            company_id: user.company_id,
        }
    }

    /// The actor's company, or `403` when they have none.
    pub fn require_company(&self) -> Result<CompanyId, Error> {
        self.company_id.ok_or_else(|| Error::forbidden(NO_COMPANY))
    }

    /// `Ok` when the actor belongs to `company_id`, `403` otherwise.
    pub fn ensure_member_of(&self, company_id: &CompanyId) -> Result<(), Error> {
        if self.company_id.as_ref() == Some(company_id) {
            Ok(())
        } else {
            Err(Error::forbidden("resource belongs to another company"))
        }
    }
}

/// Load the session user, failing with `401` when the account no longer
/// exists.
pub(crate) async fn load_session_user<U>(users: &U, user_id: &UserId) -> Result<User, Error>
where
    U: UserRepository + ?Sized,
{
    users
        .find_by_id(user_id)
        .await
        .map_err(map_user_error)?
        .ok_or_else(|| Error::unauthorized("session user no longer exists"))
}

/// Resolve the [`Actor`] for a session user id.
pub(crate) async fn resolve_actor<U>(users: &U, user_id: &UserId) -> Result<Actor, Error>
where
    U: UserRepository + ?Sized,
{
    load_session_user(users, user_id)
        .await
        .map(|user| Actor::from_user(&user))
}
