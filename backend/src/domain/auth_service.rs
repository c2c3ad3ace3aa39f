//! Account registration, login and company joining.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::companies_service::with_fresh_invite_code;
use crate::domain::port_errors::{
    EMAIL_TAKEN, map_company_error, map_hasher_error, map_user_error,
};
use crate::domain::ports::{
    AuthCommand, CompanyPersistenceError, CompanyRepository, CredentialHasher, InviteCodeSource,
    UserRepository,
};
use crate::domain::tenancy::load_session_user;
use crate::domain::users_service::build_profile;
use crate::domain::{
    Company, CompanyId, CompanyRegistration, Error, InviteCode, LoginCredentials, PENDING_FIELD,
    Password, PasswordHash, Registration, Role, User, UserId, UserProfile,
};

/// Message returned for both unknown emails and wrong passwords.
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Hashed once and verified against when the email is unknown, so both
/// failures cost one verification.
const DECOY_PASSWORD: &str = "decoy-password-never-stored";

/// Authentication service implementing [`AuthCommand`].
#[derive(Clone)]
pub struct AuthService<U, C, H> {
    users: Arc<U>,
    companies: Arc<C>,
    hasher: Arc<H>,
    codes: Arc<dyn InviteCodeSource>,
    clock: Arc<dyn Clock>,
    decoy_hash: Arc<OnceLock<PasswordHash>>,
}

impl<U, C, H> AuthService<U, C, H> {
    pub fn new(
        users: Arc<U>,
        companies: Arc<C>,
        hasher: Arc<H>,
        codes: Arc<dyn InviteCodeSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            companies,
            hasher,
            codes,
            clock,
            decoy_hash: Arc::new(OnceLock::new()),
        }
    }
}

impl<U, C, H> AuthService<U, C, H>
where
    U: UserRepository,
    C: CompanyRepository,
    H: CredentialHasher,
{
    async fn decoy_hash(&self) -> Result<PasswordHash, Error> {
        if let Some(hash) = self.decoy_hash.get() {
            return Ok(hash.clone());
        }
        let password =
            Password::new(DECOY_PASSWORD).map_err(|err| Error::internal(err.to_string()))?;
        let hash = self
            .hasher
            .hash(&password)
            .await
            .map_err(map_hasher_error)?;
        Ok(self.decoy_hash.get_or_init(|| hash).clone())
    }

    async fn ensure_email_available(&self, email: &str) -> Result<(), Error> {
        let existing = self
            .users
            .find_by_email(email)
            .await
            .map_err(map_user_error)?;
        match existing {
            Some(_) => Err(Error::conflict(EMAIL_TAKEN)),
            None => Ok(()),
        }
    }

    async fn create_owned_company(
        &self,
        owner: &User,
        details: CompanyRegistration,
    ) -> Result<Company, Error> {
        let company_id = CompanyId::random();
        let mut owner = owner.clone();
        owner.company_id = Some(company_id);
        let owner = &owner;
        let details = &details;

        with_fresh_invite_code(self.codes.as_ref(), |invite_code| async move {
            let company = Company {
                id: company_id,
                name: details.name.clone(),
                tax_id: non_blank_or_pending(details.tax_id.as_deref()),
                address: non_blank_or_pending(details.address.as_deref()),
                phone: details.phone.clone(),
                email: details.email.clone(),
                invite_code,
                owner_id: owner.id,
                created_at: owner.created_at,
                updated_at: owner.created_at,
            };
            self.companies.register_owner(owner, &company).await?;
            Ok::<_, CompanyPersistenceError>(company)
        })
        .await
    }
}

fn non_blank_or_pending(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(PENDING_FIELD)
        .to_owned()
}

#[async_trait]
impl<U, C, H> AuthCommand for AuthService<U, C, H>
where
    U: UserRepository,
    C: CompanyRepository,
    H: CredentialHasher,
{
    async fn register(&self, registration: Registration) -> Result<UserProfile, Error> {
        let Registration {
            email,
            password,
            first_name,
            last_name,
            phone,
            role,
            company,
        } = registration;

        let company = match (role, company) {
            (Role::CompanyAdmin, None) => {
                return Err(Error::invalid_request(
                    "companyName is required for company administrators",
                )
                .with_details(json!({ "field": "companyName", "code": "missing_field" })));
            }
            (Role::CompanyAdmin, Some(details)) => Some(details),
            (_, _) => None,
        };

        self.ensure_email_available(email.as_ref()).await?;
        let password_hash = self
            .hasher
            .hash(&password)
            .await
            .map_err(map_hasher_error)?;

        let now = self.clock.utc();
        let mut user = User {
            id: UserId::random(),
            email,
            password_hash,
            first_name,
            last_name,
            phone,
            role,
            avatar: None,
            company_id: None,
            created_at: now,
            updated_at: now,
        };

        let Some(details) = company else {
            self.users.insert(&user).await.map_err(map_user_error)?;
            info!(user_id = %user.id, role = %user.role, "registered user");
            return Ok(UserProfile {
                user,
                company: None,
            });
        };

        let company = self.create_owned_company(&user, details).await?;
        user.company_id = Some(company.id);
        info!(user_id = %user.id, company_id = %company.id, "registered company owner");
        Ok(UserProfile {
            user,
            company: Some(company.summary()),
        })
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<UserProfile, Error> {
        let found = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?;
        let Some(user) = found else {
            let decoy = self.decoy_hash().await?;
            self.hasher
                .verify(credentials.password(), &decoy)
                .await
                .map_err(map_hasher_error)?;
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let verified = self
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .await
            .map_err(map_hasher_error)?;
        if !verified {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        build_profile(self.companies.as_ref(), user).await
    }

    async fn join_company(
        &self,
        user_id: &UserId,
        code: &InviteCode,
    ) -> Result<UserProfile, Error> {
        let mut user = load_session_user(self.users.as_ref(), user_id).await?;
        let company = self
            .companies
            .find_by_invite_code(code)
            .await
            .map_err(map_company_error)?
            .ok_or_else(|| Error::not_found("invalid invite code"))?;

        user.company_id = Some(company.id);
        user.updated_at = self.clock.utc();
        self.users.update(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id, company_id = %company.id, "user joined company");
        Ok(UserProfile {
            user,
            company: Some(company.summary()),
        })
    }

    async fn current(&self, user_id: &UserId) -> Result<UserProfile, Error> {
        let user = load_session_user(self.users.as_ref(), user_id).await?;
        build_profile(self.companies.as_ref(), user).await
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
