//! Authentication API handlers.
//!
//! ```text
//! POST /api/auth/register {"email":"ada@acme.test","password":"s3cret-pw",...}
//! POST /api/auth/login {"email":"ada@acme.test","password":"s3cret-pw"}
//! POST /api/auth/logout
//! POST /api/auth/join-company {"inviteCode":"K7Q2ZP"}
//! GET  /api/auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    CompanyName, CompanyRegistration, EmailAddress, Error, InviteCode, LoginCredentials,
    Password, PersonName, Registration, Role,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::dto::ProfileResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, company_field_error, credential_field_error, non_blank, require, user_field_error,
};

/// Registration body. Company fields only apply to `COMPANY_ADMIN`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "ada@acme.test")]
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    #[schema(example = "COMPANY_ADMIN")]
    pub role: Option<String>,
    pub company_name: Option<String>,
    pub company_tax_id: Option<String>,
    pub company_address: Option<String>,
    pub company_phone: Option<String>,
    pub company_email: Option<String>,
}

fn parse_email(raw: &str, field: FieldName) -> ApiResult<EmailAddress> {
    EmailAddress::new(raw).map_err(|err| user_field_error(field, err, raw))
}

fn parse_name(raw: &str, field: FieldName) -> ApiResult<PersonName> {
    PersonName::new(raw).map_err(|err| user_field_error(field, err, raw))
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let email_field = FieldName::new("email");
        let role_field = FieldName::new("role");
        let first_field = FieldName::new("firstName");
        let last_field = FieldName::new("lastName");

        let email = parse_email(&require(value.email, email_field)?, email_field)?;
        let password_raw = require(value.password, FieldName::new("password"))?;
        let password = Password::new(&password_raw).map_err(credential_field_error)?;
        let first_name = parse_name(&require(value.first_name, first_field)?, first_field)?;
        let last_name = parse_name(&require(value.last_name, last_field)?, last_field)?;
        let role_raw = require(value.role, role_field)?;
        let role: Role = role_raw
            .parse()
            .map_err(|err| user_field_error(role_field, err, &role_raw))?;

        let company_name = match role {
            Role::CompanyAdmin => non_blank(value.company_name),
            Role::Employee | Role::Technician => None,
        };
        let company = match company_name {
            Some(raw) => {
                let name_field = FieldName::new("companyName");
                let name = CompanyName::new(&raw)
                    .map_err(|err| company_field_error(name_field, err, &raw))?;
                let email = non_blank(value.company_email)
                    .map(|raw| parse_email(&raw, FieldName::new("companyEmail")))
                    .transpose()?;
                Some(CompanyRegistration {
                    name,
                    tax_id: non_blank(value.company_tax_id),
                    address: non_blank(value.company_address),
                    phone: non_blank(value.company_phone),
                    email,
                })
            }
            None => None,
        };

        Ok(Registration {
            email,
            password,
            first_name,
            last_name,
            phone: non_blank(value.phone),
            role,
            company,
        })
    }
}

/// Login request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada@acme.test")]
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password).map_err(credential_field_error)
    }
}

/// Join-company request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinCompanyRequest {
    #[schema(example = "K7Q2ZP")]
    pub invite_code: Option<String>,
}

/// `{user}` envelope returned by register and login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: ProfileResponse,
}

/// `{message, user}` envelope returned after joining a company.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JoinCompanyResponse {
    pub message: String,
    pub user: ProfileResponse,
}

/// Create an account and open a session.
///
/// Company administrators must supply `companyName`; their company is
/// created alongside the account with a fresh invite code.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let profile = state.auth.register(registration).await?;
    session.persist_user(&profile.user.id)?;
    info!(user_id = %profile.user.id, role = %profile.user.role, "user registered");
    Ok(HttpResponse::Created().json(AuthResponse {
        user: ProfileResponse::from(&profile),
    }))
}

/// Authenticate and open a session.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let profile = state.auth.login(&credentials).await?;
    session.renew();
    session.persist_user(&profile.user.id)?;
    Ok(web::Json(AuthResponse {
        user: ProfileResponse::from(&profile),
    }))
}

/// Drop the session cookie.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Attach the session user to the company owning an invite code.
#[utoipa::path(
    post,
    path = "/api/auth/join-company",
    request_body = JoinCompanyRequest,
    responses(
        (status = 200, description = "Joined", body = JoinCompanyResponse),
        (status = 400, description = "Malformed invite code", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown invite code", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "joinCompany"
)]
#[post("/join-company")]
pub async fn join_company(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<JoinCompanyRequest>,
) -> ApiResult<web::Json<JoinCompanyResponse>> {
    let user_id = session.require_user_id()?;
    let field = FieldName::new("inviteCode");
    let raw = require(payload.into_inner().invite_code, field)?;
    let code = InviteCode::new(&raw).map_err(|err| company_field_error(field, err, &raw))?;
    let profile = state.auth.join_company(&user_id, &code).await?;
    let message = match &profile.company {
        Some(company) => format!("Joined {}", company.name),
        None => "Joined company".to_owned(),
    };
    Ok(web::Json(JoinCompanyResponse {
        message,
        user: ProfileResponse::from(&profile),
    }))
}

/// Profile of the session user.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ProfileResponse>> {
    let user_id = session.require_user_id()?;
    let profile = state.auth.current(&user_id).await?;
    Ok(web::Json(ProfileResponse::from(&profile)))
}

#[cfg(test)]
mod tests;
