//! Users API handlers.
//!
//! ```text
//! GET /api/users?companyId=...
//! GET /api/users/me
//! PUT /api/users/me {"firstName":"Ada","phone":null}
//! GET /api/users/{id}
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{CompanyId, EmailAddress, Error, PersonName, ProfileChanges, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::dto::{ProfileResponse, UserResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, double_option, parse_id, user_field_error};

/// Query parameters for `GET /api/users`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    /// Must match the caller's own company when present.
    pub company_id: Option<String>,
}

/// Partial profile update. Explicit `null` clears `phone` or `avatar`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub avatar: Option<Option<String>>,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

impl TryFrom<UpdateProfileRequest> for ProfileChanges {
    type Error = Error;

    fn try_from(value: UpdateProfileRequest) -> Result<Self, Self::Error> {
        let name = |raw: Option<String>, field: &'static str| {
            raw.map(|raw| {
                PersonName::new(&raw).map_err(|err| user_field_error(FieldName::new(field), err, &raw))
            })
            .transpose()
        };
        let email = value
            .email
            .map(|raw| {
                EmailAddress::new(&raw)
                    .map_err(|err| user_field_error(FieldName::new("email"), err, &raw))
            })
            .transpose()?;
        Ok(ProfileChanges {
            first_name: name(value.first_name, "firstName")?,
            last_name: name(value.last_name, "lastName")?,
            email,
            phone: value.phone.map(blank_to_none),
            avatar: value.avatar.map(blank_to_none),
        })
    }
}

/// List members of the caller's company.
///
/// Callers without a company receive an empty list.
#[utoipa::path(
    get,
    path = "/api/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListUsersQuery>,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let user_id = session.require_user_id()?;
    let company_filter = query
        .into_inner()
        .company_id
        .map(|raw| parse_id::<CompanyId>(&raw, FieldName::new("companyId")))
        .transpose()?;
    let users = state.users.list_users(&user_id, company_filter).await?;
    Ok(web::Json(users.iter().map(UserResponse::from).collect()))
}

/// Profile of the session user.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentProfile"
)]
#[get("/me")]
pub async fn current_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ProfileResponse>> {
    let user_id = session.require_user_id()?;
    let profile = state.users.user_profile(&user_id, &user_id).await?;
    Ok(web::Json(ProfileResponse::from(&profile)))
}

/// Update the session user's profile.
#[utoipa::path(
    put,
    path = "/api/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[put("/me")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let user_id = session.require_user_id()?;
    let changes = ProfileChanges::try_from(payload.into_inner())?;
    let profile = state.profile.update_profile(&user_id, changes).await?;
    Ok(web::Json(ProfileResponse::from(&profile)))
}

/// Profile of another member of the caller's company.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "userProfile"
)]
#[get("/{id}")]
pub async fn user_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let user_id = session.require_user_id()?;
    let target: UserId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let profile = state.users.user_profile(&user_id, &target).await?;
    Ok(web::Json(ProfileResponse::from(&profile)))
}
