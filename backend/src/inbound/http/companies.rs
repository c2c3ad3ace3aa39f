//! Companies API handlers.
//!
//! ```text
//! GET  /api/companies/verify-code/{code}
//! GET  /api/companies/{id}
//! GET  /api/companies/{id}/stats
//! POST /api/companies/{id}/regenerate-code
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{CompanyId, InviteCode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::dto::{CompanyResponse, CompanyStatsResponse, CompanySummaryResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, company_field_error, parse_id};

/// Body returned after rotating an invite code.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteCodeResponse {
    #[schema(example = "K7Q2ZP")]
    pub invite_code: String,
}

fn company_id(raw: String) -> ApiResult<CompanyId> {
    parse_id(&raw, FieldName::new("id"))
}

/// Resolve an invite code to its company before joining.
#[utoipa::path(
    get,
    path = "/api/companies/verify-code/{code}",
    params(("code" = String, Path, description = "Six character invite code")),
    responses(
        (status = 200, description = "Company owning the code", body = CompanySummaryResponse),
        (status = 400, description = "Malformed invite code", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown invite code", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "verifyInviteCode"
)]
#[get("/verify-code/{code}")]
pub async fn verify_invite_code(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<CompanySummaryResponse>> {
    session.require_user_id()?;
    let raw = path.into_inner();
    let code = InviteCode::new(&raw)
        .map_err(|err| company_field_error(FieldName::new("code"), err, &raw))?;
    let summary = state.companies.verify_invite_code(&code).await?;
    Ok(web::Json(CompanySummaryResponse::from(&summary)))
}

/// Company record with owner, members and counts.
#[utoipa::path(
    get,
    path = "/api/companies/{id}",
    params(("id" = String, Path, description = "Company identifier")),
    responses(
        (status = 200, description = "Company", body = CompanyResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not a member", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "findCompany"
)]
#[get("/{id}")]
pub async fn find_company(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<CompanyResponse>> {
    let user_id = session.require_user_id()?;
    let id = company_id(path.into_inner())?;
    let detail = state.companies.find_company(&user_id, &id).await?;
    Ok(web::Json(CompanyResponse::from(&detail)))
}

/// Dashboard counters for a company.
#[utoipa::path(
    get,
    path = "/api/companies/{id}/stats",
    params(("id" = String, Path, description = "Company identifier")),
    responses(
        (status = 200, description = "Statistics", body = CompanyStatsResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not a member", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "companyStats"
)]
#[get("/{id}/stats")]
pub async fn company_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<CompanyStatsResponse>> {
    let user_id = session.require_user_id()?;
    let id = company_id(path.into_inner())?;
    let stats = state.companies.company_stats(&user_id, &id).await?;
    Ok(web::Json(CompanyStatsResponse::from(stats)))
}

/// Replace the company's invite code. Owner only.
#[utoipa::path(
    post,
    path = "/api/companies/{id}/regenerate-code",
    params(("id" = String, Path, description = "Company identifier")),
    responses(
        (status = 200, description = "New invite code", body = InviteCodeResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "No unique code could be allocated", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "regenerateInviteCode"
)]
#[post("/{id}/regenerate-code")]
pub async fn regenerate_invite_code(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<InviteCodeResponse>> {
    let user_id = session.require_user_id()?;
    let id = company_id(path.into_inner())?;
    let code = state
        .companies_command
        .regenerate_invite_code(&user_id, &id)
        .await?;
    info!(company_id = %id, "invite code regenerated");
    Ok(web::Json(InviteCodeResponse {
        invite_code: code.to_string(),
    }))
}
