//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] gathers every HTTP endpoint from the inbound layer together
//! with the request/response DTOs and the [`ErrorSchema`] wrapper. The
//! document backs Swagger UI in debug builds and is exported by the
//! `openapi-dump` binary.

use crate::inbound::http::auth::{
    AuthResponse, JoinCompanyRequest, JoinCompanyResponse, LoginRequest, RegisterRequest,
};
use crate::inbound::http::comments::CreateCommentRequest;
use crate::inbound::http::companies::InviteCodeResponse;
use crate::inbound::http::dto::{
    CommentResponse, CompanyCounts, CompanyMemberResponse, CompanyResponse, CompanyStatsResponse,
    CompanySummaryResponse, MessageResponse, ProfileResponse, TicketDetailResponse, TicketResponse,
    TicketStatsResponse, UserResponse, UserSummaryResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::tickets::{CreateTicketRequest, UpdateTicketRequest};
use crate::inbound::http::users::UpdateProfileRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/login or /api/auth/register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "TicketClass API",
        description = "Multi-tenant helpdesk: companies, invite codes, tickets and comments."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::join_company,
        crate::inbound::http::auth::me,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::current_profile,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::users::user_profile,
        crate::inbound::http::companies::verify_invite_code,
        crate::inbound::http::companies::find_company,
        crate::inbound::http::companies::company_stats,
        crate::inbound::http::companies::regenerate_invite_code,
        crate::inbound::http::tickets::list_tickets,
        crate::inbound::http::tickets::ticket_stats,
        crate::inbound::http::tickets::find_ticket,
        crate::inbound::http::tickets::create_ticket,
        crate::inbound::http::tickets::update_ticket,
        crate::inbound::http::tickets::patch_ticket,
        crate::inbound::http::tickets::delete_ticket,
        crate::inbound::http::comments::list_comments,
        crate::inbound::http::comments::create_comment,
        crate::inbound::http::comments::delete_comment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RegisterRequest,
        LoginRequest,
        JoinCompanyRequest,
        AuthResponse,
        JoinCompanyResponse,
        UpdateProfileRequest,
        UserResponse,
        UserSummaryResponse,
        ProfileResponse,
        CompanySummaryResponse,
        CompanyMemberResponse,
        CompanyCounts,
        CompanyResponse,
        CompanyStatsResponse,
        InviteCodeResponse,
        CreateTicketRequest,
        UpdateTicketRequest,
        TicketResponse,
        TicketDetailResponse,
        TicketStatsResponse,
        CreateCommentRequest,
        CommentResponse,
        MessageResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login and company membership"),
        (name = "users", description = "Profiles of company members"),
        (name = "companies", description = "Company records and invite codes"),
        (name = "tickets", description = "Support tickets scoped to a company"),
        (name = "comments", description = "Ticket comment threads"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[test]
    fn ticket_schema_uses_camel_case() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let ticket = schemas.get("TicketResponse").expect("TicketResponse schema");

        assert_object_schema_has_field(ticket, "createdBy");
        assert_object_schema_has_field(ticket, "commentCount");
    }

    #[rstest]
    #[case("/api/auth/register")]
    #[case("/api/auth/join-company")]
    #[case("/api/users/me")]
    #[case("/api/companies/{id}/regenerate-code")]
    #[case("/api/tickets/{id}")]
    #[case("/api/comments/ticket/{ticketId}")]
    #[case("/health/ready")]
    fn documents_endpoint(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
