//! Comments API handlers.
//!
//! ```text
//! GET    /api/comments/ticket/{ticketId}
//! POST   /api/comments {"ticketId":"...","content":"Replaced the toner"}
//! DELETE /api/comments/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CommentContent, CommentId, Error, NewComment, TicketId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::dto::{CommentResponse, MessageResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, comment_field_error, parse_id, require};

/// Body of `POST /api/comments`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub ticket_id: Option<String>,
    #[schema(example = "Replaced the toner")]
    pub content: Option<String>,
}

impl TryFrom<CreateCommentRequest> for NewComment {
    type Error = Error;

    fn try_from(value: CreateCommentRequest) -> Result<Self, Self::Error> {
        let ticket_field = FieldName::new("ticketId");
        let content_field = FieldName::new("content");
        let ticket_id = parse_id(&require(value.ticket_id, ticket_field)?, ticket_field)?;
        let content = CommentContent::new(require(value.content, content_field)?)
            .map_err(|err| comment_field_error(content_field, err))?;
        Ok(NewComment { ticket_id, content })
    }
}

/// Comment thread of a ticket, oldest first.
#[utoipa::path(
    get,
    path = "/api/comments/ticket/{ticketId}",
    params(("ticketId" = String, Path, description = "Ticket identifier")),
    responses(
        (status = 200, description = "Comments", body = [CommentResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Ticket belongs to another company", body = ErrorSchema),
        (status = 404, description = "Ticket not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "listComments"
)]
#[get("/ticket/{ticket_id}")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<CommentResponse>>> {
    let user_id = session.require_user_id()?;
    let ticket_id: TicketId = parse_id(&path.into_inner(), FieldName::new("ticketId"))?;
    let comments = state.comments.list_comments(&user_id, &ticket_id).await?;
    Ok(web::Json(comments.iter().map(CommentResponse::from).collect()))
}

/// Comment on a ticket in the caller's company.
#[utoipa::path(
    post,
    path = "/api/comments",
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Created", body = CommentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Ticket belongs to another company", body = ErrorSchema),
        (status = 404, description = "Ticket not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "createComment"
)]
#[post("")]
pub async fn create_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateCommentRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let comment = NewComment::try_from(payload.into_inner())?;
    let view = state.comments_command.create_comment(&user_id, comment).await?;
    Ok(HttpResponse::Created().json(CommentResponse::from(&view)))
}

/// Delete one of the caller's own comments.
#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    params(("id" = String, Path, description = "Comment identifier")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "deleteComment"
)]
#[delete("/{id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let user_id = session.require_user_id()?;
    let comment_id: CommentId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    state
        .comments_command
        .delete_comment(&user_id, &comment_id)
        .await?;
    Ok(web::Json(MessageResponse::new("Comment deleted successfully")))
}

#[cfg(test)]
mod tests {
    use actix_web::http::{Method, StatusCode};
    use actix_web::test as actix_test;
    use serde_json::{Value, json};

    use crate::inbound::http::test_utils::{
        Account, TestHarness, admin_body, create_ticket, get, invite_code_of, register,
        register_member, send_json,
    };

    async fn comment_on(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        account: &Account,
        ticket_id: &str,
        content: &str,
    ) -> crate::inbound::http::test_utils::Reply {
        send_json(
            app,
            Method::POST,
            "/api/comments",
            &account.cookie,
            json!({"ticketId": ticket_id, "content": content}),
        )
        .await
    }

    fn id_of(value: &Value) -> &str {
        value["id"].as_str().expect("id")
    }

    #[actix_web::test]
    async fn thread_is_oldest_first_with_authors() {
        let harness = TestHarness::new();
        let app = actix_test::init_service(harness.app()).await;
        let admin = register(&app, admin_body("ada@acme.test", "Acme")).await;
        let code = invite_code_of(&app, &admin).await;
        let grace = register_member(&app, "grace@acme.test", &code).await;
        let ticket = create_ticket(&app, &grace, "Printer jam").await;

        let first = comment_on(&app, &admin, id_of(&ticket), "  Have you tried turning it off?  ")
            .await;
        assert_eq!(first.status, StatusCode::CREATED);
        assert_eq!(first.body["content"], "Have you tried turning it off?");
        harness.clock.advance_seconds(30);
        comment_on(&app, &grace, id_of(&ticket), "Yes, still jams").await;

        let uri = format!("/api/comments/ticket/{}", id_of(&ticket));
        let thread = get(&app, &uri, &grace.cookie).await;
        assert_eq!(thread.status, StatusCode::OK);
        let authors: Vec<&str> = thread
            .body
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|c| c["author"]["email"].as_str())
            .collect();
        assert_eq!(authors, vec!["ada@acme.test", "grace@acme.test"]);

        let detail = get(&app, &format!("/api/tickets/{}", id_of(&ticket)), &grace.cookie).await;
        assert_eq!(detail.body["comments"].as_array().map(Vec::len), Some(2));
        let listed = get(&app, "/api/tickets", &grace.cookie).await;
        assert_eq!(listed.body[0]["commentCount"], 2);
    }

    #[actix_web::test]
    async fn outsiders_cannot_comment_or_read() {
        let harness = TestHarness::new();
        let app = actix_test::init_service(harness.app()).await;
        let acme = register(&app, admin_body("ada@acme.test", "Acme")).await;
        let globex = register(&app, admin_body("linus@globex.test", "Globex")).await;
        let ticket = create_ticket(&app, &acme, "Printer jam").await;

        let posted = comment_on(&app, &globex, id_of(&ticket), "Hello from Globex").await;
        assert_eq!(posted.status, StatusCode::FORBIDDEN);

        let uri = format!("/api/comments/ticket/{}", id_of(&ticket));
        let thread = get(&app, &uri, &globex.cookie).await;
        assert_eq!(thread.status, StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn blank_comment_is_rejected() {
        let harness = TestHarness::new();
        let app = actix_test::init_service(harness.app()).await;
        let admin = register(&app, admin_body("ada@acme.test", "Acme")).await;
        let ticket = create_ticket(&app, &admin, "Printer jam").await;

        let reply = comment_on(&app, &admin, id_of(&ticket), "   ").await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.body["details"]["field"], "content");
        assert_eq!(reply.body["details"]["code"], "blank");
    }

    #[actix_web::test]
    async fn only_the_author_deletes() {
        let harness = TestHarness::new();
        let app = actix_test::init_service(harness.app()).await;
        let admin = register(&app, admin_body("ada@acme.test", "Acme")).await;
        let code = invite_code_of(&app, &admin).await;
        let grace = register_member(&app, "grace@acme.test", &code).await;
        let ticket = create_ticket(&app, &grace, "Printer jam").await;
        let comment = comment_on(&app, &grace, id_of(&ticket), "Still jams").await;
        let uri = format!("/api/comments/{}", id_of(&comment.body));

        let denied = send_json(&app, Method::DELETE, &uri, &admin.cookie, json!({})).await;
        assert_eq!(denied.status, StatusCode::FORBIDDEN);

        let deleted = send_json(&app, Method::DELETE, &uri, &grace.cookie, json!({})).await;
        assert_eq!(deleted.status, StatusCode::OK);
        assert_eq!(deleted.body["message"], "Comment deleted successfully");

        let again = send_json(&app, Method::DELETE, &uri, &grace.cookie, json!({})).await;
        assert_eq!(again.status, StatusCode::NOT_FOUND);
    }
}
