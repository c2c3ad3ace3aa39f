//! Tickets API handlers.
//!
//! ```text
//! GET    /api/tickets?myTickets=true
//! GET    /api/tickets/stats
//! GET    /api/tickets/{id}
//! POST   /api/tickets {"title":"Printer jam","description":"...","priority":"HIGH"}
//! PUT    /api/tickets/{id} {"status":"IN_PROGRESS","assignedToId":null}
//! PATCH  /api/tickets/{id}
//! DELETE /api/tickets/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Error, NewTicket, TicketChanges, TicketDescription, TicketFilter, TicketId, TicketPriority,
    TicketStatus, TicketTitle, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::dto::{
    MessageResponse, TicketDetailResponse, TicketResponse, TicketStatsResponse,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, double_option, non_blank, parse_id, require, ticket_field_error,
};

/// Query parameters for `GET /api/tickets`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListTicketsQuery {
    /// Only tickets the caller created or is assigned to. Any value other
    /// than `true` lists the whole company.
    #[param(example = "true")]
    pub my_tickets: Option<String>,
}

impl ListTicketsQuery {
    fn mine(&self) -> bool {
        self.my_tickets.as_deref() == Some("true")
    }
}

/// Body of `POST /api/tickets`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    #[schema(example = "Printer jam")]
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(example = "HIGH")]
    pub priority: Option<String>,
    pub category: Option<String>,
    pub assigned_to_id: Option<String>,
}

/// Body of `PUT`/`PATCH /api/tickets/{id}`. Explicit `null` clears
/// `category` or unassigns.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(example = "IN_PROGRESS")]
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub assigned_to_id: Option<Option<String>>,
}

fn parse_title(raw: &str) -> ApiResult<TicketTitle> {
    TicketTitle::new(raw).map_err(|err| ticket_field_error(FieldName::new("title"), err, raw))
}

fn parse_description(raw: &str) -> ApiResult<TicketDescription> {
    TicketDescription::new(raw)
        .map_err(|err| ticket_field_error(FieldName::new("description"), err, raw))
}

fn parse_priority(raw: &str) -> ApiResult<TicketPriority> {
    raw.parse()
        .map_err(|err| ticket_field_error(FieldName::new("priority"), err, raw))
}

fn parse_status(raw: &str) -> ApiResult<TicketStatus> {
    raw.parse()
        .map_err(|err| ticket_field_error(FieldName::new("status"), err, raw))
}

fn parse_assignee(raw: Option<String>) -> ApiResult<Option<UserId>> {
    non_blank(raw)
        .map(|raw| parse_id(&raw, FieldName::new("assignedToId")))
        .transpose()
}

impl TryFrom<CreateTicketRequest> for NewTicket {
    type Error = Error;

    fn try_from(value: CreateTicketRequest) -> Result<Self, Self::Error> {
        Ok(NewTicket {
            title: parse_title(&require(value.title, FieldName::new("title"))?)?,
            description: parse_description(&require(
                value.description,
                FieldName::new("description"),
            )?)?,
            priority: parse_priority(&require(value.priority, FieldName::new("priority"))?)?,
            category: non_blank(value.category),
            assigned_to: parse_assignee(value.assigned_to_id)?,
        })
    }
}

impl TryFrom<UpdateTicketRequest> for TicketChanges {
    type Error = Error;

    fn try_from(value: UpdateTicketRequest) -> Result<Self, Self::Error> {
        Ok(TicketChanges {
            title: value.title.as_deref().map(parse_title).transpose()?,
            description: value
                .description
                .as_deref()
                .map(parse_description)
                .transpose()?,
            status: value.status.as_deref().map(parse_status).transpose()?,
            priority: value.priority.as_deref().map(parse_priority).transpose()?,
            category: value.category.map(non_blank),
            assigned_to: value.assigned_to_id.map(parse_assignee).transpose()?,
        })
    }
}

fn ticket_id(raw: String) -> ApiResult<TicketId> {
    parse_id(&raw, FieldName::new("id"))
}

/// Tickets of the caller's company, newest first.
#[utoipa::path(
    get,
    path = "/api/tickets",
    params(ListTicketsQuery),
    responses(
        (status = 200, description = "Tickets", body = [TicketResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "listTickets"
)]
#[get("")]
pub async fn list_tickets(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListTicketsQuery>,
) -> ApiResult<web::Json<Vec<TicketResponse>>> {
    let user_id = session.require_user_id()?;
    let filter = TicketFilter {
        mine: query.mine(),
    };
    let tickets = state.tickets.list_tickets(&user_id, filter).await?;
    Ok(web::Json(tickets.iter().map(TicketResponse::from).collect()))
}

/// Ticket counts per status for the caller's company.
#[utoipa::path(
    get,
    path = "/api/tickets/stats",
    responses(
        (status = 200, description = "Statistics", body = TicketStatsResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "ticketStats"
)]
#[get("/stats")]
pub async fn ticket_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<TicketStatsResponse>> {
    let user_id = session.require_user_id()?;
    let stats = state.tickets.ticket_stats(&user_id).await?;
    Ok(web::Json(TicketStatsResponse::from(stats)))
}

/// Ticket with company and comment thread.
#[utoipa::path(
    get,
    path = "/api/tickets/{id}",
    params(("id" = String, Path, description = "Ticket identifier")),
    responses(
        (status = 200, description = "Ticket", body = TicketDetailResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Ticket belongs to another company", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "findTicket"
)]
#[get("/{id}")]
pub async fn find_ticket(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<TicketDetailResponse>> {
    let user_id = session.require_user_id()?;
    let id = ticket_id(path.into_inner())?;
    let detail = state.tickets.find_ticket(&user_id, &id).await?;
    Ok(web::Json(TicketDetailResponse::from(&detail)))
}

/// Open a ticket in the caller's company.
#[utoipa::path(
    post,
    path = "/api/tickets",
    request_body = CreateTicketRequest,
    responses(
        (status = 201, description = "Created", body = TicketResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller has no company", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "createTicket"
)]
#[post("")]
pub async fn create_ticket(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateTicketRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let ticket = NewTicket::try_from(payload.into_inner())?;
    let view = state.tickets_command.create_ticket(&user_id, ticket).await?;
    Ok(HttpResponse::Created().json(TicketResponse::from(&view)))
}

async fn apply_update(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateTicketRequest>,
) -> ApiResult<web::Json<TicketResponse>> {
    let user_id = session.require_user_id()?;
    let id = ticket_id(path.into_inner())?;
    let changes = TicketChanges::try_from(payload.into_inner())?;
    let view = state
        .tickets_command
        .update_ticket(&user_id, &id, changes)
        .await?;
    Ok(web::Json(TicketResponse::from(&view)))
}

/// Update ticket fields.
#[utoipa::path(
    put,
    path = "/api/tickets/{id}",
    params(("id" = String, Path, description = "Ticket identifier")),
    request_body = UpdateTicketRequest,
    responses(
        (status = 200, description = "Updated", body = TicketResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Ticket belongs to another company", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "updateTicket"
)]
#[put("/{id}")]
pub async fn update_ticket(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateTicketRequest>,
) -> ApiResult<web::Json<TicketResponse>> {
    apply_update(state, session, path, payload).await
}

/// Partially update ticket fields; same semantics as `PUT`.
#[utoipa::path(
    patch,
    path = "/api/tickets/{id}",
    params(("id" = String, Path, description = "Ticket identifier")),
    request_body = UpdateTicketRequest,
    responses(
        (status = 200, description = "Updated", body = TicketResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Ticket belongs to another company", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "patchTicket"
)]
#[patch("/{id}")]
pub async fn patch_ticket(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateTicketRequest>,
) -> ApiResult<web::Json<TicketResponse>> {
    apply_update(state, session, path, payload).await
}

/// Delete a ticket and its comments.
#[utoipa::path(
    delete,
    path = "/api/tickets/{id}",
    params(("id" = String, Path, description = "Ticket identifier")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Ticket belongs to another company", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "deleteTicket"
)]
#[delete("/{id}")]
pub async fn delete_ticket(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let user_id = session.require_user_id()?;
    let id = ticket_id(path.into_inner())?;
    state.tickets_command.delete_ticket(&user_id, &id).await?;
    Ok(web::Json(MessageResponse::new("Ticket deleted successfully")))
}
