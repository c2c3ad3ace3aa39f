//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain aggregates
//! re-validate stored values and report failures as plain strings so each
//! repository can wrap them in its own query error.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Comment, CommentContent, CommentId, Company, CompanyId, CompanyName, EmailAddress,
    InviteCode, PasswordHash, PersonName, Ticket, TicketDescription, TicketId, TicketTitle, User,
    UserId, UserSummary,
};

use super::schema::{comments, companies, tickets, users};

fn invalid(column: &str, err: impl std::fmt::Display) -> String {
    format!("invalid stored {column}: {err}")
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub avatar: Option<String>,
    pub company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::from_uuid(row.id),
            email: EmailAddress::new(&row.email).map_err(|err| invalid("email", err))?,
            password_hash: PasswordHash::new(row.password_hash),
            first_name: PersonName::new(&row.first_name)
                .map_err(|err| invalid("first_name", err))?,
            last_name: PersonName::new(&row.last_name).map_err(|err| invalid("last_name", err))?,
            phone: row.phone,
            role: row.role.parse().map_err(|err| invalid("role", err))?,
            avatar: row.avatar,
            company_id: row.company_id.map(CompanyId::from_uuid),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<UserRow> for UserSummary {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        User::try_from(row).map(|user| user.summary())
    }
}

/// Insertable and changeset form of a user.
///
/// `treat_none_as_null` makes updates clear `phone`, `avatar` and
/// `company_id` rather than skip them.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserRecord<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: Option<&'a str>,
    pub role: &'a str,
    pub avatar: Option<&'a str>,
    pub company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a User> for UserRecord<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            email: user.email.as_ref(),
            password_hash: user.password_hash.as_str(),
            first_name: user.first_name.as_ref(),
            last_name: user.last_name.as_ref(),
            phone: user.phone.as_deref(),
            role: user.role.as_str(),
            avatar: user.avatar.as_deref(),
            company_id: user.company_id.map(|id| *id.as_uuid()),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Companies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = companies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CompanyRow {
    pub id: Uuid,
    pub name: String,
    pub tax_id: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub invite_code: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CompanyRow> for Company {
    type Error = String;

    fn try_from(row: CompanyRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CompanyId::from_uuid(row.id),
            name: CompanyName::new(&row.name).map_err(|err| invalid("name", err))?,
            tax_id: row.tax_id,
            address: row.address,
            phone: row.phone,
            email: row
                .email
                .map(|raw| EmailAddress::new(&raw))
                .transpose()
                .map_err(|err| invalid("email", err))?,
            invite_code: InviteCode::new(&row.invite_code)
                .map_err(|err| invalid("invite_code", err))?,
            owner_id: UserId::from_uuid(row.owner_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = companies)]
pub(crate) struct NewCompanyRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub tax_id: &'a str,
    pub address: &'a str,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub invite_code: &'a str,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Company> for NewCompanyRow<'a> {
    fn from(company: &'a Company) -> Self {
        Self {
            id: *company.id.as_uuid(),
            name: company.name.as_ref(),
            tax_id: &company.tax_id,
            address: &company.address,
            phone: company.phone.as_deref(),
            email: company.email.as_ref().map(AsRef::as_ref),
            invite_code: company.invite_code.as_ref(),
            owner_id: *company.owner_id.as_uuid(),
            created_at: company.created_at,
            updated_at: company.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Tickets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tickets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TicketRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub category: Option<String>,
    pub created_by: Uuid,
    pub assigned_to: Option<Uuid>,
    pub company_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = String;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TicketId::from_uuid(row.id),
            title: TicketTitle::new(&row.title).map_err(|err| invalid("title", err))?,
            description: TicketDescription::new(&row.description)
                .map_err(|err| invalid("description", err))?,
            status: row.status.parse().map_err(|err| invalid("status", err))?,
            priority: row.priority.parse().map_err(|err| invalid("priority", err))?,
            category: row.category,
            created_by: UserId::from_uuid(row.created_by),
            assigned_to: row.assigned_to.map(UserId::from_uuid),
            company_id: CompanyId::from_uuid(row.company_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insertable and changeset form of a ticket.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tickets)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct TicketRecord<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub status: &'a str,
    pub priority: &'a str,
    pub category: Option<&'a str>,
    pub created_by: Uuid,
    pub assigned_to: Option<Uuid>,
    pub company_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Ticket> for TicketRecord<'a> {
    fn from(ticket: &'a Ticket) -> Self {
        Self {
            id: *ticket.id.as_uuid(),
            title: ticket.title.as_ref(),
            description: ticket.description.as_ref(),
            status: ticket.status.as_str(),
            priority: ticket.priority.as_str(),
            category: ticket.category.as_deref(),
            created_by: *ticket.created_by.as_uuid(),
            assigned_to: ticket.assigned_to.map(|id| *id.as_uuid()),
            company_id: *ticket.company_id.as_uuid(),
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: Uuid,
    pub content: String,
    pub ticket_id: Uuid,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CommentRow> for Comment {
    type Error = String;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CommentId::from_uuid(row.id),
            content: CommentContent::new(&row.content).map_err(|err| invalid("content", err))?,
            ticket_id: TicketId::from_uuid(row.ticket_id),
            author_id: UserId::from_uuid(row.author_id),
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub id: Uuid,
    pub content: &'a str,
    pub ticket_id: Uuid,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Comment> for NewCommentRow<'a> {
    fn from(comment: &'a Comment) -> Self {
        Self {
            id: *comment.id.as_uuid(),
            content: comment.content.as_ref(),
            ticket_id: *comment.ticket_id.as_uuid(),
            author_id: *comment.author_id.as_uuid(),
            created_at: comment.created_at,
        }
    }
}
