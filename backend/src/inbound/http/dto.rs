//! JSON response bodies shared by the HTTP handlers.
//!
//! Domain aggregates stay free of serde and OpenAPI concerns; these DTOs
//! fix the camelCase wire shape and never carry password hashes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    CommentView, Company, CompanyDetail, CompanyMember, CompanyStats, CompanySummary, TicketDetail, TicketStats,
    TicketView, User, UserProfile, UserSummary,
};

/// Public user record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    #[schema(example = "EMPLOYEE")]
    pub role: String,
    pub avatar: Option<String>,
    pub company_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.to_string(),
            first_name: user.first_name.to_string(),
            last_name: user.last_name.to_string(),
            phone: user.phone.clone(),
            role: user.role.as_str().to_owned(),
            avatar: user.avatar.clone(),
            company_id: user.company_id.map(|id| id.to_string()),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// `{id, name}` company projection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummaryResponse {
    pub id: String,
    pub name: String,
}

impl From<&CompanySummary> for CompanySummaryResponse {
    fn from(summary: &CompanySummary) -> Self {
        Self {
            id: summary.id.to_string(),
            name: summary.name.to_string(),
        }
    }
}

/// User with the company they belong to.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub company: Option<CompanySummaryResponse>,
}

impl From<&UserProfile> for ProfileResponse {
    fn from(profile: &UserProfile) -> Self {
        Self {
            user: UserResponse::from(&profile.user),
            company: profile.company.as_ref().map(CompanySummaryResponse::from),
        }
    }
}

/// Compact user embedded in tickets, comments and companies.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl From<&UserSummary> for UserSummaryResponse {
    fn from(summary: &UserSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            first_name: summary.first_name.to_string(),
            last_name: summary.last_name.to_string(),
            email: summary.email.to_string(),
            avatar: summary.avatar.clone(),
        }
    }
}

/// Company member with the role they hold.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMemberResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[schema(example = "TECHNICIAN")]
    pub role: String,
    pub avatar: Option<String>,
}

impl From<&CompanyMember> for CompanyMemberResponse {
    fn from(member: &CompanyMember) -> Self {
        let UserSummaryResponse {
            id,
            first_name,
            last_name,
            email,
            avatar,
        } = UserSummaryResponse::from(&member.user);
        Self {
            id,
            first_name,
            last_name,
            email,
            role: member.role.as_str().to_owned(),
            avatar,
        }
    }
}

/// Member and ticket totals shown on the company page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyCounts {
    pub members: u64,
    pub tickets: u64,
}

/// Full company record with owner and members.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    pub id: String,
    pub name: String,
    pub tax_id: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[schema(example = "K7Q2ZP")]
    pub invite_code: String,
    pub owner_id: String,
    pub owner: UserSummaryResponse,
    pub members: Vec<CompanyMemberResponse>,
    pub count: CompanyCounts,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CompanyDetail> for CompanyResponse {
    fn from(detail: &CompanyDetail) -> Self {
        let Company {
            id,
            name,
            tax_id,
            address,
            phone,
            email,
            invite_code,
            owner_id,
            created_at,
            updated_at,
        } = &detail.company;
        Self {
            id: id.to_string(),
            name: name.to_string(),
            tax_id: tax_id.clone(),
            address: address.clone(),
            phone: phone.clone(),
            email: email.as_ref().map(ToString::to_string),
            invite_code: invite_code.to_string(),
            owner_id: owner_id.to_string(),
            owner: UserSummaryResponse::from(&detail.owner),
            members: detail.members.iter().map(CompanyMemberResponse::from).collect(),
            count: CompanyCounts {
                members: detail.member_count,
                tickets: detail.ticket_count,
            },
            created_at: *created_at,
            updated_at: *updated_at,
        }
    }
}

/// Company dashboard counters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyStatsResponse {
    pub total_tickets: u64,
    pub open_tickets: u64,
    pub in_progress_tickets: u64,
    pub resolved_tickets: u64,
    pub total_members: u64,
}

impl From<CompanyStats> for CompanyStatsResponse {
    fn from(stats: CompanyStats) -> Self {
        Self {
            total_tickets: stats.total_tickets,
            open_tickets: stats.open_tickets,
            in_progress_tickets: stats.in_progress_tickets,
            resolved_tickets: stats.resolved_tickets,
            total_members: stats.total_members,
        }
    }
}

/// Ticket as listed, created or updated.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    #[schema(example = "OPEN")]
    pub status: String,
    #[schema(example = "MEDIUM")]
    pub priority: String,
    pub category: Option<String>,
    pub company_id: String,
    pub created_by: UserSummaryResponse,
    pub assigned_to: Option<UserSummaryResponse>,
    pub comment_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&TicketView> for TicketResponse {
    fn from(view: &TicketView) -> Self {
        let ticket = &view.ticket;
        Self {
            id: ticket.id.to_string(),
            title: ticket.title.as_ref().to_owned(),
            description: ticket.description.as_ref().to_owned(),
            status: ticket.status.as_str().to_owned(),
            priority: ticket.priority.as_str().to_owned(),
            category: ticket.category.clone(),
            company_id: ticket.company_id.to_string(),
            created_by: UserSummaryResponse::from(&view.created_by),
            assigned_to: view.assigned_to.as_ref().map(UserSummaryResponse::from),
            comment_count: view.comment_count,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        }
    }
}

/// Comment with its author.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub content: String,
    pub ticket_id: String,
    pub author: UserSummaryResponse,
    pub created_at: DateTime<Utc>,
}

impl From<&CommentView> for CommentResponse {
    fn from(view: &CommentView) -> Self {
        Self {
            id: view.comment.id.to_string(),
            content: view.comment.content.as_ref().to_owned(),
            ticket_id: view.comment.ticket_id.to_string(),
            author: UserSummaryResponse::from(&view.author),
            created_at: view.comment.created_at,
        }
    }
}

/// Ticket with its company and comment thread.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketDetailResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub category: Option<String>,
    pub created_by: UserSummaryResponse,
    pub assigned_to: Option<UserSummaryResponse>,
    pub company: CompanySummaryResponse,
    pub comments: Vec<CommentResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&TicketDetail> for TicketDetailResponse {
    fn from(detail: &TicketDetail) -> Self {
        let ticket = &detail.ticket;
        Self {
            id: ticket.id.to_string(),
            title: ticket.title.as_ref().to_owned(),
            description: ticket.description.as_ref().to_owned(),
            status: ticket.status.as_str().to_owned(),
            priority: ticket.priority.as_str().to_owned(),
            category: ticket.category.clone(),
            created_by: UserSummaryResponse::from(&detail.created_by),
            assigned_to: detail.assigned_to.as_ref().map(UserSummaryResponse::from),
            company: CompanySummaryResponse::from(&detail.company),
            comments: detail.comments.iter().map(CommentResponse::from).collect(),
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        }
    }
}

/// Ticket counts per status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketStatsResponse {
    pub total: u64,
    pub open: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub closed: u64,
}

impl From<TicketStats> for TicketStatsResponse {
    fn from(stats: TicketStats) -> Self {
        Self {
            total: stats.total,
            open: stats.open,
            in_progress: stats.in_progress,
            resolved: stats.resolved,
            closed: stats.closed,
        }
    }
}

/// Plain confirmation body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Ticket deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
