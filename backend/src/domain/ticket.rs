//! Ticket data model: workflow enums, validated text fields and read views.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{CommentView, CompanyId, CompanySummary, TicketId, UserId, UserSummary};

/// Validation errors returned by ticket value constructors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketValidationError {
    #[error("title must be at least {min} characters")]
    TitleTooShort { min: usize },
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("description must be at least {min} characters")]
    DescriptionTooShort { min: usize },
    #[error("status must be OPEN, IN_PROGRESS, RESOLVED or CLOSED")]
    UnknownStatus,
    #[error("priority must be LOW, MEDIUM, HIGH or URGENT")]
    UnknownPriority,
}

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MIN: usize = 10;

/// Ticket workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = TicketValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Ok(Self::Open),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "RESOLVED" => Ok(Self::Resolved),
            "CLOSED" => Ok(Self::Closed),
            _ => Err(TicketValidationError::UnknownStatus),
        }
    }
}

/// Ticket urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TicketPriority {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        }
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketPriority {
    type Err = TicketValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            "URGENT" => Ok(Self::Urgent),
            _ => Err(TicketValidationError::UnknownPriority),
        }
    }
}

/// Trimmed ticket title between [`TITLE_MIN`] and [`TITLE_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TicketTitle(String);

impl TicketTitle {
    pub fn new(title: impl AsRef<str>) -> Result<Self, TicketValidationError> {
        let trimmed = title.as_ref().trim();
        let len = trimmed.chars().count();
        if len < TITLE_MIN {
            return Err(TicketValidationError::TitleTooShort { min: TITLE_MIN });
        }
        if len > TITLE_MAX {
            return Err(TicketValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for TicketTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<TicketTitle> for String {
    fn from(value: TicketTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for TicketTitle {
    type Error = TicketValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Trimmed ticket description of at least [`DESCRIPTION_MIN`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TicketDescription(String);

impl TicketDescription {
    pub fn new(description: impl AsRef<str>) -> Result<Self, TicketValidationError> {
        let trimmed = description.as_ref().trim();
        if trimmed.chars().count() < DESCRIPTION_MIN {
            return Err(TicketValidationError::DescriptionTooShort {
                min: DESCRIPTION_MIN,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for TicketDescription {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<TicketDescription> for String {
    fn from(value: TicketDescription) -> Self {
        value.0
    }
}

impl TryFrom<String> for TicketDescription {
    type Error = TicketValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Ticket record.
///
/// ## Invariants
/// - A ticket belongs to exactly one company for its whole lifetime.
/// - `assigned_to`, when set, references a member of `company_id` at
///   assignment time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: TicketId,
    pub title: TicketTitle,
    pub description: TicketDescription,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub category: Option<String>,
    pub created_by: UserId,
    pub assigned_to: Option<UserId>,
    pub company_id: CompanyId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a ticket. The company and creator come from
/// the acting user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub title: TicketTitle,
    pub description: TicketDescription,
    pub priority: TicketPriority,
    pub category: Option<String>,
    pub assigned_to: Option<UserId>,
}

/// Partial ticket update. `assigned_to: Some(None)` unassigns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketChanges {
    pub title: Option<TicketTitle>,
    pub description: Option<TicketDescription>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub category: Option<Option<String>>,
    pub assigned_to: Option<Option<UserId>>,
}

impl TicketChanges {
    /// Apply the changes to `ticket`, bumping `updated_at`.
    pub fn apply(self, mut ticket: Ticket, now: DateTime<Utc>) -> Ticket {
        if let Some(title) = self.title {
            ticket.title = title;
        }
        if let Some(description) = self.description {
            ticket.description = description;
        }
        if let Some(status) = self.status {
            ticket.status = status;
        }
        if let Some(priority) = self.priority {
            ticket.priority = priority;
        }
        if let Some(category) = self.category {
            ticket.category = category;
        }
        if let Some(assigned_to) = self.assigned_to {
            ticket.assigned_to = assigned_to;
        }
        ticket.updated_at = now;
        ticket
    }
}

/// Listing filter for `GET /tickets`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TicketFilter {
    /// Restrict to tickets the actor created or is assigned to.
    pub mine: bool,
}

/// Ticket counts per status for the actor's company.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TicketStats {
    pub total: u64,
    pub open: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub closed: u64,
}

impl TicketStats {
    /// Tally tickets by status.
    pub fn from_statuses(statuses: impl IntoIterator<Item = TicketStatus>) -> Self {
        Self::from_counts(statuses.into_iter().map(|status| (status, 1)))
    }

    /// Sum per-status counts; a status may appear more than once.
    pub fn from_counts(counts: impl IntoIterator<Item = (TicketStatus, u64)>) -> Self {
        counts
            .into_iter()
            .fold(Self::default(), |mut acc, (status, count)| {
                acc.total += count;
                match status {
                    TicketStatus::Open => acc.open += count,
                    TicketStatus::InProgress => acc.in_progress += count,
                    TicketStatus::Resolved => acc.resolved += count,
                    TicketStatus::Closed => acc.closed += count,
                }
                acc
            })
    }
}

/// Ticket joined with creator, assignee and comment count, as listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketView {
    pub ticket: Ticket,
    pub created_by: UserSummary,
    pub assigned_to: Option<UserSummary>,
    pub comment_count: u64,
}

/// Ticket with its company and full comment thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDetail {
    pub ticket: Ticket,
    pub created_by: UserSummary,
    pub assigned_to: Option<UserSummary>,
    pub company: CompanySummary,
    pub comments: Vec<CommentView>,
}
