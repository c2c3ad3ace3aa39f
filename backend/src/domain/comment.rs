//! Ticket comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{CommentId, TicketId, UserId, UserSummary};

/// Maximum length of a comment body.
pub const COMMENT_MAX: usize = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommentValidationError {
    #[error("comment must not be empty")]
    Empty,
    #[error("comment must be at most {max} characters")]
    TooLong { max: usize },
}

/// Trimmed, non-empty comment text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommentContent(String);

impl CommentContent {
    pub fn new(content: impl AsRef<str>) -> Result<Self, CommentValidationError> {
        let trimmed = content.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CommentValidationError::Empty);
        }
        if trimmed.chars().count() > COMMENT_MAX {
            return Err(CommentValidationError::TooLong { max: COMMENT_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CommentContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<CommentContent> for String {
    fn from(value: CommentContent) -> Self {
        value.0
    }
}

impl TryFrom<String> for CommentContent {
    type Error = CommentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Comment record. A comment's company is always its ticket's company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub content: CommentContent,
    pub ticket_id: TicketId,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Input for `POST /comments`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub ticket_id: TicketId,
    pub content: CommentContent,
}

/// Comment joined with its author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub comment: Comment,
    pub author: UserSummary,
}
