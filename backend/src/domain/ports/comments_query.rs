//! Driving ports for ticket comments.

use async_trait::async_trait;

use crate::domain::{CommentId, CommentView, Error, NewComment, TicketId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsQuery: Send + Sync {
    /// Thread for a ticket in the caller's company, oldest first.
    async fn list_comments(
        &self,
        authenticated_user: &UserId,
        ticket_id: &TicketId,
    ) -> Result<Vec<CommentView>, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsCommand: Send + Sync {
    async fn create_comment(
        &self,
        authenticated_user: &UserId,
        comment: NewComment,
    ) -> Result<CommentView, Error>;

    /// Remove a comment; only its author may do so.
    async fn delete_comment(
        &self,
        authenticated_user: &UserId,
        comment_id: &CommentId,
    ) -> Result<(), Error>;
}
