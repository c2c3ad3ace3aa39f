//! Port for comment persistence.

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, CommentView, TicketId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by comment repository adapters.
    pub enum CommentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentPersistenceError>;

    async fn delete(&self, id: &CommentId) -> Result<(), CommentPersistenceError>;

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, CommentPersistenceError>;

    async fn find_view(
        &self,
        id: &CommentId,
    ) -> Result<Option<CommentView>, CommentPersistenceError>;

    /// Comments on a ticket with their authors, oldest first.
    async fn list_for_ticket(
        &self,
        ticket_id: &TicketId,
    ) -> Result<Vec<CommentView>, CommentPersistenceError>;
}
