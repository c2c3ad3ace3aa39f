//! Comment threads on tickets.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::port_errors::{map_comment_error, map_ticket_error};
use crate::domain::ports::{
    CommentRepository, CommentsCommand, CommentsQuery, TicketRepository, UserRepository,
};
use crate::domain::tenancy::{Actor, resolve_actor};
use crate::domain::{
    Comment, CommentId, CommentView, Error, NewComment, Ticket, TicketId, UserId,
};

/// Comment service implementing [`CommentsQuery`] and [`CommentsCommand`].
#[derive(Clone)]
pub struct CommentsService<U, T, M> {
    users: Arc<U>,
    tickets: Arc<T>,
    comments: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<U, T, M> CommentsService<U, T, M> {
    pub fn new(users: Arc<U>, tickets: Arc<T>, comments: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            tickets,
            comments,
            clock,
        }
    }
}

impl<U, T, M> CommentsService<U, T, M>
where
    U: UserRepository,
    T: TicketRepository,
    M: CommentRepository,
{
    async fn load_scoped_ticket(
        &self,
        actor: &Actor,
        ticket_id: &TicketId,
    ) -> Result<Ticket, Error> {
        let ticket = self
            .tickets
            .find_by_id(ticket_id)
            .await
            .map_err(map_ticket_error)?
            .ok_or_else(|| Error::not_found("ticket not found"))?;
        actor.ensure_member_of(&ticket.company_id)?;
        Ok(ticket)
    }
}

#[async_trait]
impl<U, T, M> CommentsQuery for CommentsService<U, T, M>
where
    U: UserRepository,
    T: TicketRepository,
    M: CommentRepository,
{
    async fn list_comments(
        &self,
        authenticated_user: &UserId,
        ticket_id: &TicketId,
    ) -> Result<Vec<CommentView>, Error> {
        let actor = resolve_actor(self.users.as_ref(), authenticated_user).await?;
        let ticket = self.load_scoped_ticket(&actor, ticket_id).await?;
        self.comments
            .list_for_ticket(&ticket.id)
            .await
            .map_err(map_comment_error)
    }
}

#[async_trait]
impl<U, T, M> CommentsCommand for CommentsService<U, T, M>
where
    U: UserRepository,
    T: TicketRepository,
    M: CommentRepository,
{
    async fn create_comment(
        &self,
        authenticated_user: &UserId,
        comment: NewComment,
    ) -> Result<CommentView, Error> {
        let actor = resolve_actor(self.users.as_ref(), authenticated_user).await?;
        let ticket = self.load_scoped_ticket(&actor, &comment.ticket_id).await?;
        let record = Comment {
            id: CommentId::random(),
            content: comment.content,
            ticket_id: ticket.id,
            author_id: actor.user_id,
            created_at: self.clock.utc(),
        };
        self.comments
            .insert(&record)
            .await
            .map_err(map_comment_error)?;
        self.comments
            .find_view(&record.id)
            .await
            .map_err(map_comment_error)?
            .ok_or_else(|| Error::internal("comment disappeared after write"))
    }

    async fn delete_comment(
        &self,
        authenticated_user: &UserId,
        comment_id: &CommentId,
    ) -> Result<(), Error> {
        let actor = resolve_actor(self.users.as_ref(), authenticated_user).await?;
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await
            .map_err(map_comment_error)?
            .ok_or_else(|| Error::not_found("comment not found"))?;
        self.load_scoped_ticket(&actor, &comment.ticket_id).await?;
        if comment.author_id != actor.user_id {
            return Err(Error::forbidden("only the author can delete this comment"));
        }
        self.comments
            .delete(&comment.id)
            .await
            .map_err(map_comment_error)
    }
}

#[cfg(test)]
#[path = "comments_service_tests.rs"]
mod tests;
