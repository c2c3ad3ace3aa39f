//! Ticket use cases scoped to the caller's company.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::port_errors::{
    map_comment_error, map_company_error, map_ticket_error, map_user_error,
};
use crate::domain::ports::{
    CommentRepository, CompanyRepository, TicketRepository, TicketsCommand, TicketsQuery,
    UserRepository,
};
use crate::domain::tenancy::{Actor, resolve_actor};
use crate::domain::{
    CompanyId, Error, NewTicket, Ticket, TicketChanges, TicketDetail, TicketFilter, TicketId,
    TicketStats, TicketStatus, TicketView, UserId,
};

/// Ticket service implementing [`TicketsQuery`] and [`TicketsCommand`].
#[derive(Clone)]
pub struct TicketsService<U, C, T, M> {
    users: Arc<U>,
    companies: Arc<C>,
    tickets: Arc<T>,
    comments: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<U, C, T, M> TicketsService<U, C, T, M> {
    pub fn new(
        users: Arc<U>,
        companies: Arc<C>,
        tickets: Arc<T>,
        comments: Arc<M>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            companies,
            tickets,
            comments,
            clock,
        }
    }
}

impl<U, C, T, M> TicketsService<U, C, T, M>
where
    U: UserRepository,
    C: CompanyRepository,
    T: TicketRepository,
    M: CommentRepository,
{
    /// Fetch a ticket the actor may see: `404` when missing, `403` when it
    /// belongs to another company.
    async fn load_scoped(&self, actor: &Actor, ticket_id: &TicketId) -> Result<Ticket, Error> {
        let ticket = self
            .tickets
            .find_by_id(ticket_id)
            .await
            .map_err(map_ticket_error)?
            .ok_or_else(|| Error::not_found("ticket not found"))?;
        actor.ensure_member_of(&ticket.company_id)?;
        Ok(ticket)
    }

    async fn ensure_assignable(
        &self,
        company_id: &CompanyId,
        assignee: &UserId,
    ) -> Result<(), Error> {
        let member = self
            .users
            .find_by_id(assignee)
            .await
            .map_err(map_user_error)?
            .is_some_and(|user| user.company_id.as_ref() == Some(company_id));
        if member {
            Ok(())
        } else {
            Err(
                Error::invalid_request("assignee must be a member of the ticket's company")
                    .with_details(json!({
                        "field": "assignedToId",
                        "code": "not_a_member",
                        "value": assignee.to_string(),
                    })),
            )
        }
    }

    async fn view(&self, ticket_id: &TicketId) -> Result<TicketView, Error> {
        self.tickets
            .find_view(ticket_id)
            .await
            .map_err(map_ticket_error)?
            .ok_or_else(|| Error::internal("ticket disappeared after write"))
    }
}

#[async_trait]
impl<U, C, T, M> TicketsQuery for TicketsService<U, C, T, M>
where
    U: UserRepository,
    C: CompanyRepository,
    T: TicketRepository,
    M: CommentRepository,
{
    async fn list_tickets(
        &self,
        authenticated_user: &UserId,
        filter: TicketFilter,
    ) -> Result<Vec<TicketView>, Error> {
        let actor = resolve_actor(self.users.as_ref(), authenticated_user).await?;
        let Some(company_id) = actor.company_id else {
            return Ok(Vec::new());
        };
        let involving = filter.mine.then_some(actor.user_id);
        self.tickets
            .list_views(&company_id, involving)
            .await
            .map_err(map_ticket_error)
    }

    async fn ticket_stats(&self, authenticated_user: &UserId) -> Result<TicketStats, Error> {
        let actor = resolve_actor(self.users.as_ref(), authenticated_user).await?;
        let Some(company_id) = actor.company_id else {
            return Ok(TicketStats::default());
        };
        self.tickets
            .stats(&company_id)
            .await
            .map_err(map_ticket_error)
    }

    async fn find_ticket(
        &self,
        authenticated_user: &UserId,
        ticket_id: &TicketId,
    ) -> Result<TicketDetail, Error> {
        let actor = resolve_actor(self.users.as_ref(), authenticated_user).await?;
        let ticket = self.load_scoped(&actor, ticket_id).await?;
        let view = self.view(&ticket.id).await?;
        let company = self
            .companies
            .find_by_id(&ticket.company_id)
            .await
            .map_err(map_company_error)?
            .ok_or_else(|| Error::internal("ticket references a missing company"))?;
        let comments = self
            .comments
            .list_for_ticket(&ticket.id)
            .await
            .map_err(map_comment_error)?;

        Ok(TicketDetail {
            ticket: view.ticket,
            created_by: view.created_by,
            assigned_to: view.assigned_to,
            company: company.summary(),
            comments,
        })
    }
}

#[async_trait]
impl<U, C, T, M> TicketsCommand for TicketsService<U, C, T, M>
where
    U: UserRepository,
    C: CompanyRepository,
    T: TicketRepository,
    M: CommentRepository,
{
    async fn create_ticket(
        &self,
        authenticated_user: &UserId,
        ticket: NewTicket,
    ) -> Result<TicketView, Error> {
        let actor = resolve_actor(self.users.as_ref(), authenticated_user).await?;
        let company_id = actor.require_company()?;
        if let Some(assignee) = ticket.assigned_to.as_ref() {
            self.ensure_assignable(&company_id, assignee).await?;
        }

        let now = self.clock.utc();
        let record = Ticket {
            id: TicketId::random(),
            title: ticket.title,
            description: ticket.description,
            status: TicketStatus::Open,
            priority: ticket.priority,
            category: ticket.category,
            created_by: actor.user_id,
            assigned_to: ticket.assigned_to,
            company_id,
            created_at: now,
            updated_at: now,
        };
        self.tickets
            .insert(&record)
            .await
            .map_err(map_ticket_error)?;
        info!(ticket_id = %record.id, company_id = %company_id, "ticket created");
        self.view(&record.id).await
    }

    async fn update_ticket(
        &self,
        authenticated_user: &UserId,
        ticket_id: &TicketId,
        changes: TicketChanges,
    ) -> Result<TicketView, Error> {
        let actor = resolve_actor(self.users.as_ref(), authenticated_user).await?;
        let ticket = self.load_scoped(&actor, ticket_id).await?;
        if let Some(Some(assignee)) = changes.assigned_to.as_ref() {
            self.ensure_assignable(&ticket.company_id, assignee).await?;
        }

        let updated = changes.apply(ticket, self.clock.utc());
        self.tickets
            .update(&updated)
            .await
            .map_err(map_ticket_error)?;
        self.view(&updated.id).await
    }

    async fn delete_ticket(
        &self,
        authenticated_user: &UserId,
        ticket_id: &TicketId,
    ) -> Result<(), Error> {
        let actor = resolve_actor(self.users.as_ref(), authenticated_user).await?;
        let ticket = self.load_scoped(&actor, ticket_id).await?;
        self.tickets
            .delete(&ticket.id)
            .await
            .map_err(map_ticket_error)?;
        info!(ticket_id = %ticket.id, "ticket deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tickets_service_tests.rs"]
mod tests;
