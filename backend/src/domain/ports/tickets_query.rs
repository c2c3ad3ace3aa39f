//! Driving ports for tickets.

use async_trait::async_trait;

use crate::domain::{
    Error, NewTicket, TicketChanges, TicketDetail, TicketFilter, TicketId, TicketStats,
    TicketView, UserId,
};

/// Read side of ticket management, scoped to the caller's company.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketsQuery: Send + Sync {
    async fn list_tickets(
        &self,
        authenticated_user: &UserId,
        filter: TicketFilter,
    ) -> Result<Vec<TicketView>, Error>;

    async fn ticket_stats(&self, authenticated_user: &UserId) -> Result<TicketStats, Error>;

    async fn find_ticket(
        &self,
        authenticated_user: &UserId,
        ticket_id: &TicketId,
    ) -> Result<TicketDetail, Error>;
}

/// Write side of ticket management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketsCommand: Send + Sync {
    async fn create_ticket(
        &self,
        authenticated_user: &UserId,
        ticket: NewTicket,
    ) -> Result<TicketView, Error>;

    async fn update_ticket(
        &self,
        authenticated_user: &UserId,
        ticket_id: &TicketId,
        changes: TicketChanges,
    ) -> Result<TicketView, Error>;

    async fn delete_ticket(
        &self,
        authenticated_user: &UserId,
        ticket_id: &TicketId,
    ) -> Result<(), Error>;
}
