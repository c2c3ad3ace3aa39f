//! Port for ticket persistence.

use async_trait::async_trait;

use crate::domain::{CompanyId, Ticket, TicketId, TicketStats, TicketView, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ticket repository adapters.
    pub enum TicketPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "ticket repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ticket repository query failed: {message}",
    }
}

/// Ticket storage.
///
/// Listing methods return [`TicketView`]s so adapters can join creator,
/// assignee and comment counts in one round trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn insert(&self, ticket: &Ticket) -> Result<(), TicketPersistenceError>;

    async fn update(&self, ticket: &Ticket) -> Result<(), TicketPersistenceError>;

    /// Delete a ticket and, by cascade, its comments.
    async fn delete(&self, id: &TicketId) -> Result<(), TicketPersistenceError>;

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, TicketPersistenceError>;

    async fn find_view(&self, id: &TicketId) -> Result<Option<TicketView>, TicketPersistenceError>;

    /// Company tickets, newest first. When `involving` is set only tickets
    /// created by or assigned to that user are returned.
    async fn list_views(
        &self,
        company_id: &CompanyId,
        involving: Option<UserId>,
    ) -> Result<Vec<TicketView>, TicketPersistenceError>;

    async fn stats(&self, company_id: &CompanyId) -> Result<TicketStats, TicketPersistenceError>;
}
