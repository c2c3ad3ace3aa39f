//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AuthCommand, CommentRepository, CommentsCommand, CommentsQuery, CompaniesCommand,
    CompaniesQuery, CompanyRepository, CredentialHasher, InviteCodeSource, TicketRepository,
    TicketsCommand, TicketsQuery, UserProfileCommand, UserRepository, UsersQuery,
};
use crate::domain::{AuthService, CommentsService, CompaniesService, TicketsService, UsersService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub profile: Arc<dyn UserProfileCommand>,
    pub companies: Arc<dyn CompaniesQuery>,
    pub companies_command: Arc<dyn CompaniesCommand>,
    pub tickets: Arc<dyn TicketsQuery>,
    pub tickets_command: Arc<dyn TicketsCommand>,
    pub comments: Arc<dyn CommentsQuery>,
    pub comments_command: Arc<dyn CommentsCommand>,
}

/// Driven adapters the domain services are assembled from.
pub struct HttpStateAdapters<U, C, T, M, H> {
    pub users: Arc<U>,
    pub companies: Arc<C>,
    pub tickets: Arc<T>,
    pub comments: Arc<M>,
    pub hasher: Arc<H>,
    pub invite_codes: Arc<dyn InviteCodeSource>,
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Wire every domain service over the given adapters.
    ///
    /// Both the PostgreSQL server and the in-memory test harness build
    /// their state through this function so the handler graph is identical.
    pub fn from_adapters<U, C, T, M, H>(adapters: HttpStateAdapters<U, C, T, M, H>) -> Self
    where
        U: UserRepository + 'static,
        C: CompanyRepository + 'static,
        T: TicketRepository + 'static,
        M: CommentRepository + 'static,
        H: CredentialHasher + 'static,
    {
        let HttpStateAdapters {
            users,
            companies,
            tickets,
            comments,
            hasher,
            invite_codes,
            clock,
        } = adapters;

        let auth = Arc::new(AuthService::new(
            users.clone(),
            companies.clone(),
            hasher,
            invite_codes.clone(),
            clock.clone(),
        ));
        let users_service = Arc::new(UsersService::new(
            users.clone(),
            companies.clone(),
            clock.clone(),
        ));
        let companies_service = Arc::new(CompaniesService::new(
            users.clone(),
            companies.clone(),
            invite_codes,
            clock.clone(),
        ));
        let tickets_service = Arc::new(TicketsService::new(
            users.clone(),
            companies,
            tickets.clone(),
            comments.clone(),
            clock.clone(),
        ));
        let comments_service = Arc::new(CommentsService::new(users, tickets, comments, clock));

        Self {
            auth,
            users: users_service.clone(),
            profile: users_service,
            companies: companies_service.clone(),
            companies_command: companies_service,
            tickets: tickets_service.clone(),
            tickets_command: tickets_service,
            comments: comments_service.clone(),
            comments_command: comments_service,
        }
    }
}
