//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hashing, invite codes) are implemented by
//! outbound adapters. Driving ports (`*Query` / `*Command`) are implemented
//! by the domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_command;
mod comment_repository;
mod comments_query;
mod companies_query;
mod company_repository;
mod credential_hasher;
mod invite_code_source;
mod ticket_repository;
mod tickets_query;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use auth_command::MockAuthCommand;
pub use auth_command::AuthCommand;
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentPersistenceError, CommentRepository};
#[cfg(test)]
pub use comments_query::{MockCommentsCommand, MockCommentsQuery};
pub use comments_query::{CommentsCommand, CommentsQuery};
#[cfg(test)]
pub use companies_query::{MockCompaniesCommand, MockCompaniesQuery};
pub use companies_query::{CompaniesCommand, CompaniesQuery};
#[cfg(test)]
pub use company_repository::MockCompanyRepository;
pub use company_repository::{CompanyPersistenceError, CompanyRepository};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use invite_code_source::MockInviteCodeSource;
pub use invite_code_source::InviteCodeSource;
#[cfg(test)]
pub use ticket_repository::MockTicketRepository;
pub use ticket_repository::{TicketPersistenceError, TicketRepository};
#[cfg(test)]
pub use tickets_query::{MockTicketsCommand, MockTicketsQuery};
pub use tickets_query::{TicketsCommand, TicketsQuery};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::{MockUserProfileCommand, MockUsersQuery};
pub use users_query::{UserProfileCommand, UsersQuery};
