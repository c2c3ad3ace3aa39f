//! Domain primitives, aggregates and use-case services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, plus the services implementing the driving ports.
//! Keep types immutable and document invariants in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Company, Ticket, Comment: aggregates and their validated fields.
//! - Actor: authenticated user plus tenancy facts (see [`tenancy`]).
//! - `*Service`: implementations of the driving ports in [`ports`].

pub mod auth;
pub mod auth_service;
pub mod comment;
pub mod comments_service;
pub mod companies_service;
pub mod company;
pub mod error;
pub mod ids;
mod port_errors;
pub mod ports;
#[cfg(test)]
mod service_test_helpers;
pub mod tenancy;
pub mod ticket;
pub mod tickets_service;
pub mod trace_id;
pub mod user;
pub mod users_service;

pub use self::auth::{
    CompanyRegistration, CredentialValidationError, LoginCredentials, PASSWORD_MIN, Password,
    PasswordHash, Registration,
};
pub use self::auth_service::{AuthService, INVALID_CREDENTIALS};
pub use self::comment::{
    COMMENT_MAX, Comment, CommentContent, CommentValidationError, CommentView, NewComment,
};
pub use self::comments_service::CommentsService;
pub use self::companies_service::{CompaniesService, INVITE_CODE_ATTEMPTS};
pub use self::company::{
    COMPANY_NAME_MAX, Company, CompanyDetail, CompanyMember, CompanyName, CompanyStats,
    CompanySummary, CompanyValidationError, INVITE_CODE_ALPHABET, INVITE_CODE_LEN, InviteCode,
    PENDING_FIELD,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{CommentId, CompanyId, IdValidationError, TicketId, UserId};
pub use self::tenancy::{Actor, NO_COMPANY};
pub use self::ticket::{
    DESCRIPTION_MIN, NewTicket, TITLE_MAX, TITLE_MIN, Ticket, TicketChanges, TicketDescription,
    TicketDetail, TicketFilter, TicketPriority, TicketStats, TicketStatus, TicketTitle,
    TicketValidationError, TicketView,
};
pub use self::tickets_service::TicketsService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EMAIL_MAX, EmailAddress, PERSON_NAME_MAX, PERSON_NAME_MIN, PersonName, ProfileChanges, Role,
    User, UserProfile, UserSummary, UserValidationError,
};
pub use self::users_service::UsersService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use ticketclass::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
