//! Translation of driven-port failures into domain [`Error`]s.
//!
//! Connection failures surface as `service_unavailable`, query failures as
//! `internal_error` and unique-constraint violations as `conflict`.

use crate::domain::Error;
use crate::domain::ports::{
    CommentPersistenceError, CompanyPersistenceError, CredentialHasherError,
    TicketPersistenceError, UserPersistenceError,
};

pub(crate) const EMAIL_TAKEN: &str = "email address is already registered";

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail => Error::conflict(EMAIL_TAKEN),
    }
}

pub(crate) fn map_company_error(error: CompanyPersistenceError) -> Error {
    match error {
        CompanyPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("company repository unavailable: {message}"))
        }
        CompanyPersistenceError::Query { message } => {
            Error::internal(format!("company repository error: {message}"))
        }
        CompanyPersistenceError::DuplicateInviteCode => {
            Error::conflict("could not allocate a unique invite code")
        }
        CompanyPersistenceError::DuplicateEmail => Error::conflict(EMAIL_TAKEN),
    }
}

pub(crate) fn map_ticket_error(error: TicketPersistenceError) -> Error {
    match error {
        TicketPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("ticket repository unavailable: {message}"))
        }
        TicketPersistenceError::Query { message } => {
            Error::internal(format!("ticket repository error: {message}"))
        }
    }
}

pub(crate) fn map_comment_error(error: CommentPersistenceError) -> Error {
    match error {
        CommentPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("comment repository unavailable: {message}"))
        }
        CommentPersistenceError::Query { message } => {
            Error::internal(format!("comment repository error: {message}"))
        }
    }
}

pub(crate) fn map_hasher_error(error: CredentialHasherError) -> Error {
    match error {
        CredentialHasherError::Hashing { message } => {
            Error::internal(format!("credential hasher error: {message}"))
        }
    }
}
