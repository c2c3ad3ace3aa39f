//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejected field produces an `invalid_request` error whose details
//! carry `{field, code[, value]}` so clients can highlight the offending
//! input.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use serde_json::json;

use crate::domain::{
    CommentValidationError, CompanyValidationError, CredentialValidationError, Error,
    TicketValidationError, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidEmail,
    Blank,
    TooShort,
    TooLong,
    InvalidValue,
    InvalidInviteCode,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::Blank => "blank",
            ErrorCode::TooShort => "too_short",
            ErrorCode::TooLong => "too_long",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::InvalidInviteCode => "invalid_invite_code",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: impl Display) -> Error {
    Error::invalid_request(message.to_string()).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn field_value_error(
    field: FieldName,
    code: ErrorCode,
    message: impl Display,
    value: &str,
) -> Error {
    Error::invalid_request(message.to_string()).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {name}"),
    )
}

/// Unwrap a required body field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Parse a UUID-backed identifier from a path segment or body field.
pub(crate) fn parse_id<T: FromStr>(value: &str, field: FieldName) -> Result<T, Error> {
    let name = field.as_str();
    value.parse().map_err(|_| {
        field_value_error(
            field,
            ErrorCode::InvalidUuid,
            format!("{name} must be a valid UUID"),
            value,
        )
    })
}

/// Trim optional free text, treating blank input as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Deserialise a field so that an explicit `null` becomes `Some(None)` while
/// an absent field stays `None` (via `#[serde(default)]`).
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn user_field_error(field: FieldName, err: UserValidationError, value: &str) -> Error {
    let code = match err {
        UserValidationError::EmptyEmail | UserValidationError::EmptyName => ErrorCode::Blank,
        UserValidationError::InvalidEmail => ErrorCode::InvalidEmail,
        UserValidationError::NameTooShort { .. } => ErrorCode::TooShort,
        UserValidationError::EmailTooLong { .. } | UserValidationError::NameTooLong { .. } => {
            ErrorCode::TooLong
        }
        UserValidationError::UnknownRole => {
            return field_value_error(field, ErrorCode::InvalidValue, err, value);
        }
    };
    field_error(field, code, err)
}

pub(crate) fn credential_field_error(err: CredentialValidationError) -> Error {
    match err {
        CredentialValidationError::EmptyEmail => {
            field_error(FieldName::new("email"), ErrorCode::Blank, err)
        }
        CredentialValidationError::EmptyPassword => {
            field_error(FieldName::new("password"), ErrorCode::Blank, err)
        }
        CredentialValidationError::PasswordTooShort { .. } => {
            field_error(FieldName::new("password"), ErrorCode::TooShort, err)
        }
    }
}

pub(crate) fn company_field_error(
    field: FieldName,
    err: CompanyValidationError,
    value: &str,
) -> Error {
    match err {
        CompanyValidationError::EmptyName => field_error(field, ErrorCode::Blank, err),
        CompanyValidationError::NameTooLong { .. } => field_error(field, ErrorCode::TooLong, err),
        CompanyValidationError::MalformedInviteCode { .. } => {
            field_value_error(field, ErrorCode::InvalidInviteCode, err, value)
        }
    }
}

pub(crate) fn ticket_field_error(
    field: FieldName,
    err: TicketValidationError,
    value: &str,
) -> Error {
    match err {
        TicketValidationError::TitleTooShort { .. }
        | TicketValidationError::DescriptionTooShort { .. } => {
            field_error(field, ErrorCode::TooShort, err)
        }
        TicketValidationError::TitleTooLong { .. } => field_error(field, ErrorCode::TooLong, err),
        TicketValidationError::UnknownStatus | TicketValidationError::UnknownPriority => {
            field_value_error(field, ErrorCode::InvalidValue, err, value)
        }
    }
}

pub(crate) fn comment_field_error(field: FieldName, err: CommentValidationError) -> Error {
    let code = match err {
        CommentValidationError::Empty => ErrorCode::Blank,
        CommentValidationError::TooLong { .. } => ErrorCode::TooLong,
    };
    field_error(field, code, err)
}
