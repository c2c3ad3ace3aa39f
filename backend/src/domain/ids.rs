//! UUID-backed identifiers for the domain aggregates.
//!
//! Each identifier is a distinct newtype so a `TicketId` can never be passed
//! where a `CompanyId` is expected.

use thiserror::Error;

/// Validation errors raised when parsing an identifier from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdValidationError {
    #[error("identifier must not be empty")]
    Empty,
    #[error("identifier must be a valid UUID")]
    Invalid,
}

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Validate and construct the identifier from its textual form.
            pub fn new(id: impl AsRef<str>) -> Result<Self, IdValidationError> {
                let raw = id.as_ref();
                if raw.is_empty() {
                    return Err(IdValidationError::Empty);
                }
                if raw.trim() != raw {
                    return Err(IdValidationError::Invalid);
                }
                ::uuid::Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| IdValidationError::Invalid)
            }

            /// Wrap an existing UUID, typically read back from storage.
            #[must_use]
            pub const fn from_uuid(id: ::uuid::Uuid) -> Self {
                Self(id)
            }

            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = IdValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0.to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

uuid_identifier! {
    /// Stable user identifier.
    UserId
}

uuid_identifier! {
    /// Stable company (tenant) identifier.
    CompanyId
}

uuid_identifier! {
    /// Stable ticket identifier.
    TicketId
}

uuid_identifier! {
    /// Stable comment identifier.
    CommentId
}
