//! Company (tenant) data model and invite codes.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{CompanyId, EmailAddress, Role, User, UserId, UserSummary};

/// Validation errors returned by company value constructors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompanyValidationError {
    #[error("company name must not be empty")]
    EmptyName,
    #[error("company name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("invite code must be exactly {len} characters of A-Z or 0-9")]
    MalformedInviteCode { len: usize },
}

/// Maximum length of a company name.
pub const COMPANY_NAME_MAX: usize = 120;
/// Number of characters in an invite code.
pub const INVITE_CODE_LEN: usize = 6;
/// Alphabet invite codes are drawn from.
pub const INVITE_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
/// Placeholder stored for company fields the registering admin left blank.
pub const PENDING_FIELD: &str = "PENDING";

/// Trimmed, non-empty company name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompanyName(String);

impl CompanyName {
    pub fn new(name: impl AsRef<str>) -> Result<Self, CompanyValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CompanyValidationError::EmptyName);
        }
        if trimmed.chars().count() > COMPANY_NAME_MAX {
            return Err(CompanyValidationError::NameTooLong {
                max: COMPANY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CompanyName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CompanyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CompanyName> for String {
    fn from(value: CompanyName) -> Self {
        value.0
    }
}

impl TryFrom<String> for CompanyName {
    type Error = CompanyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Six-character code a company shares so users can join it.
///
/// Input is trimmed and upper-cased before validation, so lookups are
/// case-insensitive.
///
/// # Examples
/// ```
/// use ticketclass::domain::InviteCode;
///
/// let code = InviteCode::new(" ab12cd ").expect("valid code");
/// assert_eq!(code.as_ref(), "AB12CD");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InviteCode(String);

impl InviteCode {
    pub fn new(code: impl AsRef<str>) -> Result<Self, CompanyValidationError> {
        let normalised = code.as_ref().trim().to_ascii_uppercase();
        let well_formed = normalised.len() == INVITE_CODE_LEN
            && normalised.bytes().all(|b| INVITE_CODE_ALPHABET.contains(&b));
        if !well_formed {
            return Err(CompanyValidationError::MalformedInviteCode {
                len: INVITE_CODE_LEN,
            });
        }
        Ok(Self(normalised))
    }

    /// Draw a fresh code uniformly from [`INVITE_CODE_ALPHABET`].
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..INVITE_CODE_LEN)
            .filter_map(|_| INVITE_CODE_ALPHABET.choose(&mut *rng).copied())
            .map(char::from)
            .collect();
        Self(code)
    }
}

impl AsRef<str> for InviteCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for InviteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<InviteCode> for String {
    fn from(value: InviteCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for InviteCode {
    type Error = CompanyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Company record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub id: CompanyId,
    pub name: CompanyName,
    pub tax_id: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<EmailAddress>,
    pub invite_code: InviteCode,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    pub fn summary(&self) -> CompanySummary {
        CompanySummary {
            id: self.id,
            name: self.name.clone(),
        }
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

/// `{id, name}` projection returned by invite-code verification and embedded
/// in ticket details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanySummary {
    pub id: CompanyId,
    pub name: CompanyName,
}

/// Member entry on the company page; the role lets admins pick technicians.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyMember {
    pub user: UserSummary,
    pub role: Role,
}

impl From<&User> for CompanyMember {
    fn from(user: &User) -> Self {
        Self {
            user: user.summary(),
            role: user.role,
        }
    }
}

/// Company with its owner, members and aggregate counts.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyDetail {
    pub company: Company,
    pub owner: UserSummary,
    pub members: Vec<CompanyMember>,
    pub member_count: u64,
    pub ticket_count: u64,
}

/// Per-company dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompanyStats {
    pub total_tickets: u64,
    pub open_tickets: u64,
    pub in_progress_tickets: u64,
    /// Resolved and closed tickets together.
    pub resolved_tickets: u64,
    pub total_members: u64,
}
