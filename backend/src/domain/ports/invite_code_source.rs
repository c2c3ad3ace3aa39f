//! Port supplying candidate invite codes.

use crate::domain::InviteCode;

/// Source of fresh invite codes. Uniqueness is enforced by storage; callers
/// draw a new candidate when a collision is reported.
#[cfg_attr(test, mockall::automock)]
pub trait InviteCodeSource: Send + Sync {
    fn next_code(&self) -> InviteCode;
}
