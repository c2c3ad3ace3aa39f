//! Invite codes drawn from the thread-local CSPRNG.

use crate::domain::InviteCode;
use crate::domain::ports::InviteCodeSource;

/// `InviteCodeSource` backed by `rand::thread_rng`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomInviteCodes;

impl InviteCodeSource for RandomInviteCodes {
    fn next_code(&self) -> InviteCode {
        InviteCode::generate(&mut rand::thread_rng())
    }
}
