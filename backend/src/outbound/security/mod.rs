//! Credential hashing and invite-code generation adapters.

mod argon2_hasher;
mod random_invite_codes;

pub use argon2_hasher::Argon2CredentialHasher;
pub use random_invite_codes::RandomInviteCodes;
