//! Test utilities for the backend crate.
//!
//! This module provides in-memory implementations of every driven port so
//! unit tests (in `src/`) and integration tests (in `tests/`) can exercise
//! the domain services and HTTP handlers without PostgreSQL. It is compiled
//! for tests and when the `test-support` feature is enabled.

mod doubles;
mod memory_store;

pub use doubles::{MutableClock, PlaintextHasher, SequentialInviteCodes};
pub use memory_store::InMemoryStore;
