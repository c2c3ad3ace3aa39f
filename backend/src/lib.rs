//! TicketClass: a multi-tenant helpdesk backend.
//!
//! Companies register with an owner, share invite codes with employees and
//! technicians, and track support tickets and comments scoped to the
//! company. The crate is laid out as a hexagon: [`domain`] holds value types,
//! ports and services; [`inbound`] adapts HTTP; [`outbound`] implements the
//! driven ports over PostgreSQL and Argon2.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
