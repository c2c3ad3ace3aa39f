//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows and domain aggregates and hold
//! no business rules. Row structs (`models`) and table definitions
//! (`schema`) stay private to this module. Unique-constraint violations are
//! mapped by constraint name into the port errors the services match on.
//!
//! # Examples
//!
//! ```no_run
//! use ticketclass::outbound::persistence::{DbPool, DieselTicketRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/ticketclass")).await?;
//! let tickets = DieselTicketRepository::new(pool);
//! # let _ = tickets;
//! # Ok(())
//! # }
//! ```

mod diesel_comment_repository;
mod diesel_company_repository;
mod diesel_ticket_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;
mod views;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_company_repository::DieselCompanyRepository;
pub use diesel_ticket_repository::DieselTicketRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DEFAULT_CONNECTION_TIMEOUT, DEFAULT_MAX_SIZE, DbPool, PoolConfig, PoolError};
