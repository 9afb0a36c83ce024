//! Persistence adapters.
//!
//! PostgreSQL/PostGIS adapters via Diesel with async support through
//! `diesel-async` and `bb8` pooling, plus in-memory adapters used when no
//! database is configured and by tests.
//!
//! Principles:
//! - **Thin adapters**: implementations only translate between rows and
//!   domain types; no business logic lives here.
//! - **Internal models**: row structs and schema definitions never leak to
//!   the domain layer.
//! - **Strongly typed errors**: database failures map to the persistence
//!   error types on the ports.

mod diesel_congregation_repository;
mod diesel_error;
mod diesel_territory_repository;
mod diesel_user_repository;
mod memory;
mod migrations;
mod models;
mod pool;
mod schema;
mod spatial;

pub use diesel_congregation_repository::DieselCongregationRepository;
pub use diesel_territory_repository::DieselTerritoryRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use memory::{
    InMemoryCongregationRepository, InMemoryTerritoryRepository, InMemoryUserRepository,
};
pub use migrations::run_pending_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
