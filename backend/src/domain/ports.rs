//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters.
//! Each trait exposes strongly typed errors so adapters map their failures
//! into predictable variants instead of returning `anyhow::Result`.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::congregation::Congregation;
use super::territory::Territory;
use super::user::User;
use super::{Error as DomainError, ErrorCode};

/// Persistence errors raised by [`TerritoryRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TerritoryPersistenceError {
    /// Repository connection could not be established.
    #[error("territory repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("territory repository query failed: {message}")]
    Query { message: String },
    /// The unique `(congregation_id, number)` index rejected a write.
    ///
    /// This is the constraint-level resolution of the auto-numbering race:
    /// two concurrent creations may pick the same `max + 1`, and exactly one
    /// survives; the loser surfaces here for the client to retry.
    #[error("territory number {number} is already taken in congregation {congregation_id}")]
    DuplicateNumber {
        congregation_id: Uuid,
        number: i32,
    },
}

impl TerritoryPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

impl From<TerritoryPersistenceError> for DomainError {
    fn from(error: TerritoryPersistenceError) -> Self {
        match error {
            TerritoryPersistenceError::Connection { message } => {
                DomainError::service_unavailable(message)
            }
            TerritoryPersistenceError::Query { message } => DomainError::internal(message),
            TerritoryPersistenceError::DuplicateNumber { .. } => {
                DomainError::new(ErrorCode::Conflict, error.to_string())
            }
        }
    }
}

/// Persistence errors raised by [`CongregationRepository`] and
/// [`UserRepository`] adapters, which have plain query semantics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// Repository connection could not be established.
    #[error("repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("repository query failed: {message}")]
    Query { message: String },
}

impl PersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

impl From<PersistenceError> for DomainError {
    fn from(error: PersistenceError) -> Self {
        match error {
            PersistenceError::Connection { message } => DomainError::service_unavailable(message),
            PersistenceError::Query { message } => DomainError::internal(message),
        }
    }
}

/// Persistence port for territory aggregates.
#[async_trait]
pub trait TerritoryRepository: Send + Sync {
    /// All territories, optionally scoped to one congregation.
    async fn list(
        &self,
        congregation_id: Option<Uuid>,
    ) -> Result<Vec<Territory>, TerritoryPersistenceError>;

    /// Fetch a territory by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Territory>, TerritoryPersistenceError>;

    /// Highest assigned number within a congregation, `None` when no
    /// numbered territory exists yet.
    async fn max_number(
        &self,
        congregation_id: Uuid,
    ) -> Result<Option<i32>, TerritoryPersistenceError>;

    /// Whether a number is already taken within a congregation, optionally
    /// ignoring one territory (the one being updated).
    ///
    /// This is the pre-persistence uniqueness check; it does not replace the
    /// unique index, which still arbitrates concurrent writers.
    async fn number_taken(
        &self,
        congregation_id: Uuid,
        number: i32,
        exclude: Option<Uuid>,
    ) -> Result<bool, TerritoryPersistenceError>;

    /// Insert a new territory. Surfaces
    /// [`TerritoryPersistenceError::DuplicateNumber`] when the unique index
    /// rejects the chosen number.
    async fn insert(&self, territory: &Territory) -> Result<(), TerritoryPersistenceError>;

    /// Persist the full state of an existing territory. Returns `false` when
    /// the row no longer exists.
    async fn update(&self, territory: &Territory) -> Result<bool, TerritoryPersistenceError>;

    /// Delete a territory. Returns `false` when the row did not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, TerritoryPersistenceError>;

    /// Delete every territory of a congregation; the explicit cascade step
    /// of congregation deletion. Returns the number of rows removed.
    async fn delete_by_congregation(
        &self,
        congregation_id: Uuid,
    ) -> Result<u64, TerritoryPersistenceError>;
}

/// Persistence port for congregation aggregates.
#[async_trait]
pub trait CongregationRepository: Send + Sync {
    /// All congregations.
    async fn list(&self) -> Result<Vec<Congregation>, PersistenceError>;

    /// Fetch a congregation by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Congregation>, PersistenceError>;

    /// Insert a new congregation.
    async fn insert(&self, congregation: &Congregation) -> Result<(), PersistenceError>;

    /// Persist the full state of an existing congregation. Returns `false`
    /// when the row no longer exists.
    async fn update(&self, congregation: &Congregation) -> Result<bool, PersistenceError>;

    /// Delete a congregation. Returns `false` when the row did not exist.
    /// Territories are removed separately via
    /// [`TerritoryRepository::delete_by_congregation`].
    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError>;
}

/// Read-only persistence port for users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, PersistenceError>;

    /// Users eligible for the assignment picker.
    async fn list_active(&self) -> Result<Vec<User>, PersistenceError>;
}
