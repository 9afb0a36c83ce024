//! Diesel-backed read-only [`UserRepository`] adapter.
//!
//! Users are written by the authentication collaborator; this adapter only
//! reads them as assignment targets.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{PersistenceError, UserRepository};
use crate::domain::User;

use super::diesel_error::{map_diesel_error, map_pool_error};
use super::models::UserRow;
use super::schema::users::dsl as u;
use super::DbPool;

/// Diesel-backed user repository.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn conn(
        &self,
    ) -> Result<
        diesel_async::pooled_connection::bb8::PooledConnection<'_, diesel_async::AsyncPgConnection>,
        PersistenceError,
    > {
        self.pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, PersistenceError::connection))
    }
}

fn map_error(error: diesel::result::Error) -> PersistenceError {
    map_diesel_error(
        error,
        |m| PersistenceError::query(m),
        |m| PersistenceError::connection(m),
    )
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, PersistenceError> {
        let mut conn = self.conn().await?;
        let row: Option<UserRow> = u::users
            .find(id)
            .select((u::id, u::name, u::email, u::role, u::active, u::congregation_id))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(|row| User::try_from(row).map_err(PersistenceError::query))
            .transpose()
    }

    async fn list_active(&self) -> Result<Vec<User>, PersistenceError> {
        let mut conn = self.conn().await?;
        let rows: Vec<UserRow> = u::users
            .filter(u::active.eq(true))
            .select((u::id, u::name, u::email, u::role, u::active, u::congregation_id))
            .order(u::name.asc())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows.into_iter()
            .map(|row| User::try_from(row).map_err(PersistenceError::query))
            .collect()
    }
}
