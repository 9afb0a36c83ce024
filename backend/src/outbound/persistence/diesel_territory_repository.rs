//! Diesel-backed [`TerritoryRepository`] adapter.
//!
//! Geometry flows through `ST_GeomFromText`/`ST_AsText` so the adapter only
//! ever handles WKT strings. The unique `(congregation_id, number)` index is
//! the arbiter of the auto-numbering race: a unique violation on insert or
//! update maps to [`TerritoryPersistenceError::DuplicateNumber`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::geometry::SRID;
use crate::domain::ports::{TerritoryPersistenceError, TerritoryRepository};
use crate::domain::Territory;

use super::diesel_error::{map_diesel_error, map_pool_error};
use super::models::TerritoryRow;
use super::schema::territories::dsl as t;
use super::spatial::{st_astext, st_geomfromtext};
use super::DbPool;

/// Diesel-backed territory repository.
#[derive(Clone)]
pub struct DieselTerritoryRepository {
    pool: DbPool,
}

impl DieselTerritoryRepository {
    /// Create a repository backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn conn(
        &self,
    ) -> Result<
        diesel_async::pooled_connection::bb8::PooledConnection<'_, diesel_async::AsyncPgConnection>,
        TerritoryPersistenceError,
    > {
        self.pool.get().await.map_err(|e| {
            map_pool_error(e, |message| TerritoryPersistenceError::Connection { message })
        })
    }
}

fn map_error(error: DieselError) -> TerritoryPersistenceError {
    map_diesel_error(
        error,
        |m| TerritoryPersistenceError::query(m),
        |m| TerritoryPersistenceError::connection(m),
    )
}

/// Detect the unique `(congregation_id, number)` rejection.
fn map_write_error(error: DieselError, territory: &Territory) -> TerritoryPersistenceError {
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
        return TerritoryPersistenceError::DuplicateNumber {
            congregation_id: territory.congregation_id,
            number: territory.number.unwrap_or_default(),
        };
    }
    map_error(error)
}

fn map_row(row: TerritoryRow) -> Result<Territory, TerritoryPersistenceError> {
    Territory::try_from(row).map_err(TerritoryPersistenceError::query)
}

#[async_trait]
impl TerritoryRepository for DieselTerritoryRepository {
    async fn list(
        &self,
        congregation_id: Option<Uuid>,
    ) -> Result<Vec<Territory>, TerritoryPersistenceError> {
        let mut conn = self.conn().await?;
        let mut query = t::territories
            .select((
                t::id,
                t::congregation_id,
                t::name,
                t::description,
                t::notes,
                t::status,
                t::number,
                st_astext(t::boundaries),
                st_astext(t::center),
                t::assigned_to_id,
                t::assigned_at,
                t::returned_at,
                t::created_at,
                t::updated_at,
            ))
            .order((t::number.asc(), t::name.asc()))
            .into_boxed();
        if let Some(id) = congregation_id {
            query = query.filter(t::congregation_id.eq(id));
        }
        let rows: Vec<TerritoryRow> = query.load(&mut conn).await.map_err(map_error)?;
        rows.into_iter().map(map_row).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Territory>, TerritoryPersistenceError> {
        let mut conn = self.conn().await?;
        let row: Option<TerritoryRow> = t::territories
            .find(id)
            .select((
                t::id,
                t::congregation_id,
                t::name,
                t::description,
                t::notes,
                t::status,
                t::number,
                st_astext(t::boundaries),
                st_astext(t::center),
                t::assigned_to_id,
                t::assigned_at,
                t::returned_at,
                t::created_at,
                t::updated_at,
            ))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(map_row).transpose()
    }

    async fn max_number(
        &self,
        congregation_id: Uuid,
    ) -> Result<Option<i32>, TerritoryPersistenceError> {
        let mut conn = self.conn().await?;
        t::territories
            .filter(t::congregation_id.eq(congregation_id))
            .select(diesel::dsl::max(t::number))
            .first(&mut conn)
            .await
            .map_err(map_error)
    }

    async fn number_taken(
        &self,
        congregation_id: Uuid,
        number: i32,
        exclude: Option<Uuid>,
    ) -> Result<bool, TerritoryPersistenceError> {
        let mut conn = self.conn().await?;
        let mut query = t::territories
            .filter(t::congregation_id.eq(congregation_id))
            .filter(t::number.eq(number))
            .select(t::id)
            .into_boxed();
        if let Some(id) = exclude {
            query = query.filter(t::id.ne(id));
        }
        let found: Option<Uuid> = query
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        Ok(found.is_some())
    }

    async fn insert(&self, territory: &Territory) -> Result<(), TerritoryPersistenceError> {
        let mut conn = self.conn().await?;
        diesel::insert_into(t::territories)
            .values((
                t::id.eq(territory.id),
                t::congregation_id.eq(territory.congregation_id),
                t::name.eq(&territory.name),
                t::description.eq(&territory.description),
                t::notes.eq(&territory.notes),
                t::status.eq(territory.status.as_str()),
                t::number.eq(territory.number),
                t::boundaries.eq(st_geomfromtext(territory.boundaries.as_str(), SRID)),
                t::center.eq(st_geomfromtext(territory.center.as_str(), SRID)),
                t::assigned_to_id.eq(territory.assigned_to_id),
                t::assigned_at.eq(territory.assigned_at),
                t::returned_at.eq(territory.returned_at),
                t::created_at.eq(territory.created_at),
                t::updated_at.eq(territory.updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(|e| map_write_error(e, territory))?;
        Ok(())
    }

    async fn update(&self, territory: &Territory) -> Result<bool, TerritoryPersistenceError> {
        let mut conn = self.conn().await?;
        let affected = diesel::update(t::territories.find(territory.id))
            .set((
                t::congregation_id.eq(territory.congregation_id),
                t::name.eq(&territory.name),
                t::description.eq(&territory.description),
                t::notes.eq(&territory.notes),
                t::status.eq(territory.status.as_str()),
                t::number.eq(territory.number),
                t::boundaries.eq(st_geomfromtext(territory.boundaries.as_str(), SRID)),
                t::center.eq(st_geomfromtext(territory.center.as_str(), SRID)),
                t::assigned_to_id.eq(territory.assigned_to_id),
                t::assigned_at.eq(territory.assigned_at),
                t::returned_at.eq(territory.returned_at),
                t::updated_at.eq(territory.updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(|e| map_write_error(e, territory))?;
        Ok(affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, TerritoryPersistenceError> {
        let mut conn = self.conn().await?;
        let affected = diesel::delete(t::territories.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(affected > 0)
    }

    async fn delete_by_congregation(
        &self,
        congregation_id: Uuid,
    ) -> Result<u64, TerritoryPersistenceError> {
        let mut conn = self.conn().await?;
        let affected = diesel::delete(t::territories.filter(t::congregation_id.eq(congregation_id)))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(affected as u64)
    }
}
