//! Diesel-backed [`CongregationRepository`] adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::geometry::SRID;
use crate::domain::ports::{CongregationRepository, PersistenceError};
use crate::domain::Congregation;

use super::diesel_error::{map_diesel_error, map_pool_error};
use super::models::CongregationRow;
use super::schema::congregations::dsl as c;
use super::spatial::{st_astext_nullable, st_geomfromtext_nullable};
use super::DbPool;

/// Diesel-backed congregation repository.
#[derive(Clone)]
pub struct DieselCongregationRepository {
    pool: DbPool,
}

impl DieselCongregationRepository {
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

fn map_row(row: CongregationRow) -> Result<Congregation, PersistenceError> {
    Congregation::try_from(row).map_err(PersistenceError::query)
}

/// The zone pair as nullable WKT insert/update expressions.
fn zone_wkt(congregation: &Congregation) -> (Option<&str>, Option<&str>) {
    match &congregation.zone {
        Some(zone) => (Some(zone.boundaries.as_str()), Some(zone.center.as_str())),
        None => (None, None),
    }
}

#[async_trait]
impl CongregationRepository for DieselCongregationRepository {
    async fn list(&self) -> Result<Vec<Congregation>, PersistenceError> {
        let mut conn = self.conn().await?;
        let rows: Vec<CongregationRow> = c::congregations
            .select((
                c::id,
                c::name,
                c::description,
                st_astext_nullable(c::boundaries),
                st_astext_nullable(c::center),
                c::created_at,
                c::updated_at,
            ))
            .order(c::name.asc())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows.into_iter().map(map_row).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Congregation>, PersistenceError> {
        let mut conn = self.conn().await?;
        let row: Option<CongregationRow> = c::congregations
            .find(id)
            .select((
                c::id,
                c::name,
                c::description,
                st_astext_nullable(c::boundaries),
                st_astext_nullable(c::center),
                c::created_at,
                c::updated_at,
            ))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(map_row).transpose()
    }

    async fn insert(&self, congregation: &Congregation) -> Result<(), PersistenceError> {
        let mut conn = self.conn().await?;
        let (boundaries, center) = zone_wkt(congregation);
        diesel::insert_into(c::congregations)
            .values((
                c::id.eq(congregation.id),
                c::name.eq(&congregation.name),
                c::description.eq(&congregation.description),
                c::boundaries.eq(st_geomfromtext_nullable(boundaries, SRID)),
                c::center.eq(st_geomfromtext_nullable(center, SRID)),
                c::created_at.eq(congregation.created_at),
                c::updated_at.eq(congregation.updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(())
    }

    async fn update(&self, congregation: &Congregation) -> Result<bool, PersistenceError> {
        let mut conn = self.conn().await?;
        let (boundaries, center) = zone_wkt(congregation);
        let affected = diesel::update(c::congregations.find(congregation.id))
            .set((
                c::name.eq(&congregation.name),
                c::description.eq(&congregation.description),
                c::boundaries.eq(st_geomfromtext_nullable(boundaries, SRID)),
                c::center.eq(st_geomfromtext_nullable(center, SRID)),
                c::updated_at.eq(congregation.updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError> {
        let mut conn = self.conn().await?;
        let affected = diesel::delete(c::congregations.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(affected > 0)
    }
}
