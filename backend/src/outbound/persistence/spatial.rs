//! PostGIS geometry support for Diesel.
//!
//! The geometry columns carry PostGIS `geometry(..., 4326)` values. Rather
//! than pulling in a binary EWKB codec, the adapters move geometry through
//! text: `ST_GeomFromText` on the way in and `ST_AsText` on the way out,
//! matching the domain's WKT representation exactly.

use diesel::sql_types::{Integer, Nullable, Text};

/// SQL type marker for the PostGIS `geometry` column type.
#[derive(Debug, Clone, Copy, diesel::sql_types::SqlType, diesel::query_builder::QueryId)]
#[diesel(postgres_type(name = "geometry"))]
pub struct Geometry;

diesel::define_sql_function! {
    /// `ST_AsText(geometry) -> text` over a non-null column.
    #[sql_name = "ST_AsText"]
    fn st_astext(geom: Geometry) -> Text;
}

diesel::define_sql_function! {
    /// `ST_AsText(geometry) -> text` over a nullable column.
    #[sql_name = "ST_AsText"]
    fn st_astext_nullable(geom: Nullable<Geometry>) -> Nullable<Text>;
}

diesel::define_sql_function! {
    /// `ST_GeomFromText(text, srid) -> geometry`.
    #[sql_name = "ST_GeomFromText"]
    fn st_geomfromtext(wkt: Text, srid: Integer) -> Geometry;
}

diesel::define_sql_function! {
    /// `ST_GeomFromText(text, srid) -> geometry`, null-propagating.
    #[sql_name = "ST_GeomFromText"]
    fn st_geomfromtext_nullable(wkt: Nullable<Text>, srid: Integer) -> Nullable<Geometry>;
}
