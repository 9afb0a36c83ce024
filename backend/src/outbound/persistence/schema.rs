//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly. The geometry
//! columns use the PostGIS `geometry` type declared in
//! [`super::spatial::Geometry`]; repositories never select them raw,
//! only through `ST_AsText`.

diesel::table! {
    use diesel::sql_types::*;
    use crate::outbound::persistence::spatial::Geometry;

    /// Congregations owning territories; the main zone pair is nullable
    /// together (application enforced).
    congregations (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        boundaries -> Nullable<Geometry>,
        center -> Nullable<Geometry>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use crate::outbound::persistence::spatial::Geometry;

    /// Territories; `(congregation_id, number)` is unique when number is
    /// non-null.
    territories (id) {
        id -> Uuid,
        congregation_id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        notes -> Nullable<Text>,
        status -> Varchar,
        number -> Nullable<Int4>,
        boundaries -> Geometry,
        center -> Geometry,
        assigned_to_id -> Nullable<Uuid>,
        assigned_at -> Nullable<Timestamptz>,
        returned_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Users, written by the auth collaborator and read here.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        role -> Varchar,
        active -> Bool,
        congregation_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(territories -> congregations (congregation_id));
diesel::joinable!(territories -> users (assigned_to_id));

diesel::allow_tables_to_appear_in_same_query!(congregations, territories, users);
