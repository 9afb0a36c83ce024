//! Territory API handlers.
//!
//! ```text
//! GET    /api/v1/territories?congregation_id=...
//! POST   /api/v1/territories
//! GET    /api/v1/territories/{id}
//! PUT    /api/v1/territories/{id}
//! PATCH  /api/v1/territories/{id}
//! DELETE /api/v1/territories/{id}
//! PATCH  /api/v1/territories/{id}/assign
//! PATCH  /api/v1/territories/{id}/return
//! PATCH  /api/v1/territories/{id}/complete
//! ```
//!
//! Territory bodies are GeoJSON Features on the way out; on the way in the
//! boundary arrives as a GeoJSON Polygon geometry and the centre as a
//! `{lng, lat}` pair.

use actix_web::{delete, get, patch, post, route, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    Error, LngLat, NewTerritory, Ring, Status, TerritoryUpdate,
};
use crate::inbound::http::features::{territory_feature, territory_features};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Territory create/update request body.
///
/// All fields are optional so the same shape serves both full creates and
/// partial updates; the domain layer decides which absences are errors.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct TerritoryPayload {
    pub congregation_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
    pub assigned_to_id: Option<Uuid>,
    pub number: Option<i32>,
    /// Boundary polygon as a GeoJSON geometry.
    #[schema(value_type = Object)]
    pub boundaries: Option<geojson::Geometry>,
    pub center: Option<LngLat>,
}

fn parse_status(value: Option<String>) -> Result<Option<Status>, Error> {
    match value {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| {
            Error::validation_failed("Validation failed")
                .with_details(json!({"errors": ["Status is not included in the list"]}))
        }),
    }
}

fn parse_boundaries(geometry: Option<geojson::Geometry>) -> Result<Option<Ring>, Error> {
    geometry
        .map(|g| Ring::from_geojson(&g).map_err(|e| e.into_field_error("boundaries")))
        .transpose()
}

impl TryFrom<TerritoryPayload> for NewTerritory {
    type Error = Error;

    fn try_from(payload: TerritoryPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            congregation_id: payload.congregation_id,
            name: payload.name,
            description: payload.description,
            notes: payload.notes,
            status: parse_status(payload.status)?,
            assigned_to_id: payload.assigned_to_id,
            number: payload.number,
            boundaries: parse_boundaries(payload.boundaries)?,
            center: payload.center,
        })
    }
}

impl TryFrom<TerritoryPayload> for TerritoryUpdate {
    type Error = Error;

    fn try_from(payload: TerritoryPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            congregation_id: payload.congregation_id,
            name: payload.name,
            description: payload.description,
            notes: payload.notes,
            status: parse_status(payload.status)?,
            assigned_to_id: payload.assigned_to_id,
            number: payload.number,
            boundaries: parse_boundaries(payload.boundaries)?,
            center: payload.center,
        })
    }
}

/// Query parameters for territory listing.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct TerritoryListQuery {
    /// Restrict the listing to one congregation.
    pub congregation_id: Option<Uuid>,
}

/// Request body for territory assignment.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AssignmentPayload {
    pub user_id: Uuid,
}

/// List territories, optionally scoped to a congregation.
#[utoipa::path(
    get,
    path = "/api/v1/territories",
    params(TerritoryListQuery),
    responses(
        (status = 200, description = "GeoJSON Features for matching territories"),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["territories"],
    operation_id = "list_territories"
)]
#[get("/territories")]
pub async fn list_territories(
    state: web::Data<HttpState>,
    query: web::Query<TerritoryListQuery>,
) -> ApiResult<HttpResponse> {
    let details = state.territories.list(query.congregation_id).await?;
    Ok(HttpResponse::Ok().json(territory_features(&details)?))
}

/// Fetch one territory.
#[utoipa::path(
    get,
    path = "/api/v1/territories/{id}",
    params(("id" = Uuid, Path, description = "Territory identifier")),
    responses(
        (status = 200, description = "GeoJSON Feature for the territory"),
        (status = 404, description = "Territory not found", body = Error)
    ),
    tags = ["territories"],
    operation_id = "get_territory"
)]
#[get("/territories/{id}")]
pub async fn get_territory(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let details = state.territories.get(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(territory_feature(&details)?))
}

/// Create a territory.
///
/// Omitted numbers are allocated as one past the congregation's current
/// maximum; omitted names default to "Territory {number}".
#[utoipa::path(
    post,
    path = "/api/v1/territories",
    request_body = TerritoryPayload,
    responses(
        (status = 201, description = "Territory created"),
        (status = 409, description = "Number taken concurrently", body = Error),
        (status = 422, description = "Validation or geometry failure", body = Error)
    ),
    tags = ["territories"],
    operation_id = "create_territory"
)]
#[post("/territories")]
pub async fn create_territory(
    state: web::Data<HttpState>,
    payload: web::Json<TerritoryPayload>,
) -> ApiResult<HttpResponse> {
    let input = NewTerritory::try_from(payload.into_inner())?;
    let details = state.territories.create(input).await?;
    Ok(HttpResponse::Created().json(territory_feature(&details)?))
}

/// Update a territory. Accepts both PUT and PATCH; absent fields are left
/// unchanged either way.
#[utoipa::path(
    put,
    path = "/api/v1/territories/{id}",
    params(("id" = Uuid, Path, description = "Territory identifier")),
    request_body = TerritoryPayload,
    responses(
        (status = 200, description = "Territory updated"),
        (status = 404, description = "Territory not found", body = Error),
        (status = 422, description = "Validation or geometry failure", body = Error)
    ),
    tags = ["territories"],
    operation_id = "update_territory"
)]
#[route("/territories/{id}", method = "PUT", method = "PATCH")]
pub async fn update_territory(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
    payload: web::Json<TerritoryPayload>,
) -> ApiResult<HttpResponse> {
    let update = TerritoryUpdate::try_from(payload.into_inner())?;
    let details = state.territories.update(id.into_inner(), update).await?;
    Ok(HttpResponse::Ok().json(territory_feature(&details)?))
}

/// Delete a territory.
#[utoipa::path(
    delete,
    path = "/api/v1/territories/{id}",
    params(("id" = Uuid, Path, description = "Territory identifier")),
    responses(
        (status = 204, description = "Territory deleted"),
        (status = 404, description = "Territory not found", body = Error)
    ),
    tags = ["territories"],
    operation_id = "delete_territory"
)]
#[delete("/territories/{id}")]
pub async fn delete_territory(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.territories.delete(id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Assign a territory to a user.
#[utoipa::path(
    patch,
    path = "/api/v1/territories/{id}/assign",
    params(("id" = Uuid, Path, description = "Territory identifier")),
    request_body = AssignmentPayload,
    responses(
        (status = 200, description = "Territory assigned"),
        (status = 404, description = "Territory or user not found", body = Error)
    ),
    tags = ["territories"],
    operation_id = "assign_territory"
)]
#[patch("/territories/{id}/assign")]
pub async fn assign_territory(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
    payload: web::Json<AssignmentPayload>,
) -> ApiResult<HttpResponse> {
    let details = state
        .territories
        .assign(id.into_inner(), payload.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(territory_feature(&details)?))
}

/// Mark a territory as returned. The assignee is kept for history.
#[utoipa::path(
    patch,
    path = "/api/v1/territories/{id}/return",
    params(("id" = Uuid, Path, description = "Territory identifier")),
    responses(
        (status = 200, description = "Territory returned"),
        (status = 404, description = "Territory not found", body = Error)
    ),
    tags = ["territories"],
    operation_id = "return_territory"
)]
#[patch("/territories/{id}/return")]
pub async fn return_territory(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let details = state.territories.return_territory(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(territory_feature(&details)?))
}

/// Mark a territory as completed.
#[utoipa::path(
    patch,
    path = "/api/v1/territories/{id}/complete",
    params(("id" = Uuid, Path, description = "Territory identifier")),
    responses(
        (status = 200, description = "Territory completed"),
        (status = 404, description = "Territory not found", body = Error)
    ),
    tags = ["territories"],
    operation_id = "complete_territory"
)]
#[patch("/territories/{id}/complete")]
pub async fn complete_territory(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let details = state.territories.complete(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(territory_feature(&details)?))
}

#[cfg(test)]
mod tests;
