//! Congregation API handlers.
//!
//! ```text
//! GET    /api/v1/congregations
//! POST   /api/v1/congregations
//! GET    /api/v1/congregations/{id}
//! PUT    /api/v1/congregations/{id}
//! PATCH  /api/v1/congregations/{id}
//! DELETE /api/v1/congregations/{id}
//! ```
//!
//! A congregation's zone (boundary polygon plus centre point) travels as one
//! unit: sending boundaries without a centre, or a centre without
//! boundaries, is a validation failure, and an update that omits both clears
//! the zone.

use actix_web::{delete, get, post, route, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{CongregationUpdate, Error, LngLat, NewCongregation, Ring};
use crate::inbound::http::features::congregation_feature;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Congregation create/update request body.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct CongregationPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Zone boundary polygon as a GeoJSON geometry.
    #[schema(value_type = Object)]
    pub boundaries: Option<geojson::Geometry>,
    pub center: Option<LngLat>,
}

fn parse_boundaries(geometry: Option<geojson::Geometry>) -> Result<Option<Ring>, Error> {
    geometry
        .map(|g| Ring::from_geojson(&g).map_err(|e| e.into_field_error("boundaries")))
        .transpose()
}

impl TryFrom<CongregationPayload> for NewCongregation {
    type Error = Error;

    fn try_from(payload: CongregationPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            name: payload.name,
            description: payload.description,
            boundaries: parse_boundaries(payload.boundaries)?,
            center: payload.center,
        })
    }
}

impl TryFrom<CongregationPayload> for CongregationUpdate {
    type Error = Error;

    fn try_from(payload: CongregationPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            name: payload.name,
            description: payload.description,
            boundaries: parse_boundaries(payload.boundaries)?,
            center: payload.center,
        })
    }
}

/// List congregations.
#[utoipa::path(
    get,
    path = "/api/v1/congregations",
    responses(
        (status = 200, description = "GeoJSON Features for all congregations"),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["congregations"],
    operation_id = "list_congregations"
)]
#[get("/congregations")]
pub async fn list_congregations(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let congregations = state.congregations.list().await?;
    let features = congregations
        .iter()
        .map(congregation_feature)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(HttpResponse::Ok().json(features))
}

/// Fetch one congregation.
#[utoipa::path(
    get,
    path = "/api/v1/congregations/{id}",
    params(("id" = Uuid, Path, description = "Congregation identifier")),
    responses(
        (status = 200, description = "GeoJSON Feature for the congregation"),
        (status = 404, description = "Congregation not found", body = Error)
    ),
    tags = ["congregations"],
    operation_id = "get_congregation"
)]
#[get("/congregations/{id}")]
pub async fn get_congregation(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let congregation = state.congregations.get(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(congregation_feature(&congregation)?))
}

/// Create a congregation.
#[utoipa::path(
    post,
    path = "/api/v1/congregations",
    request_body = CongregationPayload,
    responses(
        (status = 201, description = "Congregation created"),
        (status = 422, description = "Validation or geometry failure", body = Error)
    ),
    tags = ["congregations"],
    operation_id = "create_congregation"
)]
#[post("/congregations")]
pub async fn create_congregation(
    state: web::Data<HttpState>,
    payload: web::Json<CongregationPayload>,
) -> ApiResult<HttpResponse> {
    let input = NewCongregation::try_from(payload.into_inner())?;
    let congregation = state.congregations.create(input).await?;
    Ok(HttpResponse::Created().json(congregation_feature(&congregation)?))
}

/// Update a congregation. Omitting the zone fields clears the stored zone.
#[utoipa::path(
    put,
    path = "/api/v1/congregations/{id}",
    params(("id" = Uuid, Path, description = "Congregation identifier")),
    request_body = CongregationPayload,
    responses(
        (status = 200, description = "Congregation updated"),
        (status = 404, description = "Congregation not found", body = Error),
        (status = 422, description = "Validation or geometry failure", body = Error)
    ),
    tags = ["congregations"],
    operation_id = "update_congregation"
)]
#[route("/congregations/{id}", method = "PUT", method = "PATCH")]
pub async fn update_congregation(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
    payload: web::Json<CongregationPayload>,
) -> ApiResult<HttpResponse> {
    let update = CongregationUpdate::try_from(payload.into_inner())?;
    let congregation = state.congregations.update(id.into_inner(), update).await?;
    Ok(HttpResponse::Ok().json(congregation_feature(&congregation)?))
}

/// Delete a congregation along with its territories.
#[utoipa::path(
    delete,
    path = "/api/v1/congregations/{id}",
    params(("id" = Uuid, Path, description = "Congregation identifier")),
    responses(
        (status = 204, description = "Congregation deleted"),
        (status = 404, description = "Congregation not found", body = Error)
    ),
    tags = ["congregations"],
    operation_id = "delete_congregation"
)]
#[delete("/congregations/{id}")]
pub async fn delete_congregation(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.congregations.delete(id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
