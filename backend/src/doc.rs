//! OpenAPI documentation configuration.
//!
//! The generated specification is served by Swagger UI in debug builds and
//! covers every REST endpoint together with the shared error schema.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, LngLat};
use crate::inbound::http::congregations::CongregationPayload;
use crate::inbound::http::territories::{AssignmentPayload, TerritoryPayload};
use crate::inbound::http::users::UserResponse;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Territories backend API",
        description = "HTTP interface for congregation territory management."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::territories::list_territories,
        crate::inbound::http::territories::get_territory,
        crate::inbound::http::territories::create_territory,
        crate::inbound::http::territories::update_territory,
        crate::inbound::http::territories::delete_territory,
        crate::inbound::http::territories::assign_territory,
        crate::inbound::http::territories::return_territory,
        crate::inbound::http::territories::complete_territory,
        crate::inbound::http::congregations::list_congregations,
        crate::inbound::http::congregations::get_congregation,
        crate::inbound::http::congregations::create_congregation,
        crate::inbound::http::congregations::update_congregation,
        crate::inbound::http::congregations::delete_congregation,
        crate::inbound::http::users::list_users,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LngLat,
        TerritoryPayload,
        AssignmentPayload,
        CongregationPayload,
        UserResponse,
    )),
    tags(
        (name = "territories", description = "Territory CRUD and lifecycle"),
        (name = "congregations", description = "Congregation CRUD"),
        (name = "users", description = "User directory"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_endpoint_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for path in [
            "/api/v1/territories",
            "/api/v1/territories/{id}",
            "/api/v1/territories/{id}/assign",
            "/api/v1/territories/{id}/return",
            "/api/v1/territories/{id}/complete",
            "/api/v1/congregations",
            "/api/v1/congregations/{id}",
            "/api/v1/users",
            "/health/ready",
            "/health/live",
        ] {
            assert!(paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn error_schema_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components present");
        assert!(components.schemas.contains_key("Error"));
        assert!(components.schemas.contains_key("ErrorCode"));
    }
}
