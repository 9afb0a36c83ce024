//! GeoJSON feature serialisation for API responses.
//!
//! Territories and congregations travel over the wire as GeoJSON Features so
//! map clients can render them directly. Stored WKT that fails to parse back
//! is treated as data corruption and surfaces as an internal error rather
//! than leaking parser detail to clients.

use geojson::{feature::Id, Feature, JsonObject};
use serde_json::json;
use tracing::error;

use crate::domain::{area, geometry, Congregation, Error, GeometryError, TerritoryDetails};

fn corrupt_geometry(entity: &str, id: uuid::Uuid, source: &GeometryError) -> Error {
    error!(%id, entity, error = %source, "stored geometry failed to parse");
    Error::internal("Internal server error")
}

fn center_property(wkt: &str) -> Result<serde_json::Value, GeometryError> {
    let point = geometry::point_from_wkt(wkt)?;
    Ok(json!({ "lat": point.lat, "lng": point.lng }))
}

/// Render a territory as a GeoJSON Feature.
///
/// The feature geometry is the boundary polygon; the centre point, computed
/// area in acres and lifecycle fields ride along in `properties`.
pub fn territory_feature(details: &TerritoryDetails) -> Result<Feature, Error> {
    let territory = &details.territory;
    let geometry = geometry::geojson_from_polygon_wkt(&territory.boundaries)
        .map_err(|e| corrupt_geometry("territory", territory.id, &e))?;
    let acres = area::area_in_acres(Some(&territory.boundaries))
        .map_err(|e| corrupt_geometry("territory", territory.id, &e))?;
    let center = center_property(&territory.center)
        .map_err(|e| corrupt_geometry("territory", territory.id, &e))?;

    let mut properties = JsonObject::new();
    properties.insert("id".to_owned(), json!(territory.id));
    properties.insert("name".to_owned(), json!(territory.name));
    properties.insert("description".to_owned(), json!(territory.description));
    properties.insert("notes".to_owned(), json!(territory.notes));
    properties.insert("status".to_owned(), json!(territory.status));
    properties.insert("area".to_owned(), json!(acres));
    properties.insert("number".to_owned(), json!(territory.number));
    properties.insert(
        "congregation_id".to_owned(),
        json!(territory.congregation_id),
    );
    properties.insert("center".to_owned(), center);
    properties.insert("assigned_to".to_owned(), json!(details.assigned_to));
    properties.insert(
        "assigned_to_id".to_owned(),
        json!(territory.assigned_to_id),
    );
    properties.insert("assigned_at".to_owned(), json!(territory.assigned_at));
    properties.insert("returned_at".to_owned(), json!(territory.returned_at));
    properties.insert("created_at".to_owned(), json!(territory.created_at));
    properties.insert("updated_at".to_owned(), json!(territory.updated_at));

    Ok(Feature {
        bbox: None,
        geometry: Some(geometry),
        id: Some(Id::String(territory.id.to_string())),
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Render a congregation as a GeoJSON Feature.
///
/// Congregations without a zone serialise with a null geometry and no
/// `center` coordinate.
pub fn congregation_feature(congregation: &Congregation) -> Result<Feature, Error> {
    let mut geometry = None;
    let mut center = serde_json::Value::Null;
    if let Some(zone) = &congregation.zone {
        geometry = Some(
            geometry::geojson_from_polygon_wkt(&zone.boundaries)
                .map_err(|e| corrupt_geometry("congregation", congregation.id, &e))?,
        );
        center = center_property(&zone.center)
            .map_err(|e| corrupt_geometry("congregation", congregation.id, &e))?;
    }

    let mut properties = JsonObject::new();
    properties.insert("id".to_owned(), json!(congregation.id));
    properties.insert("name".to_owned(), json!(congregation.name));
    properties.insert(
        "description".to_owned(),
        json!(congregation.description),
    );
    properties.insert("center".to_owned(), center);
    properties.insert("created_at".to_owned(), json!(congregation.created_at));
    properties.insert("updated_at".to_owned(), json!(congregation.updated_at));

    Ok(Feature {
        bbox: None,
        geometry,
        id: Some(Id::String(congregation.id.to_string())),
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Render a batch of territories, stopping at the first corrupt row.
pub fn territory_features(details: &[TerritoryDetails]) -> Result<Vec<Feature>, Error> {
    details.iter().map(territory_feature).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Status, Territory, Zone};
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_territory() -> TerritoryDetails {
        let now = Utc::now();
        TerritoryDetails {
            territory: Territory {
                id: Uuid::new_v4(),
                congregation_id: Uuid::new_v4(),
                name: "Territory 7".to_owned(),
                description: Some("North side".to_owned()),
                notes: None,
                status: Status::Assigned,
                number: Some(7),
                boundaries: "POLYGON((0 0, 0 2, 2 2, 2 0, 0 0))".to_owned(),
                center: "POINT(1 1)".to_owned(),
                assigned_to_id: Some(Uuid::new_v4()),
                assigned_at: Some(now),
                returned_at: None,
                created_at: now,
                updated_at: now,
            },
            assigned_to: Some("Ana Diaz".to_owned()),
        }
    }

    #[test]
    fn territory_feature_exposes_lifecycle_properties() {
        let details = sample_territory();
        let feature = territory_feature(&details).expect("feature builds");
        let properties = feature.properties.expect("properties present");

        assert_eq!(properties["name"], json!("Territory 7"));
        assert_eq!(properties["status"], json!("assigned"));
        assert_eq!(properties["number"], json!(7));
        assert_eq!(properties["assigned_to"], json!("Ana Diaz"));
        assert_eq!(properties["center"], json!({"lat": 1.0, "lng": 1.0}));
        let area = properties["area"].as_f64().expect("area is numeric");
        assert!(area > 0.0);
        assert!(feature.geometry.is_some());
    }

    #[test]
    fn territory_feature_rejects_corrupt_wkt() {
        let mut details = sample_territory();
        details.territory.boundaries = "POLYGON((garbage".to_owned();
        let error = territory_feature(&details).expect_err("corrupt WKT fails");
        assert_eq!(error.message(), "Internal server error");
    }

    #[test]
    fn congregation_without_zone_has_null_geometry() {
        let now = Utc::now();
        let congregation = Congregation {
            id: Uuid::new_v4(),
            name: "Centro".to_owned(),
            description: None,
            zone: None,
            created_at: now,
            updated_at: now,
        };
        let feature = congregation_feature(&congregation).expect("feature builds");
        assert!(feature.geometry.is_none());
        let properties = feature.properties.expect("properties present");
        assert_eq!(properties["center"], serde_json::Value::Null);
    }

    #[test]
    fn congregation_with_zone_carries_polygon_and_center() {
        let now = Utc::now();
        let congregation = Congregation {
            id: Uuid::new_v4(),
            name: "Centro".to_owned(),
            description: Some("City centre".to_owned()),
            zone: Some(Zone {
                boundaries: "POLYGON((0 0, 0 1, 1 1, 1 0, 0 0))".to_owned(),
                center: "POINT(0.5 0.5)".to_owned(),
            }),
            created_at: now,
            updated_at: now,
        };
        let feature = congregation_feature(&congregation).expect("feature builds");
        assert!(feature.geometry.is_some());
        let properties = feature.properties.expect("properties present");
        assert_eq!(properties["center"], json!({"lat": 0.5, "lng": 0.5}));
    }
}
