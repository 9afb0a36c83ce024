//! Tests for territory payload parsing.

use super::*;
use crate::domain::ErrorCode;
use rstest::rstest;
use serde_json::json;

fn payload_with_boundaries(value: serde_json::Value) -> TerritoryPayload {
    serde_json::from_value(json!({ "boundaries": value })).expect("payload deserialises")
}

#[test]
fn geojson_polygons_become_rings() {
    let payload = payload_with_boundaries(json!({
        "type": "Polygon",
        "coordinates": [[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]],
    }));

    let input = NewTerritory::try_from(payload).expect("conversion succeeds");
    let ring = input.boundaries.expect("ring present");
    assert_eq!(ring.points().len(), 5);
}

#[rstest]
#[case(json!({ "type": "Point", "coordinates": [0.0, 0.0] }))]
#[case(json!({ "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] }))]
fn non_polygon_geometry_is_rejected_with_the_field_name(#[case] geometry: serde_json::Value) {
    let payload = payload_with_boundaries(geometry);

    let error = NewTerritory::try_from(payload).expect_err("conversion fails");

    assert_eq!(error.code(), ErrorCode::InvalidGeometry);
    assert_eq!(
        error.details().and_then(|d| d.get("field")),
        Some(&json!("boundaries"))
    );
}

#[test]
fn known_statuses_parse() {
    let payload: TerritoryPayload =
        serde_json::from_value(json!({ "status": "assigned" })).expect("payload deserialises");
    let input = NewTerritory::try_from(payload).expect("conversion succeeds");
    assert_eq!(input.status, Some(Status::Assigned));
}

#[test]
fn unknown_statuses_fail_validation() {
    let payload: TerritoryPayload =
        serde_json::from_value(json!({ "status": "lost" })).expect("payload deserialises");

    let error = NewTerritory::try_from(payload).expect_err("conversion fails");

    assert_eq!(error.code(), ErrorCode::ValidationFailed);
    assert_eq!(
        error.details(),
        Some(&json!({"errors": ["Status is not included in the list"]}))
    );
}

#[test]
fn absent_fields_stay_absent() {
    let payload: TerritoryPayload = serde_json::from_value(json!({})).expect("payload deserialises");
    let update = TerritoryUpdate::try_from(payload).expect("conversion succeeds");
    assert!(update.name.is_none());
    assert!(update.boundaries.is_none());
    assert!(update.status.is_none());
}
