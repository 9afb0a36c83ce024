//! Tests for the congregation service and its territory cascade.

use std::sync::Arc;

use uuid::Uuid;

use super::*;
use crate::domain::territory_service::{NewTerritory, TerritoryService};
use crate::domain::ErrorCode;
use crate::outbound::persistence::{
    InMemoryCongregationRepository, InMemoryTerritoryRepository, InMemoryUserRepository,
};

struct Fixture {
    service: CongregationService,
    territory_service: TerritoryService,
}

fn fixture() -> Fixture {
    let territories = Arc::new(InMemoryTerritoryRepository::new());
    let congregations = Arc::new(InMemoryCongregationRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());

    Fixture {
        service: CongregationService::new(congregations.clone(), territories.clone()),
        territory_service: TerritoryService::new(territories, congregations, users),
    }
}

fn point(lng: f64, lat: f64) -> LngLat {
    LngLat::new(lng, lat).expect("finite coordinates")
}

fn square() -> Ring {
    Ring::new(vec![
        point(0.0, 0.0),
        point(0.0, 1.0),
        point(1.0, 1.0),
        point(1.0, 0.0),
    ])
    .expect("square ring is valid")
}

fn named(name: &str) -> NewCongregation {
    NewCongregation {
        name: Some(name.to_owned()),
        ..NewCongregation::default()
    }
}

fn validation_messages(error: &Error) -> Vec<String> {
    assert_eq!(error.code(), ErrorCode::ValidationFailed);
    let details = error.details().expect("validation errors carry details");
    serde_json::from_value(details["errors"].clone()).expect("errors is a string array")
}

#[tokio::test]
async fn create_requires_a_name() {
    let fixture = fixture();

    let error = fixture
        .service
        .create(NewCongregation::default())
        .await
        .expect_err("create fails");

    assert_eq!(
        validation_messages(&error),
        vec!["Name can't be blank".to_owned()]
    );
}

#[tokio::test]
async fn the_zone_is_optional_but_all_or_nothing() {
    let fixture = fixture();

    let without_zone = fixture
        .service
        .create(named("Centro"))
        .await
        .expect("zoneless create succeeds");
    assert!(without_zone.zone.is_none());

    let error = fixture
        .service
        .create(NewCongregation {
            boundaries: Some(square()),
            ..named("Norte")
        })
        .await
        .expect_err("boundaries without center fail");
    assert_eq!(
        validation_messages(&error),
        vec!["Center must accompany boundaries".to_owned()]
    );

    let error = fixture
        .service
        .create(NewCongregation {
            center: Some(point(0.5, 0.5)),
            ..named("Sur")
        })
        .await
        .expect_err("center without boundaries fails");
    assert_eq!(
        validation_messages(&error),
        vec!["Boundaries must accompany center".to_owned()]
    );
}

#[tokio::test]
async fn zones_are_stored_as_wkt() {
    let fixture = fixture();

    let congregation = fixture
        .service
        .create(NewCongregation {
            boundaries: Some(square()),
            center: Some(point(0.5, 0.5)),
            ..named("Centro")
        })
        .await
        .expect("create succeeds");

    let zone = congregation.zone.expect("zone stored");
    assert_eq!(
        zone.boundaries,
        "POLYGON((0 0, 0 1, 1 1, 1 0, 0 0))"
    );
    assert_eq!(zone.center, "POINT(0.5 0.5)");
}

#[tokio::test]
async fn updates_without_geometry_clear_the_zone() {
    let fixture = fixture();
    let congregation = fixture
        .service
        .create(NewCongregation {
            boundaries: Some(square()),
            center: Some(point(0.5, 0.5)),
            ..named("Centro")
        })
        .await
        .expect("create succeeds");

    let updated = fixture
        .service
        .update(
            congregation.id,
            CongregationUpdate {
                description: Some("City centre".to_owned()),
                ..CongregationUpdate::default()
            },
        )
        .await
        .expect("update succeeds");

    assert!(updated.zone.is_none());
    assert_eq!(updated.description.as_deref(), Some("City centre"));
    assert_eq!(updated.name, "Centro");
}

#[tokio::test]
async fn blank_names_are_rejected_on_update() {
    let fixture = fixture();
    let congregation = fixture
        .service
        .create(named("Centro"))
        .await
        .expect("create succeeds");

    let error = fixture
        .service
        .update(
            congregation.id,
            CongregationUpdate {
                name: Some("  ".to_owned()),
                ..CongregationUpdate::default()
            },
        )
        .await
        .expect_err("update fails");

    assert_eq!(
        validation_messages(&error),
        vec!["Name can't be blank".to_owned()]
    );
}

#[tokio::test]
async fn deleting_a_congregation_removes_its_territories() {
    let fixture = fixture();
    let congregation = fixture
        .service
        .create(named("Centro"))
        .await
        .expect("create succeeds");
    fixture
        .territory_service
        .create(NewTerritory {
            congregation_id: Some(congregation.id),
            boundaries: Some(square()),
            center: Some(point(0.5, 0.5)),
            ..NewTerritory::default()
        })
        .await
        .expect("territory create succeeds");

    fixture
        .service
        .delete(congregation.id)
        .await
        .expect("delete succeeds");

    let remaining = fixture
        .territory_service
        .list(None)
        .await
        .expect("list succeeds");
    assert!(remaining.is_empty());
    let error = fixture
        .service
        .get(congregation.id)
        .await
        .expect_err("congregation gone");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn deleting_an_unknown_congregation_is_not_found() {
    let fixture = fixture();

    let error = fixture
        .service
        .delete(Uuid::new_v4())
        .await
        .expect_err("delete fails");

    assert_eq!(error.code(), ErrorCode::NotFound);
}
