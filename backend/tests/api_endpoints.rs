//! End-to-end exercises of the REST surface over in-memory storage.
//!
//! These tests run the real Actix handlers with the real domain services,
//! substituting only the persistence layer, so wire formats and status codes
//! are checked exactly as a client sees them.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use uuid::Uuid;

use territories_backend::domain::{CongregationService, Role, TerritoryService, User, UserDirectory};
use territories_backend::inbound::http::{configure_api, HttpState};
use territories_backend::middleware::TRACE_ID_HEADER;
use territories_backend::outbound::persistence::{
    InMemoryCongregationRepository, InMemoryTerritoryRepository, InMemoryUserRepository,
};
use territories_backend::Trace;

struct TestBackend {
    state: HttpState,
    users: Arc<InMemoryUserRepository>,
}

fn backend() -> TestBackend {
    let territories = Arc::new(InMemoryTerritoryRepository::new());
    let congregations = Arc::new(InMemoryCongregationRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());

    let state = HttpState::new(
        Arc::new(TerritoryService::new(
            territories.clone(),
            congregations.clone(),
            users.clone(),
        )),
        Arc::new(CongregationService::new(
            congregations.clone(),
            territories.clone(),
        )),
        Arc::new(UserDirectory::new(users.clone(), territories)),
    );
    TestBackend { state, users }
}

async fn spawn(
    backend: &TestBackend,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(backend.state.clone()))
            .wrap(Trace)
            .configure(configure_api),
    )
    .await
}

fn seed_user(backend: &TestBackend, name: &str) -> User {
    let user = User {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        email: format!("{}@example.org", name.to_lowercase().replace(' ', ".")),
        role: Role::Publicador,
        active: true,
        congregation_id: None,
    };
    backend.users.seed(user.clone());
    user
}

fn polygon(coordinates: Value) -> Value {
    json!({ "type": "Polygon", "coordinates": coordinates })
}

fn square_payload(congregation_id: &str) -> Value {
    json!({
        "congregation_id": congregation_id,
        "boundaries": polygon(json!([[[0.0, 0.0], [0.0, 2.0], [2.0, 2.0], [2.0, 0.0], [0.0, 0.0]]])),
        "center": { "lng": 1.0, "lat": 1.0 },
    })
}

async fn create_congregation<S>(app: &S, name: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/congregations")
            .set_json(json!({ "name": name }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(response).await;
    body["properties"]["id"]
        .as_str()
        .expect("congregation id present")
        .to_owned()
}

async fn create_territory<S>(app: &S, congregation_id: &str) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/territories")
            .set_json(square_payload(congregation_id))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    test::read_body_json(response).await
}

#[actix_web::test]
async fn created_territories_come_back_as_geojson_features() {
    let backend = backend();
    let app = spawn(&backend).await;
    let congregation_id = create_congregation(&app, "Centro").await;

    let feature = create_territory(&app, &congregation_id).await;

    assert_eq!(feature["type"], json!("Feature"));
    assert_eq!(feature["geometry"]["type"], json!("Polygon"));
    assert_eq!(feature["properties"]["name"], json!("Territory 1"));
    assert_eq!(feature["properties"]["number"], json!(1));
    assert_eq!(feature["properties"]["status"], json!("available"));
    assert_eq!(
        feature["properties"]["center"],
        json!({"lat": 1.0, "lng": 1.0})
    );
    assert_eq!(
        feature["properties"]["congregation_id"],
        json!(congregation_id)
    );
    // A 2x2 degree square at the equator is roughly 12,200 km^2.
    let acres = feature["properties"]["area"]
        .as_f64()
        .expect("area present");
    assert!(acres > 11_000_000.0 && acres < 13_000_000.0, "got {acres}");
}

#[actix_web::test]
async fn responses_carry_a_trace_id() {
    let backend = backend();
    let app = spawn(&backend).await;

    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/territories").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(TRACE_ID_HEADER));
}

#[actix_web::test]
async fn the_lifecycle_endpoints_step_through_the_statuses() {
    let backend = backend();
    let user = seed_user(&backend, "Ana Diaz");
    let app = spawn(&backend).await;
    let congregation_id = create_congregation(&app, "Centro").await;
    let feature = create_territory(&app, &congregation_id).await;
    let id = feature["properties"]["id"].as_str().expect("id present");

    let response = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/territories/{id}/assign"))
            .set_json(json!({ "user_id": user.id }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let assigned: Value = test::read_body_json(response).await;
    assert_eq!(assigned["properties"]["status"], json!("assigned"));
    assert_eq!(assigned["properties"]["assigned_to"], json!("Ana Diaz"));

    let response = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/territories/{id}/return"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let returned: Value = test::read_body_json(response).await;
    assert_eq!(returned["properties"]["status"], json!("returned"));
    // History keeps the last assignee after a return.
    assert_eq!(returned["properties"]["assigned_to"], json!("Ana Diaz"));

    let response = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/territories/{id}/complete"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let completed: Value = test::read_body_json(response).await;
    assert_eq!(completed["properties"]["status"], json!("completed"));
}

#[actix_web::test]
async fn validation_failures_list_every_problem() {
    let backend = backend();
    let app = spawn(&backend).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/territories")
            .set_json(json!({}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], json!("validation_failed"));
    let errors = body["details"]["errors"]
        .as_array()
        .expect("errors array present");
    assert!(errors.contains(&json!("Congregation must exist")));
    assert!(errors.contains(&json!("Boundaries can't be blank")));
    assert!(errors.contains(&json!("Center can't be blank")));
}

#[actix_web::test]
async fn non_polygon_geometry_is_an_invalid_geometry_error() {
    let backend = backend();
    let app = spawn(&backend).await;
    let congregation_id = create_congregation(&app, "Centro").await;

    let mut payload = square_payload(&congregation_id);
    payload["boundaries"] = json!({ "type": "Point", "coordinates": [0.0, 0.0] });
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/territories")
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], json!("invalid_geometry"));
    assert_eq!(body["details"]["field"], json!("boundaries"));
}

#[actix_web::test]
async fn unknown_territories_are_a_404() {
    let backend = backend();
    let app = spawn(&backend).await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/territories/{}", Uuid::new_v4()))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], json!("not_found"));
}

#[actix_web::test]
async fn listing_filters_by_congregation() {
    let backend = backend();
    let app = spawn(&backend).await;
    let first = create_congregation(&app, "Centro").await;
    let second = create_congregation(&app, "Norte").await;
    create_territory(&app, &first).await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/territories?congregation_id={second}"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body, json!([]));

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/territories?congregation_id={first}"))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn deleting_a_congregation_cascades_to_territories() {
    let backend = backend();
    let app = spawn(&backend).await;
    let congregation_id = create_congregation(&app, "Centro").await;
    create_territory(&app, &congregation_id).await;

    let response = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/congregations/{congregation_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/territories").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn the_user_directory_counts_territories_per_status() {
    let backend = backend();
    let user = seed_user(&backend, "Ana Diaz");
    let app = spawn(&backend).await;
    let congregation_id = create_congregation(&app, "Centro").await;
    let feature = create_territory(&app, &congregation_id).await;
    let id = feature["properties"]["id"].as_str().expect("id present");

    test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/territories/{id}/assign"))
            .set_json(json!({ "user_id": user.id }))
            .to_request(),
    )
    .await;

    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/users").to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    let listed = body.as_array().expect("array body");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], json!("Ana Diaz"));
    assert_eq!(listed[0]["assigned_territories"], json!(1));
}
