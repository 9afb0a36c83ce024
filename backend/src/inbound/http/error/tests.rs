//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use actix_web::ResponseError;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::invalid_geometry("not a polygon"), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(Error::validation_failed("Validation failed"), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("number race"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("pool exhausted"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn error_payload(error: Error, expected_status: StatusCode) -> Error {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error payload is valid JSON")
}

#[actix_web::test]
async fn internal_errors_are_redacted() {
    let error = Error::internal("connection string leaked").with_details(json!({"secret": "x"}));

    let payload = error_payload(error, StatusCode::INTERNAL_SERVER_ERROR).await;
    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), "Internal server error");
    assert!(payload.details().is_none());
}

#[actix_web::test]
async fn validation_errors_keep_their_details() {
    let error = Error::validation_failed("Validation failed")
        .with_details(json!({"errors": ["Name can't be blank"]}));

    let payload = error_payload(error, StatusCode::UNPROCESSABLE_ENTITY).await;
    assert_eq!(payload.code(), ErrorCode::ValidationFailed);
    assert_eq!(
        payload.details(),
        Some(&json!({"errors": ["Name can't be blank"]}))
    );
}

#[actix_web::test]
async fn responses_outside_a_trace_scope_omit_the_header() {
    let response = ResponseError::error_response(&Error::not_found("missing"));
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());
}

#[actix_web::test]
async fn responses_inside_a_trace_scope_carry_the_header() {
    let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
        .parse()
        .expect("literal UUID parses");
    let response = TraceId::scope(trace_id, async {
        ResponseError::error_response(&Error::not_found("missing"))
    })
    .await;
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .expect("trace header present inside scope");
    assert_eq!(header.to_str().unwrap(), trace_id.to_string());
}
