use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Extension, Path, Query, State};
use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::handlers;
use appointment_cell::models::{AppointmentDateFilter, BookAppointmentRequest};
use appointment_cell::services::booking::{validate_booking, BookingService};
use doctor_cell::models::Shift;
use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::test_utils::{test_doctor_identity, TestConfig};

fn test_config(storage_url: &str) -> AppConfig {
    TestConfig::with_storage_url(storage_url).to_app_config()
}

fn booking_request(doctor_id: &str, phone: &str) -> BookAppointmentRequest {
    BookAppointmentRequest {
        doctor_id: Some(doctor_id.to_string()),
        doctor_name: Some("Dr. Asha Mehta".to_string()),
        patient_name: Some("Ravi Kumar".to_string()),
        patient_phone: Some(phone.to_string()),
        date: Some("2025-09-01".to_string()),
        shift: Some("morning".to_string()),
    }
}

fn appointment_row(id: Uuid, doctor_id: Uuid) -> serde_json::Value {
    json!({
        "id": id,
        "doctorId": doctor_id,
        "doctorName": "Dr. Asha Mehta",
        "patientName": "Ravi Kumar",
        "patientPhone": "9876543210",
        "date": "2025-09-01",
        "shift": "morning",
        "createdAt": "2025-08-30T10:00:00Z"
    })
}

// ==============================================================================
// FIELD VALIDATION (PURE)
// ==============================================================================

#[test]
fn missing_fields_fail_validation() {
    let mut request = booking_request(&Uuid::new_v4().to_string(), "9876543210");
    request.patient_name = None;

    assert_matches!(validate_booking(request), Err(AppError::Validation(_)));
}

#[test]
fn blank_fields_fail_validation() {
    let mut request = booking_request(&Uuid::new_v4().to_string(), "9876543210");
    request.doctor_name = Some("   ".to_string());

    assert_matches!(validate_booking(request), Err(AppError::Validation(_)));
}

#[test]
fn phone_must_be_exactly_ten_digits() {
    let doctor_id = Uuid::new_v4().to_string();

    assert_matches!(
        validate_booking(booking_request(&doctor_id, "987654321")),
        Err(AppError::Validation(_))
    );
    assert_matches!(
        validate_booking(booking_request(&doctor_id, "98765432109")),
        Err(AppError::Validation(_))
    );
    assert_matches!(
        validate_booking(booking_request(&doctor_id, "98765x3210")),
        Err(AppError::Validation(_))
    );

    let booking = validate_booking(booking_request(&doctor_id, "9876543210")).unwrap();
    assert_eq!(booking.patient_phone, "9876543210");
    assert_eq!(booking.shift, Shift::Morning);
}

#[test]
fn malformed_doctor_id_fails_validation() {
    assert_matches!(
        validate_booking(booking_request("not-a-uuid", "9876543210")),
        Err(AppError::Validation(_))
    );
}

#[test]
fn malformed_date_fails_validation() {
    let mut request = booking_request(&Uuid::new_v4().to_string(), "9876543210");
    request.date = Some("01-09-2025".to_string());

    assert_matches!(validate_booking(request), Err(AppError::Validation(_)));
}

#[test]
fn unknown_shift_fails_validation() {
    let mut request = booking_request(&Uuid::new_v4().to_string(), "9876543210");
    request.shift = Some("noon".to_string());

    assert_matches!(validate_booking(request), Err(AppError::Validation(_)));
}

// ==============================================================================
// BOOKING AGAINST THE ROSTER
// ==============================================================================

#[tokio::test]
async fn booking_an_unknown_doctor_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = BookingService::new(&test_config(&mock_server.uri()));
    let err = service
        .book(booking_request(&Uuid::new_v4().to_string(), "9876543210"))
        .await
        .unwrap_err();

    assert_matches!(err, AppError::NotFound(_));
}

#[tokio::test]
async fn booking_an_already_taken_slot_conflicts() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": doctor_id }])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([appointment_row(Uuid::new_v4(), doctor_id)])),
        )
        .mount(&mock_server)
        .await;

    let service = BookingService::new(&test_config(&mock_server.uri()));
    let err = service
        .book(booking_request(&doctor_id.to_string(), "9876543210"))
        .await
        .unwrap_err();

    assert_matches!(err, AppError::Conflict(_));
}

#[tokio::test]
async fn a_valid_booking_is_recorded() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let appointment_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": doctor_id }])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([appointment_row(appointment_id, doctor_id)])),
        )
        .mount(&mock_server)
        .await;

    let service = BookingService::new(&test_config(&mock_server.uri()));
    let appointment = service
        .book(booking_request(&doctor_id.to_string(), "9876543210"))
        .await
        .unwrap();

    assert_eq!(appointment.id, appointment_id);
    assert_eq!(appointment.doctor_id, doctor_id);
    assert_eq!(appointment.doctor_name, "Dr. Asha Mehta");
    assert_eq!(appointment.shift, Shift::Morning);
}

// ==============================================================================
// QUEUE LISTING
// ==============================================================================

#[tokio::test]
async fn the_queue_request_is_ordered_and_date_filtered() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    // No fallback mock: the request only succeeds when it carries the
    // doctor filter, the date filter, and the date-then-shift ordering.
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctorId", format!("eq.{}", doctor_id)))
        .and(query_param("date", "eq.2025-09-01"))
        .and(query_param("order", "date.asc,shift.asc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([appointment_row(Uuid::new_v4(), doctor_id)])),
        )
        .mount(&mock_server)
        .await;

    let service = BookingService::new(&test_config(&mock_server.uri()));
    let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
    let appointments = service.list_for_doctor(doctor_id, Some(date)).await.unwrap();

    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0].doctor_id, doctor_id);
}

#[tokio::test]
async fn an_unfiltered_queue_request_is_still_ordered() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctorId", format!("eq.{}", doctor_id)))
        .and(query_param("order", "date.asc,shift.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = BookingService::new(&test_config(&mock_server.uri()));
    let appointments = service.list_for_doctor(doctor_id, None).await.unwrap();

    assert!(appointments.is_empty());
}

// ==============================================================================
// MALFORMED PATH AND QUERY INPUT
// ==============================================================================

#[tokio::test]
async fn a_malformed_appointment_id_is_rejected() {
    let err = handlers::delete_appointment(
        State(Arc::new(test_config("http://storage.invalid"))),
        Extension(test_doctor_identity(&Uuid::new_v4().to_string())),
        Path("abc".to_string()),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::Validation(_));
}

#[tokio::test]
async fn a_malformed_queue_date_is_rejected() {
    let err = handlers::doctor_queue(
        State(Arc::new(test_config("http://storage.invalid"))),
        Path(Uuid::new_v4().to_string()),
        Query(AppointmentDateFilter {
            date: Some("not-a-date".to_string()),
        }),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::Validation(_));
}

#[tokio::test]
async fn a_malformed_queue_doctor_id_is_rejected() {
    let err = handlers::doctor_queue(
        State(Arc::new(test_config("http://storage.invalid"))),
        Path("abc".to_string()),
        Query(AppointmentDateFilter::default()),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::Validation(_));
}

// ==============================================================================
// DELETION OWNERSHIP
// ==============================================================================

#[tokio::test]
async fn the_owning_doctor_can_delete_an_appointment() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let appointment_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([appointment_row(appointment_id, doctor_id)])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let service = BookingService::new(&test_config(&mock_server.uri()));
    let identity = test_doctor_identity(&doctor_id.to_string());

    assert!(service.delete(appointment_id, &identity).await.is_ok());
}

#[tokio::test]
async fn another_doctor_cannot_delete_the_appointment() {
    let mock_server = MockServer::start().await;
    let appointment_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([appointment_row(appointment_id, Uuid::new_v4())])),
        )
        .mount(&mock_server)
        .await;

    let service = BookingService::new(&test_config(&mock_server.uri()));
    let identity = test_doctor_identity(&Uuid::new_v4().to_string());

    let err = service.delete(appointment_id, &identity).await.unwrap_err();
    assert_matches!(err, AppError::Forbidden(_));
}

#[tokio::test]
async fn deleting_an_unknown_appointment_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = BookingService::new(&test_config(&mock_server.uri()));
    let identity = test_doctor_identity(&Uuid::new_v4().to_string());

    let err = service
        .delete(Uuid::new_v4(), &identity)
        .await
        .unwrap_err();
    assert_matches!(err, AppError::NotFound(_));
}
