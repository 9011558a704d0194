use std::sync::Arc;

use assert_matches::assert_matches;
use axum::body::to_bytes;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::handlers;
use doctor_cell::models::{CreateUnavailabilityRequest, DoctorSearchFilters, LoginRequest};
use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::extractor::AppJson;
use shared_utils::jwt::validate_token;
use shared_utils::password::hash_password;
use shared_utils::test_utils::{test_doctor_identity, TestConfig, TEST_JWT_SECRET};

fn test_config(storage_url: &str) -> Arc<AppConfig> {
    Arc::new(TestConfig::with_storage_url(storage_url).to_app_config())
}

fn doctor_row(id: Uuid, username: &str, password_hash: &str) -> serde_json::Value {
    json!({
        "id": id,
        "personalDetails": {
            "name": "Dr. Asha Mehta",
            "phone": "9876543210",
            "address": "12 Lake Road, Pune",
            "qualification": "MBBS, MD",
            "designation": "Consultant Physician"
        },
        "practiceDetails": {
            "specialty": "Cardiology",
            "imagePath": "/images/asha-mehta.jpg",
            "city": "Pune",
            "mapLink": "https://maps.example.com/asha-mehta",
            "isOnline": true,
            "schedule": {
                "monday": { "morning": true, "morningHours": "9 AM - 12 PM" }
            },
            "unavailableDates": []
        },
        "credentials": { "username": username, "passwordHash": password_hash }
    })
}

#[tokio::test]
async fn search_returns_directory_profiles() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([doctor_row(doctor_id, "asha", "hash")])),
        )
        .mount(&mock_server)
        .await;

    let filters = DoctorSearchFilters {
        city: Some("Pune".to_string()),
        specialty: None,
        name: Some("mehta".to_string()),
    };
    let Json(profiles) =
        handlers::search_doctors(State(test_config(&mock_server.uri())), Query(filters))
            .await
            .unwrap();

    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].id, doctor_id);
    assert_eq!(profiles[0].personal_details.name, "Dr. Asha Mehta");
    assert_eq!(profiles[0].practice_details.city, "Pune");
}

#[tokio::test]
async fn login_issues_a_verifiable_token() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let password_hash = hash_password("letmein123").unwrap();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([doctor_row(doctor_id, "asha", &password_hash)])),
        )
        .mount(&mock_server)
        .await;

    let request = LoginRequest {
        username: "asha".to_string(),
        password: "letmein123".to_string(),
    };
    let Json(response) = handlers::login(State(test_config(&mock_server.uri())), AppJson(request))
        .await
        .unwrap();

    assert_eq!(response.doctor.id, doctor_id);
    assert_eq!(response.doctor.specialty, "Cardiology");

    let identity = validate_token(&response.token, TEST_JWT_SECRET).unwrap();
    assert_eq!(identity.id, doctor_id.to_string());
    assert_eq!(identity.role.as_deref(), Some("doctor"));
}

#[tokio::test]
async fn login_rejects_a_wrong_password() {
    let mock_server = MockServer::start().await;
    let password_hash = hash_password("letmein123").unwrap();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([doctor_row(Uuid::new_v4(), "asha", &password_hash)])),
        )
        .mount(&mock_server)
        .await;

    let request = LoginRequest {
        username: "asha".to_string(),
        password: "wrong-password".to_string(),
    };
    let err = handlers::login(State(test_config(&mock_server.uri())), AppJson(request))
        .await
        .unwrap_err();

    assert_matches!(err, AppError::Auth(_));
}

#[tokio::test]
async fn a_malformed_doctor_id_is_rejected_with_a_json_message() {
    let err = handlers::get_doctor(
        State(test_config("http://storage.invalid")),
        Path("abc".to_string()),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::Validation(_));

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], json!("Invalid doctor ID format"));
}

#[tokio::test]
async fn a_malformed_shift_date_is_rejected() {
    let err = handlers::shifts_for_date(
        State(test_config("http://storage.invalid")),
        Path((Uuid::new_v4().to_string(), "not-a-date".to_string())),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::Validation(_));
}

#[tokio::test]
async fn toggle_status_by_another_doctor_is_forbidden() {
    let state = test_config("http://storage.invalid");
    let doctor_id = Uuid::new_v4();

    let err = handlers::toggle_status(
        State(state),
        Extension(test_doctor_identity(&Uuid::new_v4().to_string())),
        Path(doctor_id.to_string()),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::Forbidden(_));
}

#[tokio::test]
async fn toggle_status_flips_is_online() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([doctor_row(doctor_id, "asha", "hash")])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/doctors"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([doctor_row(doctor_id, "asha", "hash")])),
        )
        .mount(&mock_server)
        .await;

    let Json(body) = handlers::toggle_status(
        State(test_config(&mock_server.uri())),
        Extension(test_doctor_identity(&doctor_id.to_string())),
        Path(doctor_id.to_string()),
    )
    .await
    .unwrap();

    // The mocked row starts online, so the toggle reports offline.
    assert_eq!(body["isOnline"], json!(false));
}

#[tokio::test]
async fn adding_unavailable_dates_requires_both_bounds() {
    let state = test_config("http://storage.invalid");
    let doctor_id = Uuid::new_v4();

    let request = CreateUnavailabilityRequest {
        start_date: None,
        end_date: None,
        reason: Some("Conference".to_string()),
    };
    let err = handlers::add_unavailable_dates(
        State(state),
        Extension(test_doctor_identity(&doctor_id.to_string())),
        Path(doctor_id.to_string()),
        AppJson(request),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::Validation(_));
}

#[tokio::test]
async fn removing_an_unknown_unavailable_range_is_not_found() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([doctor_row(doctor_id, "asha", "hash")])),
        )
        .mount(&mock_server)
        .await;

    let err = handlers::remove_unavailable_dates(
        State(test_config(&mock_server.uri())),
        Extension(test_doctor_identity(&doctor_id.to_string())),
        Path((doctor_id.to_string(), Uuid::new_v4().to_string())),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::NotFound(_));
}

#[tokio::test]
async fn available_dates_only_cover_scheduled_weekdays() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([doctor_row(doctor_id, "asha", "hash")])),
        )
        .mount(&mock_server)
        .await;

    let Json(body) = handlers::available_dates(
        State(test_config(&mock_server.uri())),
        Path(doctor_id.to_string()),
    )
    .await
    .unwrap();

    let days = body["availableDates"].as_array().unwrap();
    assert!(!days.is_empty());
    assert!(days
        .iter()
        .all(|day| day["weekdayLabel"] == json!("Monday")));
}
