use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AuthDoctor;
use shared_models::error::AppError;
use shared_utils::extractor::{assert_owner, AppJson};
use shared_utils::jwt::create_token;

use crate::models::{
    CreateDoctorRequest, CreateUnavailabilityRequest, DoctorProfile, DoctorSearchFilters,
    DoctorSummary, LoginRequest, LoginResponse, UnavailabilityRange, UpdateDoctorRequest,
};
use crate::services::{
    availability, doctor::DoctorService, unavailability::UnavailabilityService,
};

// Path parameters arrive as raw strings so a malformed id yields the API's
// own 400 message instead of a path-rejection response.

fn parse_doctor_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::Validation("Invalid doctor ID format".to_string()))
}

fn parse_range_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::Validation("Invalid date range ID format".to_string()))
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format, expected YYYY-MM-DD".to_string()))
}

// ==============================================================================
// DIRECTORY (PUBLIC)
// ==============================================================================

#[axum::debug_handler]
pub async fn search_doctors(
    State(state): State<Arc<AppConfig>>,
    Query(filters): Query<DoctorSearchFilters>,
) -> Result<Json<Vec<DoctorProfile>>, AppError> {
    let doctor_service = DoctorService::new(&state);
    let doctors = doctor_service.search_doctors(filters).await?;
    Ok(Json(doctors))
}

#[axum::debug_handler]
pub async fn list_cities(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Vec<String>>, AppError> {
    let doctor_service = DoctorService::new(&state);
    Ok(Json(doctor_service.list_cities().await?))
}

#[axum::debug_handler]
pub async fn list_specialties(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Vec<String>>, AppError> {
    let doctor_service = DoctorService::new(&state);
    Ok(Json(doctor_service.list_specialties().await?))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<DoctorProfile>, AppError> {
    let doctor_id = parse_doctor_id(&doctor_id)?;

    let doctor_service = DoctorService::new(&state);
    let doctor = doctor_service.get_doctor(doctor_id).await?;
    Ok(Json(doctor.into()))
}

// ==============================================================================
// ROSTER MANAGEMENT
// ==============================================================================

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppConfig>>,
    AppJson(request): AppJson<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<DoctorProfile>), AppError> {
    let doctor_service = DoctorService::new(&state);
    let doctor = doctor_service.create_doctor(request).await?;
    Ok((StatusCode::CREATED, Json(doctor)))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
    AppJson(request): AppJson<UpdateDoctorRequest>,
) -> Result<Json<DoctorProfile>, AppError> {
    let doctor_id = parse_doctor_id(&doctor_id)?;

    let doctor_service = DoctorService::new(&state);
    let doctor = doctor_service.update_doctor(doctor_id, request).await?;
    Ok(Json(doctor))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = parse_doctor_id(&doctor_id)?;

    let doctor_service = DoctorService::new(&state);
    doctor_service.delete_doctor(doctor_id).await?;
    Ok(Json(json!({ "message": "Doctor deleted successfully" })))
}

// ==============================================================================
// AUTHENTICATION
// ==============================================================================

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppConfig>>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let doctor_service = DoctorService::new(&state);
    let doctor = doctor_service.login(request).await?;

    let token = create_token(
        &doctor.id.to_string(),
        &doctor.personal_details.name,
        &state.jwt_secret,
    )
    .map_err(AppError::Internal)?;

    Ok(Json(LoginResponse {
        token,
        doctor: DoctorSummary {
            id: doctor.id,
            name: doctor.personal_details.name,
            specialty: doctor.practice_details.specialty,
        },
    }))
}

// ==============================================================================
// DOCTOR-OWNED MUTATIONS (TOKEN REQUIRED)
// ==============================================================================

#[axum::debug_handler]
pub async fn toggle_status(
    State(state): State<Arc<AppConfig>>,
    Extension(identity): Extension<AuthDoctor>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = parse_doctor_id(&doctor_id)?;
    assert_owner(&identity, &doctor_id.to_string())?;

    let doctor_service = DoctorService::new(&state);
    let is_online = doctor_service.toggle_status(doctor_id).await?;

    Ok(Json(json!({
        "message": format!("Doctor is now {}", if is_online { "online" } else { "offline" }),
        "isOnline": is_online
    })))
}

#[axum::debug_handler]
pub async fn list_unavailable_dates(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Vec<UnavailabilityRange>>, AppError> {
    let doctor_id = parse_doctor_id(&doctor_id)?;

    let unavailability_service = UnavailabilityService::new(&state);
    Ok(Json(unavailability_service.list(doctor_id).await?))
}

#[axum::debug_handler]
pub async fn add_unavailable_dates(
    State(state): State<Arc<AppConfig>>,
    Extension(identity): Extension<AuthDoctor>,
    Path(doctor_id): Path<String>,
    AppJson(request): AppJson<CreateUnavailabilityRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let doctor_id = parse_doctor_id(&doctor_id)?;
    assert_owner(&identity, &doctor_id.to_string())?;

    let unavailability_service = UnavailabilityService::new(&state);
    let ledger = unavailability_service.add(doctor_id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Unavailable dates added successfully",
            "unavailableDates": ledger
        })),
    ))
}

#[axum::debug_handler]
pub async fn remove_unavailable_dates(
    State(state): State<Arc<AppConfig>>,
    Extension(identity): Extension<AuthDoctor>,
    Path((doctor_id, range_id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = parse_doctor_id(&doctor_id)?;
    let range_id = parse_range_id(&range_id)?;
    assert_owner(&identity, &doctor_id.to_string())?;

    let unavailability_service = UnavailabilityService::new(&state);
    let ledger = unavailability_service.remove(doctor_id, range_id).await?;

    Ok(Json(json!({
        "message": "Unavailable date range deleted successfully",
        "unavailableDates": ledger
    })))
}

// ==============================================================================
// AVAILABILITY RESOLUTION (PUBLIC)
// ==============================================================================

#[axum::debug_handler]
pub async fn available_dates(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = parse_doctor_id(&doctor_id)?;

    let doctor_service = DoctorService::new(&state);
    let doctor = doctor_service.get_doctor(doctor_id).await?;

    let days = availability::bookable_days(
        &doctor.practice_details.schedule,
        &doctor.practice_details.unavailable_dates,
        Utc::now().date_naive(),
    );

    Ok(Json(json!({
        "doctorId": doctor_id,
        "availableDates": days
    })))
}

#[axum::debug_handler]
pub async fn shifts_for_date(
    State(state): State<Arc<AppConfig>>,
    Path((doctor_id, date)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = parse_doctor_id(&doctor_id)?;
    let date = parse_date(&date)?;

    let doctor_service = DoctorService::new(&state);
    let doctor = doctor_service.get_doctor(doctor_id).await?;

    let shifts = availability::shifts_for_date(
        &doctor.practice_details.schedule,
        &doctor.practice_details.unavailable_dates,
        date,
    );

    Ok(Json(json!({
        "date": date,
        "shifts": shifts
    })))
}
