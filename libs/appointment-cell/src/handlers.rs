use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AuthDoctor;
use shared_models::error::AppError;
use shared_utils::extractor::AppJson;

use crate::models::{Appointment, AppointmentDateFilter, BookAppointmentRequest};
use crate::services::booking::BookingService;

// Path parameters arrive as raw strings so a malformed id yields the API's
// own 400 message instead of a path-rejection response.

fn parse_doctor_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::Validation("Invalid doctor ID format".to_string()))
}

fn parse_appointment_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::Validation("Invalid appointment ID format".to_string()))
}

fn parse_date_filter(filter: AppointmentDateFilter) -> Result<Option<NaiveDate>, AppError> {
    match filter.date.as_deref().filter(|d| !d.is_empty()) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                AppError::Validation("Invalid date format, expected YYYY-MM-DD".to_string())
            }),
        None => Ok(None),
    }
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    AppJson(request): AppJson<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let booking_service = BookingService::new(&state);
    let appointment = booking_service.book(request).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn list_doctor_appointments(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let doctor_id = parse_doctor_id(&doctor_id)?;

    let booking_service = BookingService::new(&state);
    let appointments = booking_service.list_for_doctor(doctor_id, None).await?;
    Ok(Json(appointments))
}

/// `GET /api/doctors/{id}/appointments?date=`, the doctor dashboard's queue
/// view, optionally narrowed to one day.
#[axum::debug_handler]
pub async fn doctor_queue(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
    Query(filter): Query<AppointmentDateFilter>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let doctor_id = parse_doctor_id(&doctor_id)?;
    let date = parse_date_filter(filter)?;

    let booking_service = BookingService::new(&state);
    let appointments = booking_service.list_for_doctor(doctor_id, date).await?;
    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(identity): Extension<AuthDoctor>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let appointment_id = parse_appointment_id(&appointment_id)?;

    let booking_service = BookingService::new(&state);
    booking_service.delete(appointment_id, &identity).await?;
    Ok(Json(json!({ "message": "Appointment deleted successfully" })))
}
