use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::AuthDoctor;
use shared_models::error::AppError;

use crate::models::{Appointment, BookAppointmentRequest, ValidatedBooking};

/// Validates booking requests against the roster and records accepted ones.
///
/// The booking deliberately does not re-check the availability resolver's
/// candidate set; the slot the client picked is trusted once field-level
/// validation and the conflict check pass.
pub struct BookingService {
    supabase: SupabaseClient,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn book(&self, request: BookAppointmentRequest) -> Result<Appointment, AppError> {
        let booking = validate_booking(request)?;

        debug!(
            "Booking appointment with doctor {} on {} ({})",
            booking.doctor_id, booking.date, booking.shift
        );

        self.ensure_doctor_exists(booking.doctor_id).await?;
        self.ensure_slot_free(&booking).await?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            doctor_id: booking.doctor_id,
            doctor_name: booking.doctor_name,
            patient_name: booking.patient_name,
            patient_phone: booking.patient_phone,
            date: booking.date,
            shift: booking.shift,
            created_at: Utc::now(),
        };

        let row = serde_json::to_value(&appointment)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let created: Vec<Appointment> = self
            .supabase
            .insert("appointments", row)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let created = created
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Database("Failed to book appointment".to_string()))?;

        info!("Appointment {} booked", created.id);
        Ok(created)
    }

    /// A doctor's queue, ordered by date then shift, optionally narrowed to
    /// one date.
    pub async fn list_for_doctor(
        &self,
        doctor_id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Appointment>, AppError> {
        let mut path = format!("/rest/v1/appointments?doctorId=eq.{}", doctor_id);
        if let Some(date) = date {
            path.push_str(&format!("&date=eq.{}", date));
        }
        path.push_str("&order=date.asc,shift.asc");

        self.supabase
            .select(&path)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Only the owning doctor may delete an appointment; ownership comes
    /// from the verified token identity, never from the request body.
    pub async fn delete(
        &self,
        appointment_id: Uuid,
        identity: &AuthDoctor,
    ) -> Result<(), AppError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let appointments: Vec<Appointment> = self
            .supabase
            .select(&path)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let appointment = appointments
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

        if appointment.doctor_id.to_string() != identity.id {
            return Err(AppError::Forbidden(
                "Unauthorized to delete this appointment".to_string(),
            ));
        }

        self.supabase
            .delete(&path)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(
            "Appointment {} deleted by doctor {}",
            appointment_id, identity.id
        );
        Ok(())
    }

    async fn ensure_doctor_exists(&self, doctor_id: Uuid) -> Result<(), AppError> {
        let path = format!("/rest/v1/doctors?id=eq.{}&select=id", doctor_id);
        let rows: Vec<Value> = self
            .supabase
            .select(&path)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if rows.is_empty() {
            return Err(AppError::NotFound("Doctor not found".to_string()));
        }
        Ok(())
    }

    /// Best-effort slot uniqueness: a read-then-insert check, so two truly
    /// concurrent requests can still race past it. A database-level unique
    /// index on (doctorId, date, shift) closes that window.
    async fn ensure_slot_free(&self, booking: &ValidatedBooking) -> Result<(), AppError> {
        let path = format!(
            "/rest/v1/appointments?doctorId=eq.{}&date=eq.{}&shift=eq.{}",
            booking.doctor_id, booking.date, booking.shift
        );
        let existing: Vec<Value> = self
            .supabase
            .select(&path)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !existing.is_empty() {
            return Err(AppError::Conflict(
                "This time slot is already booked".to_string(),
            ));
        }
        Ok(())
    }
}

/// Field-level validation: presence of every field, a 10-digit phone
/// number, and well-formed id/date/shift values.
pub fn validate_booking(request: BookAppointmentRequest) -> Result<ValidatedBooking, AppError> {
    let doctor_id = non_empty(request.doctor_id)?;
    let doctor_name = non_empty(request.doctor_name)?;
    let patient_name = non_empty(request.patient_name)?;
    let patient_phone = non_empty(request.patient_phone)?;
    let date = non_empty(request.date)?;
    let shift = non_empty(request.shift)?;

    if patient_phone.len() != 10 || !patient_phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Please enter a valid 10-digit phone number".to_string(),
        ));
    }

    let doctor_id = Uuid::parse_str(&doctor_id)
        .map_err(|_| AppError::Validation("Invalid doctor ID format".to_string()))?;

    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format, expected YYYY-MM-DD".to_string()))?;

    let shift = shift
        .parse()
        .map_err(|_| AppError::Validation("Shift must be morning or evening".to_string()))?;

    Ok(ValidatedBooking {
        doctor_id,
        doctor_name,
        patient_name,
        patient_phone,
        date,
        shift,
    })
}

fn non_empty(value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation("All fields are required".to_string())),
    }
}
