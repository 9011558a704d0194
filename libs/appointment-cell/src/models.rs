use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use doctor_cell::models::Shift;

/// A booked slot. `doctor_name` is a display snapshot taken at booking time
/// and is never re-derived from the live doctor record. `doctor_id` is a
/// weak reference: the doctor may since have been removed from the roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub patient_name: String,
    pub patient_phone: String,
    pub date: NaiveDate,
    pub shift: Shift,
    pub created_at: DateTime<Utc>,
}

/// Raw booking payload. Everything is an optional string so malformed or
/// missing fields produce this API's own validation messages instead of a
/// body-rejection response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    #[serde(default)]
    pub doctor_id: Option<String>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub patient_phone: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub shift: Option<String>,
}

/// Booking request after field-level validation, ready to check against the
/// roster and persist.
#[derive(Debug, Clone)]
pub struct ValidatedBooking {
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub patient_name: String,
    pub patient_phone: String,
    pub date: NaiveDate,
    pub shift: Shift,
}

/// The date arrives as a raw string so a malformed value yields the API's
/// own 400 message rather than a query-rejection response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentDateFilter {
    #[serde(default)]
    pub date: Option<String>,
}
