use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::error::AppError;

use crate::models::{CreateUnavailabilityRequest, Doctor, UnavailabilityRange};

/// Manages a doctor's unavailability ledger: explicit closed date ranges
/// stored inside the doctor record. Ranges are created and deleted, never
/// updated in place.
pub struct UnavailabilityService {
    supabase: SupabaseClient,
}

impl UnavailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list(&self, doctor_id: Uuid) -> Result<Vec<UnavailabilityRange>, AppError> {
        let doctor = self.fetch_doctor(doctor_id).await?;
        Ok(doctor.practice_details.unavailable_dates)
    }

    pub async fn add(
        &self,
        doctor_id: Uuid,
        request: CreateUnavailabilityRequest,
    ) -> Result<Vec<UnavailabilityRange>, AppError> {
        let (start_date, end_date) = match (request.start_date, request.end_date) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(AppError::Validation(
                    "Start and end dates are required".to_string(),
                ))
            }
        };

        let doctor = self.fetch_doctor(doctor_id).await?;
        let mut practice_details = doctor.practice_details;

        practice_details.unavailable_dates.push(UnavailabilityRange {
            id: Uuid::new_v4(),
            start_date,
            end_date,
            reason: request
                .reason
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| "Unavailable".to_string()),
        });

        let ledger = practice_details.unavailable_dates.clone();
        self.store_practice_details(doctor_id, &practice_details).await?;

        info!(
            "Added unavailable range {} - {} for doctor {}",
            start_date, end_date, doctor_id
        );
        Ok(ledger)
    }

    pub async fn remove(
        &self,
        doctor_id: Uuid,
        range_id: Uuid,
    ) -> Result<Vec<UnavailabilityRange>, AppError> {
        let doctor = self.fetch_doctor(doctor_id).await?;
        let mut practice_details = doctor.practice_details;

        if !practice_details
            .unavailable_dates
            .iter()
            .any(|range| range.id == range_id)
        {
            return Err(AppError::NotFound(
                "Unavailable date range not found".to_string(),
            ));
        }

        practice_details
            .unavailable_dates
            .retain(|range| range.id != range_id);

        let ledger = practice_details.unavailable_dates.clone();
        self.store_practice_details(doctor_id, &practice_details).await?;

        debug!("Removed unavailable range {} for doctor {}", range_id, doctor_id);
        Ok(ledger)
    }

    async fn fetch_doctor(&self, doctor_id: Uuid) -> Result<Doctor, AppError> {
        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let doctors: Vec<Doctor> = self
            .supabase
            .select(&path)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        doctors
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))
    }

    async fn store_practice_details(
        &self,
        doctor_id: Uuid,
        practice_details: &crate::models::PracticeDetails,
    ) -> Result<(), AppError> {
        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let patch = json!({
            "practiceDetails": serde_json::to_value(practice_details)
                .map_err(|e| AppError::Internal(e.to_string()))?
        });
        let _: Vec<Value> = self
            .supabase
            .update(&path, patch)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
