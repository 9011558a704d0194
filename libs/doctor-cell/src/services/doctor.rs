use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::error::AppError;
use shared_utils::password::{hash_password, verify_password};

use crate::models::{
    CreateDoctorRequest, Doctor, DoctorProfile, DoctorSearchFilters, LoginRequest,
    UpdateDoctorRequest,
};

pub struct DoctorService {
    supabase: SupabaseClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Directory search: exact city/specialty match, case-insensitive
    /// substring on the doctor's name. Offline doctors are included so they
    /// still appear in the directory.
    pub async fn search_doctors(
        &self,
        filters: DoctorSearchFilters,
    ) -> Result<Vec<DoctorProfile>, AppError> {
        let mut path = String::from("/rest/v1/doctors?select=*");

        if let Some(city) = filters.city.as_deref().filter(|c| !c.is_empty()) {
            path.push_str(&format!(
                "&practiceDetails->>city=eq.{}",
                urlencoding::encode(city)
            ));
        }
        if let Some(specialty) = filters.specialty.as_deref().filter(|s| !s.is_empty()) {
            path.push_str(&format!(
                "&practiceDetails->>specialty=eq.{}",
                urlencoding::encode(specialty)
            ));
        }
        if let Some(name) = filters.name.as_deref().filter(|n| !n.is_empty()) {
            path.push_str(&format!(
                "&personalDetails->>name=ilike.*{}*",
                urlencoding::encode(name)
            ));
        }

        debug!("Searching doctors: {}", path);
        let doctors: Vec<Doctor> = self
            .supabase
            .select(&path)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(doctors.into_iter().map(DoctorProfile::from).collect())
    }

    pub async fn list_cities(&self) -> Result<Vec<String>, AppError> {
        self.distinct_practice_field("city").await
    }

    pub async fn list_specialties(&self) -> Result<Vec<String>, AppError> {
        self.distinct_practice_field("specialty").await
    }

    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, AppError> {
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

    pub async fn create_doctor(
        &self,
        request: CreateDoctorRequest,
    ) -> Result<DoctorProfile, AppError> {
        debug!("Creating doctor: {}", request.personal_details.name);

        if self
            .find_by_username(&request.credentials.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        let password_hash =
            hash_password(&request.credentials.password).map_err(AppError::Internal)?;

        let doctor = Doctor {
            id: Uuid::new_v4(),
            personal_details: request.personal_details,
            practice_details: request.practice_details,
            credentials: crate::models::Credentials {
                username: request.credentials.username,
                password_hash,
            },
        };

        let row = serde_json::to_value(&doctor)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let created: Vec<Doctor> = self
            .supabase
            .insert("doctors", row)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let created = created
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Database("Failed to create doctor".to_string()))?;

        info!("Doctor created with ID: {}", created.id);
        Ok(created.into())
    }

    /// Full-record update. The password is re-hashed only when a new one is
    /// supplied; otherwise the stored hash is carried over.
    pub async fn update_doctor(
        &self,
        doctor_id: Uuid,
        request: UpdateDoctorRequest,
    ) -> Result<DoctorProfile, AppError> {
        let existing = self.get_doctor(doctor_id).await?;

        let password_hash = match request.credentials.password.as_deref() {
            Some(password) if !password.is_empty() => {
                hash_password(password).map_err(AppError::Internal)?
            }
            _ => existing.credentials.password_hash,
        };

        let updated = Doctor {
            id: doctor_id,
            personal_details: request.personal_details,
            practice_details: request.practice_details,
            credentials: crate::models::Credentials {
                username: request.credentials.username,
                password_hash,
            },
        };

        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let patch = serde_json::to_value(&updated)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let rows: Vec<Doctor> = self
            .supabase
            .update(&path, patch)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .next()
            .map(DoctorProfile::from)
            .ok_or_else(|| AppError::Database("Failed to update doctor".to_string()))
    }

    /// Deletes the roster entry. Existing appointments keep their doctorId
    /// snapshot; no referential cleanup happens here.
    pub async fn delete_doctor(&self, doctor_id: Uuid) -> Result<(), AppError> {
        self.get_doctor(doctor_id).await?;

        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        self.supabase
            .delete(&path)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!("Doctor deleted: {}", doctor_id);
        Ok(())
    }

    pub async fn toggle_status(&self, doctor_id: Uuid) -> Result<bool, AppError> {
        let doctor = self.get_doctor(doctor_id).await?;

        let mut practice_details = doctor.practice_details;
        practice_details.is_online = !practice_details.is_online;
        let new_status = practice_details.is_online;

        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let patch = json!({
            "practiceDetails": serde_json::to_value(&practice_details)
                .map_err(|e| AppError::Internal(e.to_string()))?
        });
        let _: Vec<Value> = self
            .supabase
            .update(&path, patch)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        debug!("Doctor {} is now {}", doctor_id, if new_status { "online" } else { "offline" });
        Ok(new_status)
    }

    /// Credential check. Both "unknown username" and "wrong password"
    /// surface the same message so the response does not leak which half
    /// failed.
    pub async fn login(&self, request: LoginRequest) -> Result<Doctor, AppError> {
        debug!("Doctor login attempt for username: {}", request.username);

        let doctor = self
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| AppError::Auth("Invalid credentials".to_string()))?;

        if !verify_password(&request.password, &doctor.credentials.password_hash) {
            return Err(AppError::Auth("Invalid credentials".to_string()));
        }

        info!("Doctor login successful: {}", doctor.id);
        Ok(doctor)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Doctor>, AppError> {
        let path = format!(
            "/rest/v1/doctors?credentials->>username=eq.{}",
            urlencoding::encode(username)
        );
        let doctors: Vec<Doctor> = self
            .supabase
            .select(&path)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(doctors.into_iter().next())
    }

    async fn distinct_practice_field(&self, field: &str) -> Result<Vec<String>, AppError> {
        let path = "/rest/v1/doctors?select=practiceDetails";
        let rows: Vec<Value> = self
            .supabase
            .select(path)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut values: Vec<String> = rows
            .iter()
            .filter_map(|row| row["practiceDetails"][field].as_str())
            .map(|v| v.to_string())
            .collect();
        values.sort();
        values.dedup();

        Ok(values)
    }
}
