use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_true() -> bool {
    true
}

fn default_reason() -> String {
    "Unavailable".to_string()
}

/// Full doctor record as stored, credentials included. Never serialized to
/// API clients directly; see [`DoctorProfile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: Uuid,
    pub personal_details: PersonalDetails,
    pub practice_details: PracticeDetails,
    pub credentials: Credentials,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub qualification: String,
    pub designation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeDetails {
    pub specialty: String,
    pub image_path: String,
    pub city: String,
    pub map_link: String,
    #[serde(default = "default_true")]
    pub is_online: bool,
    #[serde(default)]
    pub schedule: WeekSchedule,
    #[serde(default)]
    pub unavailable_dates: Vec<UnavailabilityRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub username: String,
    pub password_hash: String,
}

/// Recurring weekly availability pattern. Weekday keys are canonical
/// lowercase; the aliases absorb the mixed capitalizations found in legacy
/// records so no runtime key normalization exists downstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeekSchedule {
    #[serde(default, alias = "Monday", alias = "MONDAY")]
    pub monday: ScheduleDay,
    #[serde(default, alias = "Tuesday", alias = "TUESDAY")]
    pub tuesday: ScheduleDay,
    #[serde(default, alias = "Wednesday", alias = "WEDNESDAY")]
    pub wednesday: ScheduleDay,
    #[serde(default, alias = "Thursday", alias = "THURSDAY")]
    pub thursday: ScheduleDay,
    #[serde(default, alias = "Friday", alias = "FRIDAY")]
    pub friday: ScheduleDay,
    #[serde(default, alias = "Saturday", alias = "SATURDAY")]
    pub saturday: ScheduleDay,
    #[serde(default, alias = "Sunday", alias = "SUNDAY")]
    pub sunday: ScheduleDay,
}

impl WeekSchedule {
    pub fn day(&self, weekday: Weekday) -> &ScheduleDay {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }
}

/// One weekday's template. The `*_hours` strings are display-only and play
/// no part in slot computation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDay {
    #[serde(default)]
    pub morning: bool,
    #[serde(default)]
    pub morning_hours: String,
    #[serde(default)]
    pub evening: bool,
    #[serde(default)]
    pub evening_hours: String,
}

impl ScheduleDay {
    pub fn has_any_shift(&self) -> bool {
        self.morning || self.evening
    }
}

/// A closed date range in a doctor's unavailability ledger. Bounds are
/// inclusive calendar dates; a range with `start_date > end_date` is kept
/// as-is and simply never matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailabilityRange {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_reason")]
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Morning,
    Evening,
}

impl Shift {
    pub fn label(&self) -> &'static str {
        match self {
            Shift::Morning => "Morning",
            Shift::Evening => "Evening",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::Morning => "morning",
            Shift::Evening => "evening",
        }
    }
}

impl std::fmt::Display for Shift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Shift {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(Shift::Morning),
            "evening" => Ok(Shift::Evening),
            _ => Err(()),
        }
    }
}

/// One bookable calendar day emitted by the availability resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookableDay {
    pub date: NaiveDate,
    pub weekday_label: String,
    pub display_date: String,
}

/// A shift offered on a specific bookable day, paired with its display hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftOffer {
    pub shift: Shift,
    pub label: String,
    pub hours: String,
}

// ==============================================================================
// REQUEST / RESPONSE DTOS
// ==============================================================================

/// Doctor as seen by API clients: the stored record minus credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfile {
    pub id: Uuid,
    pub personal_details: PersonalDetails,
    pub practice_details: PracticeDetails,
}

impl From<Doctor> for DoctorProfile {
    fn from(doctor: Doctor) -> Self {
        Self {
            id: doctor.id,
            personal_details: doctor.personal_details,
            practice_details: doctor.practice_details,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoctorSearchFilters {
    pub city: Option<String>,
    pub specialty: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlainCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctorRequest {
    pub personal_details: PersonalDetails,
    pub practice_details: PracticeDetails,
    pub credentials: PlainCredentials,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCredentials {
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctorRequest {
    pub personal_details: PersonalDetails,
    pub practice_details: PracticeDetails,
    pub credentials: UpdateCredentials,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub doctor: DoctorSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorSummary {
    pub id: Uuid,
    pub name: String,
    pub specialty: String,
}

/// Dates arrive as optional strings so a missing field yields the API's own
/// 400 message rather than a body-rejection error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnavailabilityRequest {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub reason: Option<String>,
}
