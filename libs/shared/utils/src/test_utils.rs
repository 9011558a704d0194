//! Helpers shared by the per-cell test suites.

use shared_config::AppConfig;
use shared_models::auth::AuthDoctor;

use crate::jwt::create_token;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

#[derive(Debug, Clone)]
pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub jwt_secret: String,
}

impl TestConfig {
    /// Config pointing at a wiremock server standing in for PostgREST.
    pub fn with_storage_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            jwt_secret: TEST_JWT_SECRET.to_string(),
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            port: 0,
        }
    }
}

pub fn test_doctor_identity(doctor_id: &str) -> AuthDoctor {
    AuthDoctor {
        id: doctor_id.to_string(),
        name: Some("Dr. Test".to_string()),
        role: Some("doctor".to_string()),
    }
}

pub fn test_doctor_token(doctor_id: &str) -> String {
    create_token(doctor_id, "Dr. Test", TEST_JWT_SECRET)
        .expect("failed to sign test token")
}
