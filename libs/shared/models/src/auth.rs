use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub name: Option<String>,
    pub role: Option<String>,
    pub exp: Option<u64>,
    pub iat: Option<u64>,
}

/// Server-verified identity attached to a request by the auth middleware.
/// Ownership checks use this, never a doctor id from the request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthDoctor {
    pub id: String,
    pub name: Option<String>,
    pub role: Option<String>,
}
