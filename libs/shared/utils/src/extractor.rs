use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequest, State},
    http::Request,
    middleware::Next,
    response::Response,
    Json,
};
use serde::de::DeserializeOwned;

use shared_config::AppConfig;
use shared_models::auth::AuthDoctor;
use shared_models::error::AppError;

use crate::jwt::validate_token;

/// Middleware guarding doctor-owned mutations. Validates the bearer token and
/// attaches the resulting identity as a request extension.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    let token = &auth_value[7..];

    let identity = validate_token(token, &config.jwt_secret).map_err(AppError::Auth)?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Ownership check for doctor-owned resources: the authenticated doctor must
/// be the doctor named in the path.
pub fn assert_owner(identity: &AuthDoctor, doctor_id: &str) -> Result<(), AppError> {
    if identity.id != doctor_id {
        return Err(AppError::Forbidden(
            "You do not have access to this doctor's resources".to_string(),
        ));
    }
    Ok(())
}

/// Json body extractor whose rejection is an [`AppError`], so a malformed
/// body produces the same `{ "message": ... }` shape as every other error
/// response instead of axum's plain-text rejection.
#[derive(Debug)]
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(AppError::Validation(rejection.body_text())),
        }
    }
}
