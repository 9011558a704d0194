use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    // Booking is patient-facing and unauthenticated; deletion is a
    // doctor-owned mutation.
    let public_routes = Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/doctor/{doctor_id}", get(handlers::list_doctor_appointments));

    let protected_routes = Router::new()
        .route("/{id}", delete(handlers::delete_appointment))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

/// Routes mounted under `/api/doctors`, kept here because they serve
/// appointment data.
pub fn doctor_appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/{id}/appointments", get(handlers::doctor_queue))
        .with_state(state)
}
