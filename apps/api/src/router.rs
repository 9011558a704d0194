use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::{appointment_routes, doctor_appointment_routes};
use doctor_cell::router::doctor_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "DocFinder API is running!" }))
        .nest("/api/doctors", doctor_routes(state.clone()))
        .nest("/api/doctors", doctor_appointment_routes(state.clone()))
        .nest("/api/appointments", appointment_routes(state))
}
