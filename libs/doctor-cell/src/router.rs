use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", get(handlers::search_doctors).post(handlers::create_doctor))
        .route("/cities", get(handlers::list_cities))
        .route("/specialties", get(handlers::list_specialties))
        .route("/login", post(handlers::login))
        .route(
            "/{id}",
            get(handlers::get_doctor)
                .put(handlers::update_doctor)
                .delete(handlers::delete_doctor),
        )
        .route("/{id}/unavailable-dates", get(handlers::list_unavailable_dates))
        .route("/{id}/available-dates", get(handlers::available_dates))
        .route(
            "/{id}/available-dates/{date}/shifts",
            get(handlers::shifts_for_date),
        );

    // Doctor-owned mutations (server-verified identity required)
    let protected_routes = Router::new()
        .route("/{id}/toggle-status", post(handlers::toggle_status))
        .route("/{id}/unavailable-dates", post(handlers::add_unavailable_dates))
        .route(
            "/{id}/unavailable-dates/{date_id}",
            delete(handlers::remove_unavailable_dates),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
