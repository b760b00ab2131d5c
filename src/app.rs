use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/refresh", post(handlers::refresh))
        .route("/tanks", post(handlers::create_tank))
        .route("/tanks/new", post(handlers::show_create_tank))
        .route("/tanks/new/cancel", post(handlers::cancel_create_tank))
        .route("/tanks/:id/toggle", post(handlers::toggle_tank))
        .route("/tanks/:id/parameters", post(handlers::create_parameter))
        .route("/tanks/:id/parameters/toggle", post(handlers::toggle_parameter_form))
        .route("/tanks/:id/parameters/cancel", post(handlers::cancel_parameter_form))
        .route("/tanks/:id/water-changes", post(handlers::create_water_change))
        .route("/tanks/:id/water-changes/toggle", post(handlers::toggle_water_change_form))
        .route("/tanks/:id/water-changes/cancel", post(handlers::cancel_water_change_form))
        .route("/auth/sign-in", post(handlers::sign_in))
        .route("/auth/sign-out", post(handlers::sign_out))
        .route("/api/view", get(handlers::get_view))
        .route("/api/refresh", post(handlers::api_refresh))
        .with_state(state)
}
