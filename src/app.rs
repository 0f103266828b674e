use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/activities",
            get(handlers::list_activities).post(handlers::add_activity),
        )
        .route("/api/activities/:id", delete(handlers::delete_activity))
        .route("/api/goals", get(handlers::list_goals))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .with_state(state)
}
