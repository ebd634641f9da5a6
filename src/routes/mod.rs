pub mod applications;
pub mod health;
pub mod profile_links;
pub mod sessions;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

/// Every route of the service, without middleware layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/applications/:id/detail",
            get(applications::get_application_detail),
        )
        .route("/api/statuses", get(applications::list_statuses))
        .route("/api/sessions", post(sessions::open_session))
        .route(
            "/api/sessions/:id",
            get(sessions::get_session).delete(sessions::close_session),
        )
        .route("/api/sessions/:id/reload", post(sessions::reload_session))
        .route(
            "/api/sessions/:id/status",
            axum::routing::patch(sessions::update_session_status),
        )
        .route(
            "/api/profile-links",
            get(profile_links::resolve_profile_link),
        )
        .with_state(state)
}
