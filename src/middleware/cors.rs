use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// Mobile clients call from any origin; only the verbs the API serves are
/// allowed.
pub fn api_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(Any)
}
