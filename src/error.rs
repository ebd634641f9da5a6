use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Session not found: {0}")]
    SessionNotFound(uuid::Uuid),

    #[error("Application details are not loaded; the status cannot be updated")]
    NotLoaded,

    #[error("A status update is already in progress for this application")]
    Busy,

    #[error("Could not load the application details: {0}")]
    FetchFailed(#[source] StoreError),

    #[error("Could not update the application status: {0}")]
    UpdateFailed(#[source] StoreError),

    #[error("Could not open the {network} profile. Please check that the link \"{input}\" is correct")]
    LinkUnavailable { network: String, input: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            Error::InvalidInput(_)
            | Error::BadRequest(_)
            | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) | Error::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Error::NotLoaded | Error::Busy => StatusCode::CONFLICT,
            Error::FetchFailed(_) | Error::UpdateFailed(_) => StatusCode::BAD_GATEWAY,
            Error::LinkUnavailable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let error_message = match &self {
            Error::Config(_) | Error::Database(_) | Error::Migrate(_) => {
                tracing::error!(error = %self, "request failed");
                "An unexpected error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
