use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::detail_dto::{OpenSessionPayload, SessionResponse, UpdateStatusPayload, UpdateStatusResponse},
    error::Result,
    utils::time::now,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = OpenSessionPayload,
    responses(
        (status = 201, description = "Session opened and loaded", body = Json<SessionResponse>),
        (status = 400, description = "Missing identifiers"),
        (status = 404, description = "Application not found"),
        (status = 502, description = "Document store unavailable")
    )
)]
#[axum::debug_handler]
pub async fn open_session(
    State(state): State<AppState>,
    Json(payload): Json<OpenSessionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let (session_id, session) = state.sessions.open(payload.into());

    if let Err(err) = session.load(&state.detail_service).await {
        if let Err(close_err) = state.sessions.close(session_id) {
            tracing::debug!(%session_id, error = %close_err, "session already gone after failed load");
        }
        tracing::warn!(%session_id, error = %err, "detail session load failed; session closed");
        return Err(err);
    }

    tracing::info!(%session_id, application_id = %session.key().application_id, "detail session opened");
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse::build(
            session_id,
            &session,
            state.display_offset,
            state.link_opener.as_ref(),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Current view of the session", body = Json<SessionResponse>),
        (status = 404, description = "Session not found")
    )
)]
#[axum::debug_handler]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let session = state.sessions.get(id)?;
    session.touch();
    Ok(Json(SessionResponse::build(
        id,
        &session,
        state.display_offset,
        state.link_opener.as_ref(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/reload",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session reloaded", body = Json<SessionResponse>),
        (status = 404, description = "Session or application not found"),
        (status = 502, description = "Document store unavailable")
    )
)]
#[axum::debug_handler]
pub async fn reload_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let session = state.sessions.get(id)?;
    session.load(&state.detail_service).await?;
    Ok(Json(SessionResponse::build(
        id,
        &session,
        state.display_offset,
        state.link_opener.as_ref(),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/sessions/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status written", body = Json<UpdateStatusResponse>),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Another update is in progress"),
        (status = 502, description = "Status write failed; previous status kept")
    )
)]
#[axum::debug_handler]
pub async fn update_session_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse> {
    let session = state.sessions.get(id)?;
    let status = state
        .status_service
        .set_application_status(&session, payload.status)
        .await?;

    Ok(Json(UpdateStatusResponse {
        session_id: id,
        application_id: session.key().application_id.clone(),
        status,
        updated_at: now(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 204, description = "Session closed"),
        (status = 404, description = "Session not found")
    )
)]
#[axum::debug_handler]
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.sessions.close(id)?;
    Ok(StatusCode::NO_CONTENT)
}
