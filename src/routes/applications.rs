use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};

use crate::{
    dto::detail_dto::{ApplicationDetailResponse, DetailQuery, StatusOption},
    error::Result,
    models::ApplicationStatus,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/applications/{id}/detail",
    params(
        ("id" = String, Path, description = "Application ID"),
        ("job_id" = String, Query, description = "Job posting ID"),
        ("applicant_id" = String, Query, description = "Applicant account ID")
    ),
    responses(
        (status = 200, description = "Application joined with its job and applicant", body = Json<ApplicationDetailResponse>),
        (status = 400, description = "Missing identifiers"),
        (status = 404, description = "Application not found"),
        (status = 502, description = "Document store unavailable")
    )
)]
#[axum::debug_handler]
pub async fn get_application_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> Result<impl IntoResponse> {
    let detail = state
        .detail_service
        .load_application_detail(&id, &query.job_id, &query.applicant_id)
        .await?;
    Ok(Json(ApplicationDetailResponse::build(
        &detail,
        state.display_offset,
        state.link_opener.as_ref(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/statuses",
    responses(
        (status = 200, description = "Every status an application can be given", body = Json<Vec<StatusOption>>)
    )
)]
pub async fn list_statuses() -> impl IntoResponse {
    let options: Vec<StatusOption> = ApplicationStatus::ALL
        .into_iter()
        .map(StatusOption::from)
        .collect();
    Json(options)
}
