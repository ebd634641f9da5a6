use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};

use crate::{
    dto::profile_link_dto::{ProfileLinkQuery, ProfileLinkResponse},
    error::{Error, Result},
    services::profile_links::{open_profile_link, SocialNetwork},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/profile-links",
    params(
        ("network" = String, Query, description = "instagram or linkedin"),
        ("handle" = String, Query, description = "Handle or URL as the applicant typed it")
    ),
    responses(
        (status = 200, description = "Resolved profile URL", body = Json<ProfileLinkResponse>),
        (status = 400, description = "Unknown network or empty handle"),
        (status = 422, description = "Resolved link cannot be opened")
    )
)]
#[axum::debug_handler]
pub async fn resolve_profile_link(
    State(state): State<AppState>,
    Query(query): Query<ProfileLinkQuery>,
) -> Result<impl IntoResponse> {
    let network: SocialNetwork = query.network.parse().map_err(Error::BadRequest)?;
    if query.handle.trim().is_empty() {
        return Err(Error::BadRequest(format!("{} handle is empty", network)));
    }

    let url = open_profile_link(state.link_opener.as_ref(), network, &query.handle)?;
    Ok(Json(ProfileLinkResponse {
        network,
        input: query.handle,
        url,
    }))
}
