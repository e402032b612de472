use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};

use crate::{
    dto::{profile_dto::CreateProfilePayload, ApiResponse},
    error::Result,
    models::user::Actor,
    routes::extract::JsonBody,
    AppState,
};

#[utoipa::path(
    post,
    path = "/profile/add",
    request_body = CreateProfilePayload,
    responses(
        (status = 201, description = "Profile created"),
        (status = 400, description = "Invalid payload or profile already exists"),
        (status = 403, description = "Caller is not a student")
    )
)]
#[axum::debug_handler]
pub async fn add_profile(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    JsonBody(payload): JsonBody<CreateProfilePayload>,
) -> Result<impl IntoResponse> {
    let profile = state.profile_service.create(&actor, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Profile created successfully", profile)),
    ))
}

#[utoipa::path(
    get,
    path = "/profile/me",
    responses(
        (status = 200, description = "Caller's profile"),
        (status = 404, description = "No profile for this user")
    )
)]
#[axum::debug_handler]
pub async fn my_profile(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse> {
    let profile = state.profile_service.mine(&actor).await?;
    Ok(Json(ApiResponse::new("Profile fetched successfully", profile)))
}
