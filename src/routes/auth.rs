use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use serde_json::json;

use crate::{
    dto::auth_dto::{AuthResponse, LoginPayload, RegisterPayload},
    error::Result,
    models::user::Actor,
    routes::extract::JsonBody,
    AppState,
};

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "User registered", body = Json<AuthResponse>),
        (status = 400, description = "Missing fields or user already exists")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterPayload>,
) -> Result<impl IntoResponse> {
    let user = state.auth_service.register(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            user,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login successful", body = Json<AuthResponse>),
        (status = 400, description = "Invalid credentials")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginPayload>,
) -> Result<impl IntoResponse> {
    let user = state.auth_service.login(payload).await?;
    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user,
    }))
}

/// Tokens are stateless; the client simply discards its copy.
#[axum::debug_handler]
pub async fn logout(Extension(actor): Extension<Actor>) -> impl IntoResponse {
    tracing::info!(user_id = %actor.user_id, "user logged out");
    Json(json!({ "success": true, "message": "User logged out successfully" }))
}
