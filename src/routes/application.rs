use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    dto::{
        application_dto::{
            ApplicationResponse, ApplyPayload, MyCompanyStatus, UpdateStatusPayload,
        },
        ApiResponse,
    },
    error::Result,
    models::user::Actor,
    routes::extract::{JsonBody, PathParam},
    utils::time::now,
    AppState,
};

#[utoipa::path(
    post,
    path = "/application/apply",
    responses(
        (status = 201, description = "Application submitted", body = Json<ApplicationResponse>),
        (status = 400, description = "Already applied"),
        (status = 404, description = "Student profile or company not found")
    )
)]
#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    JsonBody(payload): JsonBody<ApplyPayload>,
) -> Result<impl IntoResponse> {
    let record = state
        .application_service
        .apply(&actor, payload.company_id, now())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Application submitted successfully",
            ApplicationResponse::from(record),
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/application/status/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Status updated", body = Json<ApplicationResponse>),
        (status = 400, description = "Invalid status value"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<UpdateStatusPayload>,
) -> Result<impl IntoResponse> {
    let detail = state
        .application_service
        .update_status(&actor, id, &payload.status, now())
        .await?;
    let message = format!("Application status updated to '{}'", detail.record.status);
    Ok(Json(ApiResponse::new(
        message,
        ApplicationResponse::joined(detail),
    )))
}

#[utoipa::path(
    get,
    path = "/application/mine",
    responses(
        (status = 200, description = "Caller's applications, newest first", body = [ApplicationResponse]),
        (status = 404, description = "Student profile not found")
    )
)]
#[axum::debug_handler]
pub async fn my_applications(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse> {
    let details = state.application_service.my_applications(&actor).await?;
    let message = if details.is_empty() {
        "No applications found"
    } else {
        "Applications fetched successfully"
    };
    let items: Vec<ApplicationResponse> = details
        .into_iter()
        .map(ApplicationResponse::with_drive)
        .collect();
    Ok(Json(ApiResponse::list(message, items)))
}

#[utoipa::path(
    get,
    path = "/application/mine/{company_id}",
    params(
        ("company_id" = Uuid, Path, description = "Company drive ID")
    ),
    responses(
        (status = 200, description = "Caller's application for the drive, or status Apply", body = Json<MyCompanyStatus>),
        (status = 404, description = "Student profile not found")
    )
)]
#[axum::debug_handler]
pub async fn my_application_for_company(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    PathParam(company_id): PathParam<Uuid>,
) -> Result<impl IntoResponse> {
    let detail = state
        .application_service
        .my_application_for(&actor, company_id)
        .await?;
    let message = if detail.is_some() {
        "Application fetched successfully"
    } else {
        "You have not applied for this company yet"
    };
    Ok(Json(ApiResponse::new(
        message,
        MyCompanyStatus::from_lookup(company_id, detail),
    )))
}

#[utoipa::path(
    get,
    path = "/application/students/status/{status}",
    params(
        ("status" = String, Path, description = "Exact status value, e.g. Shortlisted")
    ),
    responses(
        (status = 200, description = "Applications at this status, most recently updated first", body = [ApplicationResponse]),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Caller is not an admin")
    )
)]
#[axum::debug_handler]
pub async fn students_by_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    PathParam(status): PathParam<String>,
) -> Result<impl IntoResponse> {
    let details = state.application_service.by_status(&actor, &status).await?;
    let message = if details.is_empty() {
        format!("No students found with status '{}'", status)
    } else {
        format!("Students with status '{}' fetched successfully", status)
    };
    let items: Vec<ApplicationResponse> = details
        .into_iter()
        .map(ApplicationResponse::joined)
        .collect();
    Ok(Json(ApiResponse::list(message, items)))
}

#[utoipa::path(
    get,
    path = "/application/company/{company_id}",
    params(
        ("company_id" = Uuid, Path, description = "Company drive ID")
    ),
    responses(
        (status = 200, description = "Applicants for the drive", body = [ApplicationResponse]),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Company not found")
    )
)]
#[axum::debug_handler]
pub async fn applicants_by_company(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    PathParam(company_id): PathParam<Uuid>,
) -> Result<impl IntoResponse> {
    let details = state
        .application_service
        .by_company(&actor, company_id)
        .await?;
    let items: Vec<ApplicationResponse> = details
        .into_iter()
        .map(ApplicationResponse::with_applicant_detail)
        .collect();
    Ok(Json(ApiResponse::list("Applicants fetched successfully", items)))
}
