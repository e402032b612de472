use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    dto::{
        company_dto::{
            AdminVisitResponse, CompanyResponse, CreateCompanyPayload, StudentVisitResponse,
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
    path = "/company/add",
    request_body = CreateCompanyPayload,
    responses(
        (status = 201, description = "Company drive created", body = Json<CompanyResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Caller is not an admin")
    )
)]
#[axum::debug_handler]
pub async fn add_company(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    JsonBody(payload): JsonBody<CreateCompanyPayload>,
) -> Result<impl IntoResponse> {
    let drive = state.company_service.create(&actor, payload).await?;
    let status = state.company_service.eligibility().evaluate(&drive, now(), None);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Company details added successfully.",
            CompanyResponse::from((drive, status)),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/company/all",
    responses(
        (status = 200, description = "All company drives with the caller's status", body = [CompanyResponse])
    )
)]
#[axum::debug_handler]
pub async fn list_companies(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse> {
    let drives = state.company_service.list_for(&actor, now()).await?;
    let items: Vec<CompanyResponse> = drives.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::list("Companies fetched successfully", items)))
}

#[utoipa::path(
    get,
    path = "/company/{id}",
    params(
        ("id" = Uuid, Path, description = "Company drive ID")
    ),
    responses(
        (status = 200, description = "Company drive with the caller's status", body = Json<CompanyResponse>),
        (status = 404, description = "Company not found")
    )
)]
#[axum::debug_handler]
pub async fn get_company(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    PathParam(id): PathParam<Uuid>,
) -> Result<impl IntoResponse> {
    let found = state.company_service.get_for(&actor, id, now()).await?;
    Ok(Json(ApiResponse::new(
        "Company fetched successfully",
        CompanyResponse::from(found),
    )))
}

#[utoipa::path(
    get,
    path = "/company/earliest",
    responses(
        (status = 200, description = "Next company visit and the caller's standing", body = Json<StudentVisitResponse>),
        (status = 404, description = "No upcoming company visits")
    )
)]
#[axum::debug_handler]
pub async fn earliest_company(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse> {
    let summary = state
        .company_service
        .earliest_for_student(&actor, now())
        .await?;
    let offset = state.company_service.eligibility().offset();
    Ok(Json(ApiResponse::new(
        "Upcoming company visit fetched successfully",
        StudentVisitResponse::new(summary, offset),
    )))
}

#[utoipa::path(
    get,
    path = "/company/earliest-admin",
    responses(
        (status = 200, description = "Next company visit overview", body = Json<AdminVisitResponse>),
        (status = 404, description = "No upcoming company visits")
    )
)]
#[axum::debug_handler]
pub async fn earliest_company_admin(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let summary = state.company_service.earliest_for_admin(now()).await?;
    let offset = state.company_service.eligibility().offset();
    Ok(Json(ApiResponse::new(
        "Upcoming company visit fetched successfully",
        AdminVisitResponse::new(summary, offset),
    )))
}
