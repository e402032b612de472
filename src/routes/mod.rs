pub mod application;
pub mod auth;
pub mod company;
pub mod extract;
pub mod health;
pub mod profile;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::middleware::auth::require_auth;
use crate::AppState;

/// The full HTTP surface. Everything except `/health`, register and login
/// sits behind bearer authentication.
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let protected = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/profile/add", post(profile::add_profile))
        .route("/profile/me", get(profile::my_profile))
        .route("/company/add", post(company::add_company))
        .route("/company/all", get(company::list_companies))
        .route("/company/earliest", get(company::earliest_company))
        .route("/company/earliest-admin", get(company::earliest_company_admin))
        .route("/company/:id", get(company::get_company))
        .route("/application/apply", post(application::apply))
        .route("/application/status/:id", put(application::update_status))
        .route("/application/mine", get(application::my_applications))
        .route(
            "/application/mine/:company_id",
            get(application::my_application_for_company),
        )
        .route(
            "/application/students/status/:status",
            get(application::students_by_status),
        )
        .route(
            "/application/company/:company_id",
            get(application::applicants_by_company),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let max_body_bytes = state.config.max_body_bytes;

    public
        .merge(protected)
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
