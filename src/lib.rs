pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::database::{
    pool::{create_pool, run_migrations},
    Stores,
};
use crate::error::Result;
use crate::services::{
    application_service::ApplicationService, auth_service::AuthService,
    company_service::CompanyService, eligibility::EligibilityEvaluator,
    profile_service::ProfileService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub storage_backend: &'static str,
    pub application_service: ApplicationService,
    pub company_service: CompanyService,
    pub auth_service: AuthService,
    pub profile_service: ProfileService,
}

impl AppState {
    pub fn new(config: Config, stores: Stores, storage_backend: &'static str) -> Self {
        let eligibility = EligibilityEvaluator::new(config.campus_offset());

        let application_service = ApplicationService::new(
            stores.clone(),
            eligibility,
            config.enforce_registration_window,
        );
        let company_service = CompanyService::new(stores.clone(), eligibility);
        let profile_service = ProfileService::new(stores.clone());
        let auth_service = AuthService::new(
            stores.users.clone(),
            config.jwt_secret.clone(),
            config.jwt_ttl_hours,
        );

        Self {
            config: Arc::new(config),
            storage_backend,
            application_service,
            company_service,
            auth_service,
            profile_service,
        }
    }

    /// Connects to Postgres and migrates when a database URL is configured,
    /// otherwise falls back to the in-memory store.
    pub async fn from_config(config: Config) -> Result<Self> {
        match config.database_url.clone() {
            Some(url) => {
                let pool = create_pool(&url).await?;
                run_migrations(&pool).await?;
                tracing::info!("using postgres storage");
                Ok(Self::new(config, Stores::postgres(pool), "postgres"))
            }
            None => {
                tracing::warn!("DATABASE_URL not set; data will not survive a restart");
                Ok(Self::new(config, Stores::in_memory(), "memory"))
            }
        }
    }
}
