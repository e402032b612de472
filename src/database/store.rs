use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::application::{ApplicationRecord, ApplicationStatus};
use crate::models::company::{CompanyDrive, NewCompanyDrive};
use crate::models::profile::{NewProfile, Profile};
use crate::models::user::{NewUser, Role, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns `None` when the email is already registered.
    async fn insert(&self, user: NewUser) -> Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email_and_role(&self, email: &str, role: Role) -> Result<Option<User>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Returns `None` when the user already has a profile.
    async fn insert(&self, profile: NewProfile) -> Result<Option<Profile>>;
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Profile>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn insert(&self, drive: NewCompanyDrive) -> Result<CompanyDrive>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CompanyDrive>>;
    /// Newest first.
    async fn list(&self) -> Result<Vec<CompanyDrive>>;
    /// Drive with the smallest `visit_date >= now`; ties go to the earliest created.
    async fn earliest_upcoming(&self, now: DateTime<Utc>) -> Result<Option<CompanyDrive>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Atomically creates an `Applied` record for the pair, or returns `None`
    /// if one already exists.
    async fn insert_if_absent(
        &self,
        applicant_id: Uuid,
        company_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<ApplicationRecord>>;
    async fn find_for_pair(
        &self,
        applicant_id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<ApplicationRecord>>;
    /// Newest created first.
    async fn list_by_applicant(&self, applicant_id: Uuid) -> Result<Vec<ApplicationRecord>>;
    /// Most recently updated first.
    async fn list_by_status(&self, status: ApplicationStatus) -> Result<Vec<ApplicationRecord>>;
    /// Most recently applied first.
    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<ApplicationRecord>>;
    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<ApplicationRecord>>;
    async fn count_by_company(&self, company_id: Uuid) -> Result<i64>;
}

/// The storage backends a running service needs, behind trait objects.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub companies: Arc<dyn CompanyStore>,
    pub applications: Arc<dyn ApplicationStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(super::postgres::PgStore::new(pool));
        Self {
            users: store.clone(),
            profiles: store.clone(),
            companies: store.clone(),
            applications: store,
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(super::memory::MemoryStore::default());
        Self {
            users: store.clone(),
            profiles: store.clone(),
            companies: store.clone(),
            applications: store,
        }
    }
}
