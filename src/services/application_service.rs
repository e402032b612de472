use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::Stores;
use crate::error::Error;
use crate::models::application::{ApplicationRecord, ApplicationStatus};
use crate::models::company::CompanyDrive;
use crate::models::profile::Profile;
use crate::models::user::Actor;
use crate::services::eligibility::{DerivedStatus, EligibilityEvaluator};

#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("Student profile not found")]
    ApplicantProfileMissing,

    #[error("Company not found")]
    DriveNotFound,

    #[error("You have already applied for this company")]
    DuplicateApplication,

    #[error("Registration for this company is closed")]
    RegistrationClosed,

    #[error("Access denied. Only admin can perform this action.")]
    Forbidden,

    #[error("Invalid status '{0}'. Must be one of: Applied, Shortlisted, Interview, Hired, Rejected")]
    InvalidStatus(String),

    #[error("Application not found")]
    ApplicationNotFound,

    #[error(transparent)]
    Store(#[from] Error),
}

impl From<ApplicationError> for Error {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Store(inner) => inner,
            ApplicationError::ApplicantProfileMissing
            | ApplicationError::DriveNotFound
            | ApplicationError::ApplicationNotFound => Error::NotFound(err.to_string()),
            ApplicationError::DuplicateApplication => Error::Conflict(err.to_string()),
            ApplicationError::RegistrationClosed | ApplicationError::InvalidStatus(_) => {
                Error::BadRequest(err.to_string())
            }
            ApplicationError::Forbidden => Error::Forbidden(err.to_string()),
        }
    }
}

pub type ApplicationResult<T> = std::result::Result<T, ApplicationError>;

/// An application joined with both sides of the pair. Either side may be
/// absent if the referenced row has since disappeared.
#[derive(Debug, Clone)]
pub struct ApplicationDetail {
    pub record: ApplicationRecord,
    pub applicant: Option<Profile>,
    pub company: Option<CompanyDrive>,
}

#[derive(Clone)]
pub struct ApplicationService {
    stores: Stores,
    eligibility: EligibilityEvaluator,
    enforce_registration_window: bool,
}

impl ApplicationService {
    pub fn new(
        stores: Stores,
        eligibility: EligibilityEvaluator,
        enforce_registration_window: bool,
    ) -> Self {
        Self {
            stores,
            eligibility,
            enforce_registration_window,
        }
    }

    async fn require_profile(&self, actor: &Actor) -> ApplicationResult<Profile> {
        self.stores
            .profiles
            .find_by_user(actor.user_id)
            .await?
            .ok_or(ApplicationError::ApplicantProfileMissing)
    }

    fn require_admin(actor: &Actor) -> ApplicationResult<()> {
        if actor.is_admin() {
            Ok(())
        } else {
            Err(ApplicationError::Forbidden)
        }
    }

    fn parse_status(raw: &str) -> ApplicationResult<ApplicationStatus> {
        raw.parse()
            .map_err(|_| ApplicationError::InvalidStatus(raw.to_string()))
    }

    /// Creates the single application for (student, drive).
    ///
    /// Checks run in order: profile, drive, existing application, then the
    /// atomic insert-if-absent. With window enforcement a closed window is
    /// checked after the existing application and before the insert; without
    /// it late applications are accepted.
    pub async fn apply(
        &self,
        actor: &Actor,
        company_id: Uuid,
        now: DateTime<Utc>,
    ) -> ApplicationResult<ApplicationRecord> {
        let profile = self.require_profile(actor).await?;

        let drive = self
            .stores
            .companies
            .find_by_id(company_id)
            .await?
            .ok_or(ApplicationError::DriveNotFound)?;

        if self.enforce_registration_window {
            // An existing application outranks the window, so a retry after
            // closing still reports the duplicate.
            let existing = self
                .stores
                .applications
                .find_for_pair(profile.id, drive.id)
                .await?;
            if existing.is_some() {
                warn!(%company_id, applicant_id = %profile.id, "duplicate application rejected");
                return Err(ApplicationError::DuplicateApplication);
            }
            if self.eligibility.evaluate(&drive, now, None) == DerivedStatus::Closed {
                warn!(%company_id, applicant_id = %profile.id, "application after registration closed");
                return Err(ApplicationError::RegistrationClosed);
            }
        }

        let Some(record) = self
            .stores
            .applications
            .insert_if_absent(profile.id, drive.id, now)
            .await?
        else {
            warn!(%company_id, applicant_id = %profile.id, "duplicate application rejected");
            return Err(ApplicationError::DuplicateApplication);
        };

        info!(
            application_id = %record.id,
            %company_id,
            applicant_id = %profile.id,
            "application submitted"
        );
        Ok(record)
    }

    /// Admin-only overwrite of the status. Any value of the enum may follow
    /// any other; the previous value is not kept.
    pub async fn update_status(
        &self,
        actor: &Actor,
        application_id: Uuid,
        raw_status: &str,
        now: DateTime<Utc>,
    ) -> ApplicationResult<ApplicationDetail> {
        if let Err(err) = Self::require_admin(actor) {
            warn!(user_id = %actor.user_id, %application_id, "non-admin status change refused");
            return Err(err);
        }
        let status = Self::parse_status(raw_status)?;

        let record = self
            .stores
            .applications
            .update_status(application_id, status, now)
            .await?
            .ok_or(ApplicationError::ApplicationNotFound)?;

        info!(%application_id, status = %status, admin_id = %actor.user_id, "application status updated");
        self.join(record).await
    }

    /// All of the caller's applications, newest first.
    pub async fn my_applications(&self, actor: &Actor) -> ApplicationResult<Vec<ApplicationDetail>> {
        let profile = self.require_profile(actor).await?;
        let records = self.stores.applications.list_by_applicant(profile.id).await?;

        let mut companies = DriveCache::default();
        let mut out = Vec::with_capacity(records.len());
        for record in records {
            let company = companies.get(&self.stores, record.company_id).await?;
            out.push(ApplicationDetail {
                record,
                applicant: None,
                company,
            });
        }
        Ok(out)
    }

    /// The caller's application for one drive, or `None` if they have not applied.
    pub async fn my_application_for(
        &self,
        actor: &Actor,
        company_id: Uuid,
    ) -> ApplicationResult<Option<ApplicationDetail>> {
        let profile = self.require_profile(actor).await?;
        let Some(record) = self
            .stores
            .applications
            .find_for_pair(profile.id, company_id)
            .await?
        else {
            return Ok(None);
        };
        let company = self.stores.companies.find_by_id(record.company_id).await?;
        Ok(Some(ApplicationDetail {
            record,
            applicant: None,
            company,
        }))
    }

    /// Admin view: every application currently at `raw_status`, most recently
    /// updated first. The status must match an enum value exactly.
    pub async fn by_status(
        &self,
        actor: &Actor,
        raw_status: &str,
    ) -> ApplicationResult<Vec<ApplicationDetail>> {
        Self::require_admin(actor)?;
        let status = Self::parse_status(raw_status)?;

        let records = self.stores.applications.list_by_status(status).await?;
        let mut companies = DriveCache::default();
        let mut out = Vec::with_capacity(records.len());
        for record in records {
            let applicant = self.stores.profiles.find_by_id(record.applicant_id).await?;
            let company = companies.get(&self.stores, record.company_id).await?;
            out.push(ApplicationDetail {
                record,
                applicant,
                company,
            });
        }
        Ok(out)
    }

    /// Admin view: everyone who applied to one drive.
    pub async fn by_company(
        &self,
        actor: &Actor,
        company_id: Uuid,
    ) -> ApplicationResult<Vec<ApplicationDetail>> {
        Self::require_admin(actor)?;
        let drive = self
            .stores
            .companies
            .find_by_id(company_id)
            .await?
            .ok_or(ApplicationError::DriveNotFound)?;

        let records = self.stores.applications.list_by_company(drive.id).await?;
        let mut out = Vec::with_capacity(records.len());
        for record in records {
            let applicant = self.stores.profiles.find_by_id(record.applicant_id).await?;
            out.push(ApplicationDetail {
                record,
                applicant,
                company: None,
            });
        }
        Ok(out)
    }

    async fn join(&self, record: ApplicationRecord) -> ApplicationResult<ApplicationDetail> {
        let applicant = self.stores.profiles.find_by_id(record.applicant_id).await?;
        let company = self.stores.companies.find_by_id(record.company_id).await?;
        Ok(ApplicationDetail {
            record,
            applicant,
            company,
        })
    }
}

/// Avoids refetching the same drive while assembling a listing.
#[derive(Default)]
struct DriveCache {
    seen: HashMap<Uuid, Option<CompanyDrive>>,
}

impl DriveCache {
    async fn get(&mut self, stores: &Stores, id: Uuid) -> ApplicationResult<Option<CompanyDrive>> {
        if let Some(hit) = self.seen.get(&id) {
            return Ok(hit.clone());
        }
        let drive = stores.companies.find_by_id(id).await?;
        self.seen.insert(id, drive.clone());
        Ok(drive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::store::{
        MockApplicationStore, MockCompanyStore, MockProfileStore, MockUserStore,
    };
    use crate::models::company::{EngagementType, HiringStages, JobCategory};
    use crate::models::user::Role;
    use chrono::{Duration, FixedOffset};
    use std::sync::Arc;

    fn service_with(applications: MockApplicationStore) -> ApplicationService {
        let stores = Stores {
            users: Arc::new(MockUserStore::new()),
            profiles: Arc::new(MockProfileStore::new()),
            companies: Arc::new(MockCompanyStore::new()),
            applications: Arc::new(applications),
        };
        ApplicationService::new(
            stores,
            EligibilityEvaluator::new(FixedOffset::east_opt(0).unwrap()),
            false,
        )
    }

    fn profile_for(user_id: Uuid) -> Profile {
        let now = Utc::now();
        Profile {
            id: Uuid::new_v4(),
            user_id,
            name: "Asha".into(),
            email: "asha@campus.test".into(),
            branch: "CSE".into(),
            cgpa: 8.2,
            college_name: "Campus Institute".into(),
            contact: "9876543210".into(),
            backlogs: 0,
            resume_url: None,
            linkedin_link: None,
            github_link: None,
            leetcode_link: None,
            job_preference: JobCategory::Tech,
            created_at: now,
            updated_at: now,
        }
    }

    fn closed_drive() -> CompanyDrive {
        let now = Utc::now();
        CompanyDrive {
            id: Uuid::new_v4(),
            name: "Acme".into(),
            description: "Graduate hiring".into(),
            registration_opens_at: now - Duration::days(10),
            registration_closes_at: Some(now - Duration::days(3)),
            visit_date: now + Duration::days(2),
            engagement_type: EngagementType::Job,
            compensation: Some("12 LPA".into()),
            stipend: None,
            required_skills: vec!["Rust".into()],
            job_category: JobCategory::Tech,
            hiring_stages: HiringStages::default(),
            created_by: Uuid::new_v4(),
            created_at: now - Duration::days(10),
            updated_at: now - Duration::days(10),
        }
    }

    #[test]
    fn retry_after_close_reports_duplicate_when_window_enforced() {
        let student = Actor {
            user_id: Uuid::new_v4(),
            role: Role::Student,
        };
        let profile = profile_for(student.user_id);
        let drive = closed_drive();
        let existing = ApplicationRecord {
            id: Uuid::new_v4(),
            applicant_id: profile.id,
            company_id: drive.id,
            status: ApplicationStatus::Interview,
            applied_at: drive.registration_opens_at,
            created_at: drive.registration_opens_at,
            updated_at: drive.registration_opens_at,
        };

        let mut profiles = MockProfileStore::new();
        profiles
            .expect_find_by_user()
            .returning(move |_| Ok(Some(profile.clone())));
        let mut companies = MockCompanyStore::new();
        let found = drive.clone();
        companies
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        let mut applications = MockApplicationStore::new();
        applications
            .expect_find_for_pair()
            .times(1)
            .returning(move |_, _| Ok(Some(existing.clone())));
        applications.expect_insert_if_absent().times(0);

        let service = ApplicationService::new(
            Stores {
                users: Arc::new(MockUserStore::new()),
                profiles: Arc::new(profiles),
                companies: Arc::new(companies),
                applications: Arc::new(applications),
            },
            EligibilityEvaluator::new(FixedOffset::east_opt(0).unwrap()),
            true,
        );

        let result = tokio_test::block_on(service.apply(&student, drive.id, Utc::now()));
        assert!(matches!(result, Err(ApplicationError::DuplicateApplication)));
    }

    #[test]
    fn non_admin_transition_never_touches_storage() {
        let mut applications = MockApplicationStore::new();
        applications.expect_update_status().times(0);
        let service = service_with(applications);
        let student = Actor {
            user_id: Uuid::new_v4(),
            role: Role::Student,
        };

        let result = tokio_test::block_on(service.update_status(
            &student,
            Uuid::new_v4(),
            "Hired",
            Utc::now(),
        ));
        assert!(matches!(result, Err(ApplicationError::Forbidden)));
    }

    #[test]
    fn invalid_status_is_rejected_before_storage() {
        let mut applications = MockApplicationStore::new();
        applications.expect_update_status().times(0);
        let service = service_with(applications);
        let admin = Actor {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
        };

        let result = tokio_test::block_on(service.update_status(
            &admin,
            Uuid::new_v4(),
            "hired",
            Utc::now(),
        ));
        assert!(matches!(result, Err(ApplicationError::InvalidStatus(s)) if s == "hired"));
    }

    #[test]
    fn unknown_application_is_not_found() {
        let mut applications = MockApplicationStore::new();
        applications
            .expect_update_status()
            .times(1)
            .returning(|_, _, _| Ok(None));
        let service = service_with(applications);
        let admin = Actor {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
        };

        let result = tokio_test::block_on(service.update_status(
            &admin,
            Uuid::new_v4(),
            "Shortlisted",
            Utc::now(),
        ));
        assert!(matches!(result, Err(ApplicationError::ApplicationNotFound)));
    }

    #[test]
    fn domain_errors_map_to_http_taxonomy() {
        assert!(matches!(
            Error::from(ApplicationError::DuplicateApplication),
            Error::Conflict(_)
        ));
        assert!(matches!(
            Error::from(ApplicationError::ApplicantProfileMissing),
            Error::NotFound(_)
        ));
        assert!(matches!(
            Error::from(ApplicationError::InvalidStatus("x".into())),
            Error::BadRequest(_)
        ));
        assert!(matches!(
            Error::from(ApplicationError::Forbidden),
            Error::Forbidden(_)
        ));
    }
}
