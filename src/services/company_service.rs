use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::database::Stores;
use crate::dto::company_dto::CreateCompanyPayload;
use crate::error::{Error, Result};
use crate::models::application::{ApplicationRecord, ApplicationStatus};
use crate::models::company::{CompanyDrive, NewCompanyDrive};
use crate::models::user::Actor;
use crate::services::eligibility::{DerivedStatus, EligibilityEvaluator};

/// Whether the requesting student has acted on the upcoming drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VisitStatus {
    Applied,
    #[serde(rename = "Not Applied")]
    NotApplied,
    Closed,
}

impl From<DerivedStatus> for VisitStatus {
    fn from(status: DerivedStatus) -> Self {
        match status {
            DerivedStatus::Apply => VisitStatus::NotApplied,
            DerivedStatus::Closed => VisitStatus::Closed,
            DerivedStatus::Status(_) => VisitStatus::Applied,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VisitSummary {
    pub drive: CompanyDrive,
    pub total_applied: i64,
}

#[derive(Debug, Clone)]
pub struct StudentVisitSummary {
    pub summary: VisitSummary,
    pub student_status: VisitStatus,
    pub application_stage: Option<ApplicationStatus>,
}

#[derive(Clone)]
pub struct CompanyService {
    stores: Stores,
    eligibility: EligibilityEvaluator,
}

impl CompanyService {
    pub fn new(stores: Stores, eligibility: EligibilityEvaluator) -> Self {
        Self {
            stores,
            eligibility,
        }
    }

    pub fn eligibility(&self) -> &EligibilityEvaluator {
        &self.eligibility
    }

    pub async fn create(&self, actor: &Actor, payload: CreateCompanyPayload) -> Result<CompanyDrive> {
        if !actor.is_admin() {
            warn!(user_id = %actor.user_id, "non-admin attempted to add a company");
            return Err(Error::Forbidden(
                "Only admin can add company details.".to_string(),
            ));
        }
        payload.validate()?;
        payload.check_terms()?;

        let drive = self
            .stores
            .companies
            .insert(NewCompanyDrive {
                name: payload.name.trim().to_string(),
                description: payload.description,
                registration_opens_at: payload.registration_opens_at,
                registration_closes_at: payload.registration_closes_at,
                visit_date: payload.visit_date,
                engagement_type: payload.engagement_type,
                compensation: non_blank(payload.compensation),
                stipend: non_blank(payload.stipend),
                required_skills: payload.required_skills,
                job_category: payload.job_category,
                hiring_stages: payload.hiring_stages,
                created_by: actor.user_id,
            })
            .await?;

        info!(company_id = %drive.id, name = %drive.name, "company drive created");
        Ok(drive)
    }

    /// Every drive, newest first, each with the status the caller should see.
    pub async fn list_for(
        &self,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<Vec<(CompanyDrive, DerivedStatus)>> {
        let drives = self.stores.companies.list().await?;

        let mut mine: HashMap<Uuid, ApplicationRecord> = HashMap::new();
        if let Some(profile) = self.stores.profiles.find_by_user(actor.user_id).await? {
            for record in self.stores.applications.list_by_applicant(profile.id).await? {
                mine.insert(record.company_id, record);
            }
        }

        Ok(drives
            .into_iter()
            .map(|drive| {
                let status = self.eligibility.evaluate(&drive, now, mine.get(&drive.id));
                (drive, status)
            })
            .collect())
    }

    /// One drive with the status the caller should see.
    pub async fn get_for(
        &self,
        actor: &Actor,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(CompanyDrive, DerivedStatus)> {
        let drive = self
            .stores
            .companies
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("Company not found.".to_string()))?;
        let application = self.application_of(actor, drive.id).await?;
        let status = self.eligibility.evaluate(&drive, now, application.as_ref());
        Ok((drive, status))
    }

    async fn application_of(
        &self,
        actor: &Actor,
        company_id: Uuid,
    ) -> Result<Option<ApplicationRecord>> {
        match self.stores.profiles.find_by_user(actor.user_id).await? {
            Some(profile) => {
                self.stores
                    .applications
                    .find_for_pair(profile.id, company_id)
                    .await
            }
            None => Ok(None),
        }
    }

    async fn earliest(&self, now: DateTime<Utc>) -> Result<VisitSummary> {
        let drive = self
            .stores
            .companies
            .earliest_upcoming(now)
            .await?
            .ok_or_else(|| Error::NotFound("No upcoming company visits found.".to_string()))?;
        let total_applied = self.stores.applications.count_by_company(drive.id).await?;
        Ok(VisitSummary {
            drive,
            total_applied,
        })
    }

    /// The next drive to visit campus, plus where the caller stands on it.
    pub async fn earliest_for_student(
        &self,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<StudentVisitSummary> {
        let summary = self.earliest(now).await?;
        let application = self.application_of(actor, summary.drive.id).await?;
        let derived = self
            .eligibility
            .evaluate(&summary.drive, now, application.as_ref());

        Ok(StudentVisitSummary {
            student_status: derived.into(),
            application_stage: application.map(|a| a.status),
            summary,
        })
    }

    pub async fn earliest_for_admin(&self, now: DateTime<Utc>) -> Result<VisitSummary> {
        self.earliest(now).await
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
