use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::company_dto::CompanySummary;
use crate::models::application::{ApplicationRecord, ApplicationStatus};
use crate::models::company::{CompanyDrive, JobCategory};
use crate::models::profile::Profile;
use crate::services::application_service::ApplicationDetail;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPayload {
    pub company_id: Uuid,
}

/// Kept as a raw string so an unknown value reaches the status check
/// instead of failing deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusPayload {
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub branch: String,
    pub cgpa: f64,
    pub college_name: String,
    pub contact: String,
}

impl From<&Profile> for ApplicantSummary {
    fn from(p: &Profile) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            email: p.email.clone(),
            branch: p.branch.clone(),
            cgpa: p.cgpa,
            college_name: p.college_name.clone(),
            contact: p.contact.clone(),
        }
    }
}

/// What an admin sees about each applicant to their drive.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantDetail {
    #[serde(flatten)]
    pub summary: ApplicantSummary,
    pub resume_url: Option<String>,
    pub linkedin_link: Option<String>,
    pub github_link: Option<String>,
    pub leetcode_link: Option<String>,
    pub backlogs: i32,
    pub job_preference: JobCategory,
}

impl From<&Profile> for ApplicantDetail {
    fn from(p: &Profile) -> Self {
        Self {
            summary: ApplicantSummary::from(p),
            resume_url: p.resume_url.clone(),
            linkedin_link: p.linkedin_link.clone(),
            github_link: p.github_link.clone(),
            leetcode_link: p.leetcode_link.clone(),
            backlogs: p.backlogs,
            job_preference: p.job_preference,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub applicant_id: Uuid,
    pub company_id: Uuid,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanySummary>,
}

impl From<ApplicationRecord> for ApplicationResponse {
    fn from(r: ApplicationRecord) -> Self {
        Self {
            id: r.id,
            applicant_id: r.applicant_id,
            company_id: r.company_id,
            status: r.status,
            applied_at: r.applied_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
            applicant: None,
            company: None,
        }
    }
}

impl ApplicationResponse {
    fn with_company(mut self, company: Option<CompanyDrive>) -> Self {
        self.company = company.map(CompanySummary::from);
        self
    }

    fn with_applicant<T: Serialize>(mut self, applicant: Option<T>) -> Self {
        self.applicant = applicant.and_then(|a| serde_json::to_value(a).ok());
        self
    }

    /// Status change result and by-status listing: both sides joined.
    pub fn joined(detail: ApplicationDetail) -> Self {
        let applicant = detail.applicant.as_ref().map(ApplicantSummary::from);
        Self::from(detail.record)
            .with_applicant(applicant)
            .with_company(detail.company)
    }

    /// Student's own listing: drive joined.
    pub fn with_drive(detail: ApplicationDetail) -> Self {
        Self::from(detail.record).with_company(detail.company)
    }

    /// Applicants to one drive: full applicant profile joined.
    pub fn with_applicant_detail(detail: ApplicationDetail) -> Self {
        let applicant = detail.applicant.as_ref().map(ApplicantDetail::from);
        Self::from(detail.record).with_applicant(applicant)
    }
}

/// Answer to "what is my status for this company?".
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MyCompanyStatus {
    #[serde(rename_all = "camelCase")]
    NotApplied { company_id: Uuid, status: &'static str },
    #[serde(rename_all = "camelCase")]
    Applied {
        application_id: Uuid,
        company_id: Uuid,
        company_name: Option<String>,
        status: ApplicationStatus,
        company_details: Option<CompanySummary>,
    },
}

impl MyCompanyStatus {
    pub fn from_lookup(company_id: Uuid, detail: Option<ApplicationDetail>) -> Self {
        match detail {
            None => MyCompanyStatus::NotApplied {
                company_id,
                status: "Apply",
            },
            Some(detail) => MyCompanyStatus::Applied {
                application_id: detail.record.id,
                company_id: detail.record.company_id,
                company_name: detail.company.as_ref().map(|c| c.name.clone()),
                status: detail.record.status,
                company_details: detail.company.map(CompanySummary::from),
            },
        }
    }
}
