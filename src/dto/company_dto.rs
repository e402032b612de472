use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{Error, Result};
use crate::models::application::ApplicationStatus;
use crate::models::company::{CompanyDrive, EngagementType, HiringStages, JobCategory};
use crate::services::company_service::{StudentVisitSummary, VisitStatus, VisitSummary};
use crate::services::eligibility::DerivedStatus;
use crate::utils::time::format_visit_date;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyPayload {
    #[validate(length(min = 1, message = "Company name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub registration_opens_at: DateTime<Utc>,
    pub registration_closes_at: DateTime<Utc>,
    pub visit_date: DateTime<Utc>,
    pub engagement_type: EngagementType,
    pub compensation: Option<String>,
    pub stipend: Option<String>,
    #[validate(length(min = 1, message = "Skills required field is mandatory"))]
    pub required_skills: Vec<String>,
    pub job_category: JobCategory,
    #[serde(default)]
    pub hiring_stages: HiringStages,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}

impl CreateCompanyPayload {
    /// Cross-field rules the derive cannot express.
    pub fn check_terms(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::BadRequest("Company name is required".to_string()));
        }
        if self.registration_opens_at > self.registration_closes_at {
            return Err(Error::BadRequest(
                "Registration must open on or before its closing date".to_string(),
            ));
        }
        if self.engagement_type.requires_compensation() && !present(&self.compensation) {
            return Err(Error::BadRequest(
                "Package offered is required for job or both type".to_string(),
            ));
        }
        if self.engagement_type.requires_stipend() && !present(&self.stipend) {
            return Err(Error::BadRequest(
                "Internship stipend is required for internship or both type".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    #[serde(flatten)]
    pub drive: CompanyDrive,
    pub status: DerivedStatus,
}

impl From<(CompanyDrive, DerivedStatus)> for CompanyResponse {
    fn from((drive, status): (CompanyDrive, DerivedStatus)) -> Self {
        Self { drive, status }
    }
}

/// Drive fields joined into application listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub compensation: Option<String>,
    pub stipend: Option<String>,
    pub engagement_type: EngagementType,
    pub job_category: JobCategory,
    pub visit_date: DateTime<Utc>,
}

impl From<CompanyDrive> for CompanySummary {
    fn from(drive: CompanyDrive) -> Self {
        Self {
            id: drive.id,
            name: drive.name,
            description: drive.description,
            compensation: drive.compensation,
            stipend: drive.stipend,
            engagement_type: drive.engagement_type,
            job_category: drive.job_category,
            visit_date: drive.visit_date,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminVisitResponse {
    pub company_id: Uuid,
    pub company_name: String,
    pub visit_date: String,
    pub total_students_applied: i64,
    pub job_type: JobCategory,
}

impl AdminVisitResponse {
    pub fn new(summary: VisitSummary, offset: FixedOffset) -> Self {
        Self {
            company_id: summary.drive.id,
            company_name: summary.drive.name,
            visit_date: format_visit_date(summary.drive.visit_date, offset),
            total_students_applied: summary.total_applied,
            job_type: summary.drive.job_category,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentVisitResponse {
    #[serde(flatten)]
    pub overview: AdminVisitResponse,
    pub student_status: VisitStatus,
    pub application_stage: Option<ApplicationStatus>,
    pub hiring_process: HiringStages,
}

impl StudentVisitResponse {
    pub fn new(summary: StudentVisitSummary, offset: FixedOffset) -> Self {
        let hiring_process = summary.summary.drive.hiring_stages;
        Self {
            overview: AdminVisitResponse::new(summary.summary, offset),
            student_status: summary.student_status,
            application_stage: summary.application_stage,
            hiring_process,
        }
    }
}
