use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::company::JobCategory;

/// A student's applicant profile. Exactly one per student user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub branch: String,
    pub cgpa: f64,
    pub college_name: String,
    pub contact: String,
    pub backlogs: i32,
    pub resume_url: Option<String>,
    pub linkedin_link: Option<String>,
    pub github_link: Option<String>,
    pub leetcode_link: Option<String>,
    pub job_preference: JobCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProfile {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub branch: String,
    pub cgpa: f64,
    pub college_name: String,
    pub contact: String,
    pub backlogs: i32,
    pub resume_url: Option<String>,
    pub linkedin_link: Option<String>,
    pub github_link: Option<String>,
    pub leetcode_link: Option<String>,
    pub job_preference: JobCategory,
}
