use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementType {
    Job,
    Internship,
    Both,
}

impl EngagementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementType::Job => "job",
            EngagementType::Internship => "internship",
            EngagementType::Both => "both",
        }
    }

    pub fn requires_compensation(&self) -> bool {
        matches!(self, EngagementType::Job | EngagementType::Both)
    }

    pub fn requires_stipend(&self) -> bool {
        matches!(self, EngagementType::Internship | EngagementType::Both)
    }
}

impl FromStr for EngagementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "job" => Ok(EngagementType::Job),
            "internship" => Ok(EngagementType::Internship),
            "both" => Ok(EngagementType::Both),
            other => Err(format!("unknown engagement type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobCategory {
    #[serde(rename = "tech")]
    Tech,
    #[serde(rename = "non-tech")]
    NonTech,
}

impl JobCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobCategory::Tech => "tech",
            JobCategory::NonTech => "non-tech",
        }
    }
}

impl fmt::Display for JobCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tech" => Ok(JobCategory::Tech),
            "non-tech" => Ok(JobCategory::NonTech),
            other => Err(format!("unknown job category '{}'", other)),
        }
    }
}

/// Checklist of the rounds a drive runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HiringStages {
    pub aptitude: bool,
    pub coding: bool,
    pub personal_interview: bool,
    pub group_discussion: bool,
}

/// One recruiting event posted by an admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDrive {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub registration_opens_at: DateTime<Utc>,
    /// `None` only for legacy rows; treated as already closed.
    pub registration_closes_at: Option<DateTime<Utc>>,
    pub visit_date: DateTime<Utc>,
    pub engagement_type: EngagementType,
    pub compensation: Option<String>,
    pub stipend: Option<String>,
    pub required_skills: Vec<String>,
    pub job_category: JobCategory,
    pub hiring_stages: HiringStages,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCompanyDrive {
    pub name: String,
    pub description: String,
    pub registration_opens_at: DateTime<Utc>,
    pub registration_closes_at: DateTime<Utc>,
    pub visit_date: DateTime<Utc>,
    pub engagement_type: EngagementType,
    pub compensation: Option<String>,
    pub stipend: Option<String>,
    pub required_skills: Vec<String>,
    pub job_category: JobCategory,
    pub hiring_stages: HiringStages,
    pub created_by: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_category_uses_hyphenated_wire_form() {
        let json = serde_json::to_string(&JobCategory::NonTech).unwrap();
        assert_eq!(json, "\"non-tech\"");
        assert_eq!("non-tech".parse::<JobCategory>().unwrap(), JobCategory::NonTech);
    }

    #[test]
    fn engagement_terms() {
        assert!(EngagementType::Job.requires_compensation());
        assert!(!EngagementType::Job.requires_stipend());
        assert!(EngagementType::Internship.requires_stipend());
        assert!(EngagementType::Both.requires_compensation());
        assert!(EngagementType::Both.requires_stipend());
    }

    #[test]
    fn hiring_stages_default_missing_flags() {
        let stages: HiringStages = serde_json::from_str(r#"{"coding":true}"#).unwrap();
        assert!(stages.coding);
        assert!(!stages.aptitude);
        assert!(!stages.personal_interview);
    }
}
