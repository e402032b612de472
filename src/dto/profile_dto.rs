use serde::Deserialize;
use validator::Validate;

use crate::error::{Error, Result};
use crate::models::company::JobCategory;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfilePayload {
    #[validate(length(min = 1, message = "Branch is required"))]
    pub branch: String,
    #[validate(range(min = 0.0, max = 10.0, message = "CGPA must be between 0 and 10"))]
    pub cgpa: f64,
    #[validate(length(min = 1, message = "College name is required"))]
    pub college_name: String,
    pub contact: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "Backlogs cannot be negative"))]
    pub backlogs: i32,
    /// Link to an already uploaded resume.
    #[validate(length(min = 1, message = "Resume file or URL required"))]
    pub resume: String,
    pub linkedin_link: Option<String>,
    pub github_link: Option<String>,
    pub leetcode_link: Option<String>,
    pub job_preference: Option<String>,
}

impl CreateProfilePayload {
    /// Ten digits, nothing else.
    pub fn check_contact(&self) -> Result<()> {
        let contact = self.contact.trim();
        if contact.len() == 10 && contact.bytes().all(|b| b.is_ascii_digit()) {
            Ok(())
        } else {
            Err(Error::BadRequest("Invalid contact number".to_string()))
        }
    }

    /// Anything other than `non-tech` is treated as `tech`.
    pub fn job_category(&self) -> JobCategory {
        match self.job_preference.as_deref().map(|p| p.trim().to_lowercase()) {
            Some(p) if p == "non-tech" => JobCategory::NonTech,
            _ => JobCategory::Tech,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(contact: &str, preference: Option<&str>) -> CreateProfilePayload {
        serde_json::from_value(json!({
            "branch": "CSE",
            "cgpa": 8.1,
            "collegeName": "Campus Institute",
            "contact": contact,
            "resume": "https://files.test/cv.pdf",
            "jobPreference": preference
        }))
        .unwrap()
    }

    #[test]
    fn contact_must_be_ten_digits() {
        assert!(payload("9876543210", None).check_contact().is_ok());
        assert!(payload("987654321", None).check_contact().is_err());
        assert!(payload("98765-43210", None).check_contact().is_err());
    }

    #[test]
    fn job_preference_defaults_to_tech() {
        assert_eq!(payload("9876543210", None).job_category(), JobCategory::Tech);
        assert_eq!(
            payload("9876543210", Some(" Non-Tech ")).job_category(),
            JobCategory::NonTech
        );
        assert_eq!(payload("9876543210", Some("design")).job_category(), JobCategory::Tech);
    }

    #[test]
    fn cgpa_above_ten_fails_validation() {
        let mut p = payload("9876543210", None);
        p.cgpa = 11.0;
        assert!(p.validate().is_err());
        assert_eq!(p.backlogs, 0);
    }
}
