//! Derives the status a student sees for a drive from the registration
//! window and any existing application. Every view that shows a drive's
//! status goes through [`EligibilityEvaluator::evaluate`].

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Serialize, Serializer};

use crate::models::application::{ApplicationRecord, ApplicationStatus};
use crate::models::company::CompanyDrive;
use crate::utils::time::end_of_day;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedStatus {
    /// Registration open and no application yet.
    Apply,
    /// Registration over and no application.
    Closed,
    Status(ApplicationStatus),
}

impl DerivedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DerivedStatus::Apply => "Apply",
            DerivedStatus::Closed => "Closed",
            DerivedStatus::Status(status) => status.as_str(),
        }
    }
}

impl Serialize for DerivedStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EligibilityEvaluator {
    offset: FixedOffset,
}

impl EligibilityEvaluator {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Registration stays open through 23:59:59.999 of the closing day.
    /// A drive without a closing date counts as closed.
    pub fn registration_closed(&self, drive: &CompanyDrive, now: DateTime<Utc>) -> bool {
        match drive.registration_closes_at {
            Some(closes_at) => now > end_of_day(closes_at, self.offset),
            None => true,
        }
    }

    pub fn evaluate(
        &self,
        drive: &CompanyDrive,
        now: DateTime<Utc>,
        application: Option<&ApplicationRecord>,
    ) -> DerivedStatus {
        if let Some(application) = application {
            return DerivedStatus::Status(application.status);
        }
        if self.registration_closed(drive, now) {
            DerivedStatus::Closed
        } else {
            DerivedStatus::Apply
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::company::{EngagementType, HiringStages, JobCategory};
    use uuid::Uuid;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn drive(closes_at: Option<&str>) -> CompanyDrive {
        CompanyDrive {
            id: Uuid::new_v4(),
            name: "Acme".into(),
            description: "Graduate hiring".into(),
            registration_opens_at: at("2025-01-01T00:00:00Z"),
            registration_closes_at: closes_at.map(at),
            visit_date: at("2025-01-20T00:00:00Z"),
            engagement_type: EngagementType::Job,
            compensation: Some("12 LPA".into()),
            stipend: None,
            required_skills: vec!["Rust".into()],
            job_category: JobCategory::Tech,
            hiring_stages: HiringStages::default(),
            created_by: Uuid::new_v4(),
            created_at: at("2024-12-20T00:00:00Z"),
            updated_at: at("2024-12-20T00:00:00Z"),
        }
    }

    fn application(drive: &CompanyDrive, status: ApplicationStatus) -> ApplicationRecord {
        ApplicationRecord {
            id: Uuid::new_v4(),
            applicant_id: Uuid::new_v4(),
            company_id: drive.id,
            status,
            applied_at: at("2025-01-02T00:00:00Z"),
            created_at: at("2025-01-02T00:00:00Z"),
            updated_at: at("2025-01-02T00:00:00Z"),
        }
    }

    fn utc_evaluator() -> EligibilityEvaluator {
        EligibilityEvaluator::new(FixedOffset::east_opt(0).unwrap())
    }

    #[test]
    fn open_through_the_whole_closing_day() {
        let d = drive(Some("2025-01-10T00:00:00Z"));
        let eval = utc_evaluator();

        assert_eq!(eval.evaluate(&d, at("2025-01-05T12:00:00Z"), None), DerivedStatus::Apply);
        assert_eq!(eval.evaluate(&d, at("2025-01-10T20:00:00Z"), None), DerivedStatus::Apply);
        assert_eq!(
            eval.evaluate(&d, at("2025-01-10T23:59:59.999Z"), None),
            DerivedStatus::Apply
        );
        assert_eq!(eval.evaluate(&d, at("2025-01-11T00:00:01Z"), None), DerivedStatus::Closed);
    }

    #[test]
    fn closing_day_is_reckoned_in_campus_offset() {
        // Closes on 10 Jan IST (stored as 18:30 UTC on the 9th).
        let d = drive(Some("2025-01-09T18:30:00Z"));
        let ist = EligibilityEvaluator::new(FixedOffset::east_opt(330 * 60).unwrap());

        assert_eq!(ist.evaluate(&d, at("2025-01-10T18:00:00Z"), None), DerivedStatus::Apply);
        assert_eq!(ist.evaluate(&d, at("2025-01-10T18:30:00Z"), None), DerivedStatus::Closed);
    }

    #[test]
    fn existing_application_wins_over_window() {
        let d = drive(Some("2025-01-10T00:00:00Z"));
        let eval = utc_evaluator();
        for status in ApplicationStatus::ALL {
            let app = application(&d, status);
            for now in ["2025-01-03T00:00:00Z", "2025-03-01T00:00:00Z"] {
                assert_eq!(
                    eval.evaluate(&d, at(now), Some(&app)),
                    DerivedStatus::Status(status)
                );
            }
        }
    }

    #[test]
    fn missing_closing_date_fails_safe() {
        let d = drive(None);
        let eval = utc_evaluator();
        assert!(eval.registration_closed(&d, at("2024-01-01T00:00:00Z")));
        assert_eq!(eval.evaluate(&d, at("2024-01-01T00:00:00Z"), None), DerivedStatus::Closed);
    }

    #[test]
    fn serializes_as_display_label() {
        let json = serde_json::to_string(&DerivedStatus::Status(ApplicationStatus::Hired)).unwrap();
        assert_eq!(json, "\"Hired\"");
        assert_eq!(serde_json::to_string(&DerivedStatus::Apply).unwrap(), "\"Apply\"");
    }
}
