use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::database::store::{ApplicationStore, CompanyStore, ProfileStore, UserStore};
use crate::error::Result;
use crate::models::application::{ApplicationRecord, ApplicationStatus};
use crate::models::company::{CompanyDrive, NewCompanyDrive};
use crate::models::profile::{NewProfile, Profile};
use crate::models::user::{NewUser, Role, User};

/// Process-local store. Vectors keep insertion order, which is the final
/// tie-break for every ordered listing.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    profiles: Vec<Profile>,
    companies: Vec<CompanyDrive>,
    applications: Vec<ApplicationRecord>,
}

/// Sorts newest-first by `key`, later insertions first among equals.
fn newest_first<T, K, F>(items: impl DoubleEndedIterator<Item = T>, key: F) -> Vec<T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut out: Vec<T> = items.rev().collect();
    out.sort_by_key(|item| Reverse(key(item)));
    out
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: NewUser) -> Result<Option<User>> {
        let mut tables = self.inner.lock().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Ok(None);
        }
        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            role: user.role,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(created.clone());
        Ok(Some(created))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let tables = self.inner.lock().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email_and_role(&self, email: &str, role: Role) -> Result<Option<User>> {
        let tables = self.inner.lock().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email == email && u.role == role)
            .cloned())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn insert(&self, profile: NewProfile) -> Result<Option<Profile>> {
        let mut tables = self.inner.lock().await;
        if tables.profiles.iter().any(|p| p.user_id == profile.user_id) {
            return Ok(None);
        }
        let now = Utc::now();
        let created = Profile {
            id: Uuid::new_v4(),
            user_id: profile.user_id,
            name: profile.name,
            email: profile.email,
            branch: profile.branch,
            cgpa: profile.cgpa,
            college_name: profile.college_name,
            contact: profile.contact,
            backlogs: profile.backlogs,
            resume_url: profile.resume_url,
            linkedin_link: profile.linkedin_link,
            github_link: profile.github_link,
            leetcode_link: profile.leetcode_link,
            job_preference: profile.job_preference,
            created_at: now,
            updated_at: now,
        };
        tables.profiles.push(created.clone());
        Ok(Some(created))
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let tables = self.inner.lock().await;
        Ok(tables.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>> {
        let tables = self.inner.lock().await;
        Ok(tables.profiles.iter().find(|p| p.id == id).cloned())
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn insert(&self, drive: NewCompanyDrive) -> Result<CompanyDrive> {
        let mut tables = self.inner.lock().await;
        let now = Utc::now();
        let created = CompanyDrive {
            id: Uuid::new_v4(),
            name: drive.name,
            description: drive.description,
            registration_opens_at: drive.registration_opens_at,
            registration_closes_at: Some(drive.registration_closes_at),
            visit_date: drive.visit_date,
            engagement_type: drive.engagement_type,
            compensation: drive.compensation,
            stipend: drive.stipend,
            required_skills: drive.required_skills,
            job_category: drive.job_category,
            hiring_stages: drive.hiring_stages,
            created_by: drive.created_by,
            created_at: now,
            updated_at: now,
        };
        tables.companies.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CompanyDrive>> {
        let tables = self.inner.lock().await;
        Ok(tables.companies.iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<CompanyDrive>> {
        let tables = self.inner.lock().await;
        Ok(newest_first(tables.companies.iter().cloned(), |c| c.created_at))
    }

    async fn earliest_upcoming(&self, now: DateTime<Utc>) -> Result<Option<CompanyDrive>> {
        let tables = self.inner.lock().await;
        // min_by_key keeps the first of equal keys, i.e. insertion order.
        Ok(tables
            .companies
            .iter()
            .filter(|c| c.visit_date >= now)
            .min_by_key(|c| (c.visit_date, c.created_at))
            .cloned())
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn insert_if_absent(
        &self,
        applicant_id: Uuid,
        company_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<ApplicationRecord>> {
        // Check and insert happen under one lock acquisition.
        let mut tables = self.inner.lock().await;
        let exists = tables
            .applications
            .iter()
            .any(|a| a.applicant_id == applicant_id && a.company_id == company_id);
        if exists {
            return Ok(None);
        }
        let record = ApplicationRecord {
            id: Uuid::new_v4(),
            applicant_id,
            company_id,
            status: ApplicationStatus::Applied,
            applied_at: now,
            created_at: now,
            updated_at: now,
        };
        tables.applications.push(record.clone());
        Ok(Some(record))
    }

    async fn find_for_pair(
        &self,
        applicant_id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<ApplicationRecord>> {
        let tables = self.inner.lock().await;
        Ok(tables
            .applications
            .iter()
            .find(|a| a.applicant_id == applicant_id && a.company_id == company_id)
            .cloned())
    }

    async fn list_by_applicant(&self, applicant_id: Uuid) -> Result<Vec<ApplicationRecord>> {
        let tables = self.inner.lock().await;
        let matching = tables
            .applications
            .iter()
            .filter(|a| a.applicant_id == applicant_id)
            .cloned()
            .collect::<Vec<_>>();
        Ok(newest_first(matching.into_iter(), |a| a.created_at))
    }

    async fn list_by_status(&self, status: ApplicationStatus) -> Result<Vec<ApplicationRecord>> {
        let tables = self.inner.lock().await;
        let matching = tables
            .applications
            .iter()
            .filter(|a| a.status == status)
            .cloned()
            .collect::<Vec<_>>();
        Ok(newest_first(matching.into_iter(), |a| a.updated_at))
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<ApplicationRecord>> {
        let tables = self.inner.lock().await;
        let matching = tables
            .applications
            .iter()
            .filter(|a| a.company_id == company_id)
            .cloned()
            .collect::<Vec<_>>();
        Ok(newest_first(matching.into_iter(), |a| a.applied_at))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<ApplicationRecord>> {
        let mut tables = self.inner.lock().await;
        Ok(tables.applications.iter_mut().find(|a| a.id == id).map(|a| {
            a.status = status;
            a.updated_at = now;
            a.clone()
        }))
    }

    async fn count_by_company(&self, company_id: Uuid) -> Result<i64> {
        let tables = self.inner.lock().await;
        Ok(tables
            .applications
            .iter()
            .filter(|a| a.company_id == company_id)
            .count() as i64)
    }
}
