use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::store::{ApplicationStore, CompanyStore, ProfileStore, UserStore};
use crate::error::{Error, Result};
use crate::models::application::{ApplicationRecord, ApplicationStatus};
use crate::models::company::{CompanyDrive, HiringStages, NewCompanyDrive};
use crate::models::profile::{NewProfile, Profile};
use crate::models::user::{NewUser, Role, User};

const USER_COLUMNS: &str = "id, name, email, role, password_hash, created_at, updated_at";

const PROFILE_COLUMNS: &str = "id, user_id, name, email, branch, cgpa, college_name, contact, backlogs, resume_url, linkedin_link, github_link, leetcode_link, job_preference, created_at, updated_at";

const COMPANY_COLUMNS: &str = "id, name, description, registration_opens_at, registration_closes_at, visit_date, engagement_type, compensation, stipend, required_skills, job_category, aptitude, coding, personal_interview, group_discussion, created_by, created_at, updated_at";

const APPLICATION_COLUMNS: &str =
    "id, profile_id, company_id, status, applied_at, created_at, updated_at";

/// Postgres-backed implementation of every store trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn corrupt(table: &str, detail: String) -> Error {
    Error::Internal(format!("corrupt {} row: {}", table, detail))
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    role: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role.parse().map_err(|e| corrupt("users", e))?,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct ProfileRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    email: String,
    branch: String,
    cgpa: f64,
    college_name: String,
    contact: String,
    backlogs: i32,
    resume_url: Option<String>,
    linkedin_link: Option<String>,
    github_link: Option<String>,
    leetcode_link: Option<String>,
    job_preference: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = Error;

    fn try_from(row: ProfileRow) -> Result<Self> {
        Ok(Profile {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            branch: row.branch,
            cgpa: row.cgpa,
            college_name: row.college_name,
            contact: row.contact,
            backlogs: row.backlogs,
            resume_url: row.resume_url,
            linkedin_link: row.linkedin_link,
            github_link: row.github_link,
            leetcode_link: row.leetcode_link,
            job_preference: row
                .job_preference
                .parse()
                .map_err(|e| corrupt("profiles", e))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct CompanyRow {
    id: Uuid,
    name: String,
    description: String,
    registration_opens_at: DateTime<Utc>,
    registration_closes_at: Option<DateTime<Utc>>,
    visit_date: DateTime<Utc>,
    engagement_type: String,
    compensation: Option<String>,
    stipend: Option<String>,
    required_skills: Vec<String>,
    job_category: String,
    aptitude: bool,
    coding: bool,
    personal_interview: bool,
    group_discussion: bool,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CompanyRow> for CompanyDrive {
    type Error = Error;

    fn try_from(row: CompanyRow) -> Result<Self> {
        Ok(CompanyDrive {
            id: row.id,
            name: row.name,
            description: row.description,
            registration_opens_at: row.registration_opens_at,
            registration_closes_at: row.registration_closes_at,
            visit_date: row.visit_date,
            engagement_type: row
                .engagement_type
                .parse()
                .map_err(|e| corrupt("company_drives", e))?,
            compensation: row.compensation,
            stipend: row.stipend,
            required_skills: row.required_skills,
            job_category: row
                .job_category
                .parse()
                .map_err(|e| corrupt("company_drives", e))?,
            hiring_stages: HiringStages {
                aptitude: row.aptitude,
                coding: row.coding,
                personal_interview: row.personal_interview,
                group_discussion: row.group_discussion,
            },
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct ApplicationRow {
    id: Uuid,
    profile_id: Uuid,
    company_id: Uuid,
    status: String,
    applied_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for ApplicationRecord {
    type Error = Error;

    fn try_from(row: ApplicationRow) -> Result<Self> {
        Ok(ApplicationRecord {
            id: row.id,
            applicant_id: row.profile_id,
            company_id: row.company_id,
            status: row.status.parse().map_err(|e| corrupt("applications", e))?,
            applied_at: row.applied_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = Error>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert(&self, user: NewUser) -> Result<Option<User>> {
        let sql = format!(
            "INSERT INTO users (id, name, email, role, password_hash)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (email) DO NOTHING
             RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.role.as_str())
            .bind(&user.password_hash)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_email_and_role(&self, email: &str, role: Role) -> Result<Option<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE email = $1 AND role = $2",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .bind(role.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn insert(&self, profile: NewProfile) -> Result<Option<Profile>> {
        let sql = format!(
            "INSERT INTO profiles (
                id, user_id, name, email, branch, cgpa, college_name, contact, backlogs,
                resume_url, linkedin_link, github_link, leetcode_link, job_preference
             ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14)
             ON CONFLICT (user_id) DO NOTHING
             RETURNING {}",
            PROFILE_COLUMNS
        );
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(profile.user_id)
            .bind(&profile.name)
            .bind(&profile.email)
            .bind(&profile.branch)
            .bind(profile.cgpa)
            .bind(&profile.college_name)
            .bind(&profile.contact)
            .bind(profile.backlogs)
            .bind(&profile.resume_url)
            .bind(&profile.linkedin_link)
            .bind(&profile.github_link)
            .bind(&profile.leetcode_link)
            .bind(profile.job_preference.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Profile::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let sql = format!("SELECT {} FROM profiles WHERE user_id = $1", PROFILE_COLUMNS);
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Profile::try_from).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>> {
        let sql = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Profile::try_from).transpose()
    }
}

#[async_trait]
impl CompanyStore for PgStore {
    async fn insert(&self, drive: NewCompanyDrive) -> Result<CompanyDrive> {
        let sql = format!(
            "INSERT INTO company_drives (
                id, name, description, registration_opens_at, registration_closes_at,
                visit_date, engagement_type, compensation, stipend, required_skills,
                job_category, aptitude, coding, personal_interview, group_discussion, created_by
             ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16)
             RETURNING {}",
            COMPANY_COLUMNS
        );
        let row = sqlx::query_as::<_, CompanyRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&drive.name)
            .bind(&drive.description)
            .bind(drive.registration_opens_at)
            .bind(drive.registration_closes_at)
            .bind(drive.visit_date)
            .bind(drive.engagement_type.as_str())
            .bind(&drive.compensation)
            .bind(&drive.stipend)
            .bind(&drive.required_skills)
            .bind(drive.job_category.as_str())
            .bind(drive.hiring_stages.aptitude)
            .bind(drive.hiring_stages.coding)
            .bind(drive.hiring_stages.personal_interview)
            .bind(drive.hiring_stages.group_discussion)
            .bind(drive.created_by)
            .fetch_one(&self.pool)
            .await?;
        CompanyDrive::try_from(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CompanyDrive>> {
        let sql = format!("SELECT {} FROM company_drives WHERE id = $1", COMPANY_COLUMNS);
        let row = sqlx::query_as::<_, CompanyRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(CompanyDrive::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<CompanyDrive>> {
        let sql = format!(
            "SELECT {} FROM company_drives ORDER BY created_at DESC, seq DESC",
            COMPANY_COLUMNS
        );
        let rows = sqlx::query_as::<_, CompanyRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        convert_all(rows)
    }

    async fn earliest_upcoming(&self, now: DateTime<Utc>) -> Result<Option<CompanyDrive>> {
        let sql = format!(
            "SELECT {} FROM company_drives
             WHERE visit_date >= $1
             ORDER BY visit_date ASC, created_at ASC, seq ASC
             LIMIT 1",
            COMPANY_COLUMNS
        );
        let row = sqlx::query_as::<_, CompanyRow>(&sql)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        row.map(CompanyDrive::try_from).transpose()
    }
}

#[async_trait]
impl ApplicationStore for PgStore {
    async fn insert_if_absent(
        &self,
        applicant_id: Uuid,
        company_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<ApplicationRecord>> {
        // The unique (profile_id, company_id) constraint makes this a single
        // atomic insert-if-absent; a losing concurrent insert returns no row.
        let sql = format!(
            "INSERT INTO applications (id, profile_id, company_id, status, applied_at, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5, $5)
             ON CONFLICT ON CONSTRAINT applications_one_per_pair DO NOTHING
             RETURNING {}",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(applicant_id)
            .bind(company_id)
            .bind(ApplicationStatus::Applied.as_str())
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        row.map(ApplicationRecord::try_from).transpose()
    }

    async fn find_for_pair(
        &self,
        applicant_id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<ApplicationRecord>> {
        let sql = format!(
            "SELECT {} FROM applications WHERE profile_id = $1 AND company_id = $2",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(applicant_id)
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(ApplicationRecord::try_from).transpose()
    }

    async fn list_by_applicant(&self, applicant_id: Uuid) -> Result<Vec<ApplicationRecord>> {
        let sql = format!(
            "SELECT {} FROM applications WHERE profile_id = $1 ORDER BY created_at DESC, seq DESC",
            APPLICATION_COLUMNS
        );
        let rows = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(applicant_id)
            .fetch_all(&self.pool)
            .await?;
        convert_all(rows)
    }

    async fn list_by_status(&self, status: ApplicationStatus) -> Result<Vec<ApplicationRecord>> {
        let sql = format!(
            "SELECT {} FROM applications WHERE status = $1 ORDER BY updated_at DESC, seq DESC",
            APPLICATION_COLUMNS
        );
        let rows = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await?;
        convert_all(rows)
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<ApplicationRecord>> {
        let sql = format!(
            "SELECT {} FROM applications WHERE company_id = $1 ORDER BY applied_at DESC, seq DESC",
            APPLICATION_COLUMNS
        );
        let rows = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?;
        convert_all(rows)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<ApplicationRecord>> {
        let sql = format!(
            "UPDATE applications SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {}",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(id)
            .bind(status.as_str())
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        row.map(ApplicationRecord::try_from).transpose()
    }

    async fn count_by_company(&self, company_id: Uuid) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM applications WHERE company_id = $1",
        )
        .bind(company_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
