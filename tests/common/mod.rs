#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

use placement_backend::{
    config::Config,
    database::Stores,
    models::{
        company::JobCategory,
        profile::{NewProfile, Profile},
        user::Role,
    },
    routes::build_router,
    utils::token::issue_token,
    AppState,
};

pub const JWT_SECRET: &str = "test_secret_key";

pub fn test_config(enforce_registration_window: bool) -> Config {
    Config {
        server_address: "127.0.0.1:0".into(),
        database_url: None,
        jwt_secret: JWT_SECRET.into(),
        jwt_ttl_hours: 1,
        campus_utc_offset_minutes: 0,
        enforce_registration_window,
        max_body_bytes: 64 * 1024,
        log_json: false,
    }
}

pub struct TestApp {
    pub router: Router,
    pub stores: Stores,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config(false))
    }

    pub fn with_config(config: Config) -> Self {
        let stores = Stores::in_memory();
        let state = AppState::new(config, stores.clone(), "memory");
        Self {
            router: build_router(state),
            stores,
        }
    }

    pub fn admin_token(&self) -> String {
        issue_token(Uuid::new_v4(), Role::Admin, JWT_SECRET, 1).expect("admin token")
    }

    /// A student user with a bearer token but no applicant profile.
    pub fn bare_student_token(&self) -> String {
        issue_token(Uuid::new_v4(), Role::Student, JWT_SECRET, 1).expect("student token")
    }

    /// A student user with an applicant profile.
    pub async fn student(&self, name: &str) -> (String, Profile) {
        let user_id = Uuid::new_v4();
        let profile = self
            .stores
            .profiles
            .insert(NewProfile {
                user_id,
                name: name.to_string(),
                email: format!("{}@campus.test", name.to_lowercase()),
                branch: "CSE".into(),
                cgpa: 8.4,
                college_name: "Campus Institute".into(),
                contact: "9999999999".into(),
                backlogs: 0,
                resume_url: Some(format!("https://files.test/{}.pdf", name)),
                linkedin_link: None,
                github_link: Some(format!("https://github.com/{}", name)),
                leetcode_link: None,
                job_preference: JobCategory::Tech,
            })
            .await
            .expect("seed profile")
            .expect("user has no profile yet");
        let token = issue_token(user_id, Role::Student, JWT_SECRET, 1).expect("student token");
        (token, profile)
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<JsonValue>,
    ) -> (StatusCode, JsonValue) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };

        let res = self.router.clone().oneshot(req).await.expect("response");
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        let json = if bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, JsonValue) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    /// Posts a drive as admin and returns its id.
    pub async fn create_drive(&self, admin: &str, body: JsonValue) -> String {
        let (status, json) = self
            .send(Method::POST, "/company/add", Some(admin), Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create drive: {}", json);
        json["data"]["id"].as_str().expect("drive id").to_string()
    }

    pub async fn apply(&self, token: &str, company_id: &str) -> (StatusCode, JsonValue) {
        self.send(
            Method::POST,
            "/application/apply",
            Some(token),
            Some(json!({ "companyId": company_id })),
        )
        .await
    }
}

/// Drive payload with a window and visit expressed in days from now.
pub fn drive_body(name: &str, opens_in: i64, closes_in: i64, visit_in: i64) -> JsonValue {
    let now = Utc::now();
    drive_body_at(name, opens_in, closes_in, now + Duration::days(visit_in))
}

/// Same as [`drive_body`] with an exact visit instant.
pub fn drive_body_at(name: &str, opens_in: i64, closes_in: i64, visit: DateTime<Utc>) -> JsonValue {
    let now = Utc::now();
    json!({
        "name": name,
        "description": format!("{} campus hiring", name),
        "registrationOpensAt": (now + Duration::days(opens_in)).to_rfc3339(),
        "registrationClosesAt": (now + Duration::days(closes_in)).to_rfc3339(),
        "visitDate": visit.to_rfc3339(),
        "engagementType": "job",
        "compensation": "12 LPA",
        "requiredSkills": ["Rust", "SQL"],
        "jobCategory": "tech",
        "hiringStages": { "aptitude": true, "coding": true, "personalInterview": true }
    })
}
