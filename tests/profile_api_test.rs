mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value as JsonValue};

use common::{drive_body, TestApp};

async fn register(app: &TestApp, name: &str, role: &str) -> String {
    let (status, body) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "name": name,
                "email": format!("{}@campus.test", name.to_lowercase()),
                "password": "secret12",
                "role": role
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["user"]["token"].as_str().unwrap().to_string()
}

fn profile_body() -> JsonValue {
    json!({
        "branch": "ECE",
        "cgpa": 7.9,
        "collegeName": "Campus Institute",
        "contact": "9876543210",
        "backlogs": 1,
        "resume": "https://files.test/neha.pdf",
        "githubLink": "https://github.com/neha",
        "jobPreference": "non-tech"
    })
}

#[tokio::test]
async fn registered_student_can_create_profile_and_apply() {
    let app = TestApp::new();
    let student = register(&app, "Neha", "student").await;

    let (status, body) = app
        .send(Method::POST, "/profile/add", Some(&student), Some(profile_body()))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["name"], "Neha");
    assert_eq!(body["data"]["email"], "neha@campus.test");
    assert_eq!(body["data"]["jobPreference"], "non-tech");
    assert_eq!(body["data"]["resumeUrl"], "https://files.test/neha.pdf");
    let profile_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .send(Method::POST, "/profile/add", Some(&student), Some(profile_body()))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Profile already exists");

    let (status, body) = app.get("/profile/me", &student).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], profile_id.as_str());

    let admin = app.admin_token();
    let company_id = app.create_drive(&admin, drive_body("Acme", -1, 5, 10)).await;
    let (status, body) = app.apply(&student, &company_id).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["applicantId"], profile_id.as_str());
}

#[tokio::test]
async fn profile_rules() {
    let app = TestApp::new();

    let admin = register(&app, "Dean", "admin").await;
    let (status, body) = app
        .send(Method::POST, "/profile/add", Some(&admin), Some(profile_body()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Only students can create a profile.");

    let student = register(&app, "Omar", "student").await;
    let (status, body) = app.get("/profile/me", &student).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No profile found for this user");

    let mut bad_contact = profile_body();
    bad_contact["contact"] = json!("12345");
    let (status, body) = app
        .send(Method::POST, "/profile/add", Some(&student), Some(bad_contact))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid contact number");

    let mut no_resume = profile_body();
    no_resume.as_object_mut().unwrap().remove("resume");
    let (status, body) = app
        .send(Method::POST, "/profile/add", Some(&student), Some(no_resume))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}
