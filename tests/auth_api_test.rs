mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn register_login_and_logout() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "name": "Asha",
                "email": "Asha@Campus.test",
                "password": "hunter22",
                "role": "student"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["user"]["email"], "asha@campus.test");
    assert_eq!(body["user"]["role"], "student");
    assert!(body["user"]["token"].as_str().is_some());
    assert!(body["user"].get("password").is_none());

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "name": "Asha 2", "email": "asha@campus.test", "password": "another1" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User already exists");

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "asha@campus.test", "password": "hunter22", "role": "student" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["user"]["token"].as_str().unwrap().to_string();

    let (status, body) = app
        .send(Method::POST, "/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = TestApp::new();
    app.send(
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "name": "Dean", "email": "dean@campus.test", "password": "secret1", "role": "admin" })),
    )
    .await;

    for attempt in [
        json!({ "email": "dean@campus.test", "password": "wrong-pass", "role": "admin" }),
        json!({ "email": "dean@campus.test", "password": "secret1", "role": "student" }),
        json!({ "email": "nobody@campus.test", "password": "secret1", "role": "admin" }),
    ] {
        let (status, body) = app
            .send(Method::POST, "/auth/login", None, Some(attempt))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid credentials");
    }
}

#[tokio::test]
async fn incomplete_payloads_are_bad_requests() {
    let app = TestApp::new();

    let (status, _) = app
        .send(Method::POST, "/auth/register", None, Some(json!({ "email": "x@campus.test" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "x@campus.test", "password": "secret1" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please provide email and password");
}

#[tokio::test]
async fn health_reports_storage_backend() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["storage"], "memory");
}
