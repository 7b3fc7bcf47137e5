mod common;

use axum::http::StatusCode;
use common::{TestApp, token_for};
use schoolhub_auth::create_access_token;
use schoolhub_config::{JwtConfig, RateLimitConfig};
use schoolhub_core::Role;
use schoolhub_models::PrincipalId;
use serde_json::json;

#[tokio::test]
async fn test_login_with_login_id_records_last_login() {
    let app = TestApp::new();
    let school = app.create_school("GF-01").await;
    let admin = app.create_admin(&school).await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({
                "userId": admin.login_id,
                "password": admin.password,
                "schoolId": school
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["user"]["role"], "ADMIN");
    assert_eq!(body["user"]["schoolId"], "GF-01");
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = app.get("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], admin.id.to_string());
    assert!(me["lastLogin"].is_string());
}

#[tokio::test]
async fn test_login_accepts_email() {
    let app = TestApp::new();
    let school = app.create_school("GF-01").await;
    let teacher = app.create_user(Role::Teacher, Some(&school)).await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({
                "userId": teacher.email,
                "password": teacher.password,
                "schoolId": school
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["user"]["userId"], teacher.login_id);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    let school = app.create_school("GF-01").await;
    let other = app.create_school("OTHER").await;
    let admin = app.create_admin(&school).await;

    let attempts = [
        json!({ "userId": admin.login_id, "password": "wrong-password", "schoolId": school }),
        json!({ "userId": "nobody", "password": admin.password, "schoolId": school }),
        json!({ "userId": admin.login_id, "password": admin.password, "schoolId": other }),
        json!({ "userId": admin.login_id, "password": admin.password, "schoolId": school, "role": "TEACHER" }),
        json!({ "userId": admin.login_id, "password": admin.password }),
    ];

    for attempt in attempts {
        let (status, body) = app
            .request("POST", "/api/auth/login", None, Some(attempt))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid credentials");
    }
}

#[tokio::test]
async fn test_super_admin_logs_in_without_school() {
    let app = TestApp::new();
    let super_admin = app.create_super_admin().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "userId": super_admin.login_id, "password": super_admin.password })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["user"]["role"], "SUPER_ADMIN");
    assert!(body["user"].get("schoolId").is_none());
}

#[tokio::test]
async fn test_login_missing_field_is_bad_request() {
    let app = TestApp::new();

    let (status, body) = app
        .request("POST", "/api/auth/login", None, Some(json!({ "userId": "x" })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "password is required");
}

#[tokio::test]
async fn test_me_rejects_missing_and_foreign_tokens() {
    let app = TestApp::new();
    let school = app.create_school("GF-01").await;
    let admin = app.create_admin(&school).await;

    let (status, _) = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let foreign = JwtConfig::new("some-other-secret").unwrap();
    let forged = create_access_token(admin.id.into_inner(), Role::Admin, &foreign).unwrap();
    let (status, _) = app.get("/api/auth/me", &forged).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut tampered = admin.token.clone();
    tampered.push('x');
    let (status, _) = app.get("/api/auth/me", &tampered).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/auth/me", &admin.token).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_token_for_unknown_principal_is_rejected() {
    let app = TestApp::new();
    let token = token_for(PrincipalId::new(), Role::Admin);

    let (status, _) = app.get("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_with_stale_role_is_rejected() {
    let app = TestApp::new();
    let school = app.create_school("GF-01").await;
    let teacher = app.create_user(Role::Teacher, Some(&school)).await;
    let promoted = token_for(teacher.id, Role::Admin);

    let (status, _) = app.get("/api/auth/me", &promoted).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_check_super_admin() {
    let app = TestApp::new();

    let (status, body) = app
        .request("GET", "/api/auth/check-super-admin", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exists"], false);

    let super_admin = app.create_super_admin().await;
    let (_, body) = app
        .request("GET", "/api/auth/check-super-admin", None, None)
        .await;
    assert_eq!(body["exists"], true);
    assert_eq!(body["userId"], super_admin.login_id);
    assert_eq!(body["email"], super_admin.email);
}

fn registration(school_id: &str, admin_email: &str) -> serde_json::Value {
    json!({
        "name": "Greenfield Academy",
        "schoolId": school_id,
        "address": "12 Elm Road",
        "contactEmail": "office@greenfield.test",
        "contactPhone": "555-0199",
        "adminEmail": admin_email,
        "adminFirstName": "Grace",
        "adminLastName": "Hopper",
        "admissionDate": "2024-09-01"
    })
}

#[tokio::test]
async fn test_register_school_creates_admin_who_can_log_in() {
    let app = TestApp::new();
    let super_admin = app.create_super_admin().await;

    let (status, body) = app
        .post(
            "/api/auth/register-school",
            &super_admin.token,
            registration("GREENFIELD", "grace@greenfield.test"),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["school"]["schoolId"], "GREENFIELD");
    assert_eq!(body["user"]["role"], "ADMIN");
    let user_id = body["credentials"]["userId"].as_str().unwrap().to_string();
    let password = body["credentials"]["password"].as_str().unwrap().to_string();
    assert_eq!(user_id.len(), 8);
    assert!(user_id.starts_with("024"));

    let notices = app.wait_for_notices(1).await;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].to, "grace@greenfield.test");
    assert_eq!(notices[0].login_id, user_id);
    assert_eq!(notices[0].school_name, "Greenfield Academy");

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "userId": user_id, "password": password, "schoolId": "GREENFIELD" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
}

#[tokio::test]
async fn test_register_school_conflicts_write_nothing() {
    let app = TestApp::new();
    let super_admin = app.create_super_admin().await;
    let existing = app.create_school("TAKEN").await;
    let taken = app.create_admin(&existing).await;

    let (status, _) = app
        .post(
            "/api/auth/register-school",
            &super_admin.token,
            registration("TAKEN", "new@school.test"),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .post(
            "/api/auth/register-school",
            &super_admin.token,
            registration("FRESH", &taken.email),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.get("/api/schools/FRESH", &super_admin.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_school_requires_super_admin() {
    let app = TestApp::new();
    let school = app.create_school("GF-01").await;
    let admin = app.create_admin(&school).await;

    let (status, _) = app
        .post(
            "/api/auth/register-school",
            &admin.token,
            registration("SECOND", "second@school.test"),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_register_school_validates_body() {
    let app = TestApp::new();
    let super_admin = app.create_super_admin().await;

    let (status, _) = app
        .post(
            "/api/auth/register-school",
            &super_admin.token,
            registration("bad code!", "admin@school.test"),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_auth_routes_are_rate_limited() {
    let app = TestApp::with(|state| {
        state.with_rate_limit_config(RateLimitConfig {
            enabled: true,
            general_per_second: 60,
            general_burst_size: 100,
            auth_per_second: 1,
            auth_burst_size: 1,
        })
    });
    let login = json!({ "userId": "nobody", "password": "password123" });

    let (status, _) = app
        .request("POST", "/api/auth/login", None, Some(login.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .request("POST", "/api/auth/login", None, Some(login))
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["message"].is_string());

    let (status, _) = app
        .request("GET", "/api/auth/check-super-admin", None, None)
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}
