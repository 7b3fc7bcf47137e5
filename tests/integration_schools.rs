mod common;

use axum::http::StatusCode;
use common::{TestApp, generate_unique_email};
use schoolhub_core::Role;
use schoolhub_db::ClassRepository;
use schoolhub_models::SchoolId;
use serde_json::json;

#[tokio::test]
async fn test_list_schools_as_super_admin() {
    let app = TestApp::new();
    let super_admin = app.create_super_admin().await;
    app.create_school("BETA").await;
    app.create_school("ALPHA").await;

    let (status, body) = app.get("/api/schools", &super_admin.token).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["School ALPHA", "School BETA"]);
}

#[tokio::test]
async fn test_list_schools_forbidden_for_school_admin() {
    let app = TestApp::new();
    let school = app.create_school("ALPHA").await;
    let admin = app.create_admin(&school).await;

    let (status, _) = app.get("/api/schools", &admin.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_reads_only_own_school() {
    let app = TestApp::new();
    let school = app.create_school("ALPHA").await;
    app.create_school("BETA").await;
    let admin = app.create_admin(&school).await;

    let (status, body) = app.get("/api/schools/ALPHA", &admin.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["schoolId"], "ALPHA");

    let (status, body) = app.get("/api/schools/BETA", &admin.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied: Not authorized for this school");
}

#[tokio::test]
async fn test_update_school_as_admin() {
    let app = TestApp::new();
    let school = app.create_school("ALPHA").await;
    let admin = app.create_admin(&school).await;
    let teacher = app.create_user(Role::Teacher, Some(&school)).await;

    let (status, body) = app
        .put(
            "/api/schools/ALPHA",
            &admin.token,
            json!({ "name": "Alpha Renamed", "contactPhone": "555-0000" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["name"], "Alpha Renamed");
    assert_eq!(body["contactPhone"], "555-0000");
    assert_eq!(body["address"], "1 Main Street");

    let (status, _) = app
        .put("/api/schools/ALPHA", &teacher.token, json!({ "name": "Nope" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_deactivating_school_locks_out_its_accounts() {
    let app = TestApp::new();
    let super_admin = app.create_super_admin().await;
    let school = app.create_school("ALPHA").await;
    let other = app.create_school("BETA").await;
    let admin = app.create_admin(&school).await;
    let teacher = app.create_user(Role::Teacher, Some(&school)).await;
    app.create_user(Role::Student, Some(&school)).await;
    let outsider = app.create_admin(&other).await;

    let (status, body) = app.delete("/api/schools/ALPHA", &super_admin.token).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["deactivatedUsers"], 3);

    let (status, _) = app.get("/api/auth/me", &admin.token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({
                "userId": teacher.login_id,
                "password": teacher.password,
                "schoolId": "ALPHA"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/auth/me", &outsider.token).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/schools", &super_admin.token).await;
    let codes: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["schoolId"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["BETA"]);
}

#[tokio::test]
async fn test_deactivate_school_requires_super_admin() {
    let app = TestApp::new();
    let school = app.create_school("ALPHA").await;
    let admin = app.create_admin(&school).await;

    let (status, _) = app.delete("/api/schools/ALPHA", &admin.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/auth/me", &admin.token).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_deactivate_unknown_school_is_not_found() {
    let app = TestApp::new();
    let super_admin = app.create_super_admin().await;

    let (status, body) = app.delete("/api/schools/NOPE", &super_admin.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "School not found");
}

#[tokio::test]
async fn test_super_admin_scope_must_name_an_active_school() {
    let app = TestApp::new();
    let super_admin = app.create_super_admin().await;
    app.create_school("ALPHA").await;

    let (status, body) = app
        .post(
            "/api/admin/classes?schoolId=GHOST",
            &super_admin.token,
            json!({ "name": "Grade 6", "section": "A", "capacity": 30 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "School not found");
    let ghost_classes = app.store.list_classes(&SchoolId::from("GHOST")).await.unwrap();
    assert!(ghost_classes.is_empty());

    let (status, _) = app
        .get("/api/admin/teachers?schoolId=ALPHA", &super_admin.token)
        .await;
    assert_eq!(status, StatusCode::OK);

    app.delete("/api/schools/ALPHA", &super_admin.token).await;
    let (status, body) = app
        .get("/api/admin/teachers?schoolId=ALPHA", &super_admin.token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "School not found");
}

#[tokio::test]
async fn test_school_update_checks_role_before_body() {
    let app = TestApp::new();
    let school = app.create_school("ALPHA").await;
    let teacher = app.create_user(Role::Teacher, Some(&school)).await;

    let (status, body) = app
        .put(
            "/api/schools/ALPHA",
            &teacher.token,
            json!({ "contactEmail": "not-an-email" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied: insufficient permissions");

    let (status, body) = app.get("/api/schools/ALPHA", &teacher.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "School ALPHA");
}

#[tokio::test]
async fn test_super_admin_adds_admin_to_existing_school() {
    let app = TestApp::new();
    let super_admin = app.create_super_admin().await;
    let school = app.create_school("ALPHA").await;
    let existing = app.create_admin(&school).await;
    let email = generate_unique_email();

    let (status, body) = app
        .post(
            "/api/schools/ALPHA/admins",
            &super_admin.token,
            json!({
                "firstName": "Grace",
                "lastName": "Hopper",
                "email": email,
                "admissionDate": "2024-09-01"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["message"], "Admin created successfully");
    assert_eq!(body["admin"]["role"], "ADMIN");
    assert_eq!(body["admin"]["schoolId"], "ALPHA");
    let user_id = body["credentials"]["userId"].as_str().unwrap();
    assert_eq!(user_id.len(), 8);
    assert!(user_id.starts_with("024"));

    let notices = app.wait_for_notices(1).await;
    assert_eq!(notices[0].to, email);
    assert_eq!(notices[0].role, Role::Admin);

    let (status, login) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({
                "userId": user_id,
                "password": body["credentials"]["password"],
                "schoolId": "ALPHA"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", login);
    assert_eq!(login["user"]["role"], "ADMIN");

    let (status, body) = app
        .post(
            "/api/schools/ALPHA/admins",
            &super_admin.token,
            json!({ "firstName": "Ada", "lastName": "L", "email": existing.email }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already in use");
}

#[tokio::test]
async fn test_adding_admin_needs_super_admin_and_active_school() {
    let app = TestApp::new();
    let super_admin = app.create_super_admin().await;
    let school = app.create_school("ALPHA").await;
    let admin = app.create_admin(&school).await;
    let new_admin = || {
        json!({
            "firstName": "Ada",
            "lastName": "L",
            "email": generate_unique_email()
        })
    };

    let (status, _) = app
        .post("/api/schools/ALPHA/admins", &admin.token, new_admin())
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post("/api/schools/GHOST/admins", &super_admin.token, new_admin())
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "School not found");

    app.delete("/api/schools/ALPHA", &super_admin.token).await;
    let (status, _) = app
        .post("/api/schools/ALPHA/admins", &super_admin.token, new_admin())
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_platform_stats() {
    let app = TestApp::new();
    let super_admin = app.create_super_admin().await;
    let alpha = app.create_school("ALPHA").await;
    let beta = app.create_school("BETA").await;
    let admin = app.create_admin(&alpha).await;
    app.create_user(Role::Teacher, Some(&alpha)).await;
    app.create_user(Role::Teacher, Some(&alpha)).await;
    app.create_user(Role::Student, Some(&alpha)).await;
    app.create_admin(&beta).await;
    app.create_user(Role::Student, Some(&beta)).await;

    let (status, stats) = app.get("/api/super-admin/stats", &super_admin.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats,
        json!({
            "totalSchools": 2,
            "totalUsers": 7,
            "userBreakdown": { "admins": 2, "teachers": 2, "students": 2 }
        })
    );

    app.delete("/api/schools/BETA", &super_admin.token).await;
    let (_, stats) = app.get("/api/super-admin/stats", &super_admin.token).await;
    assert_eq!(stats["totalSchools"], 1);
    assert_eq!(stats["totalUsers"], 5);
    assert_eq!(stats["userBreakdown"]["admins"], 1);

    let (status, _) = app.get("/api/super-admin/stats", &admin.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
