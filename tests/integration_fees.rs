mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{TestApp, create_class, create_student};
use schoolhub_core::Role;
use serde_json::{Value, json};

fn pending_fee(student_id: &str, class_id: &str, amount: f64) -> Value {
    json!({
        "studentId": student_id,
        "classId": class_id,
        "amount": amount,
        "dueDate": "2024-12-01"
    })
}

#[tokio::test]
async fn test_class_fee_summary() {
    let app = TestApp::new();
    let school = app.create_school("ALPHA").await;
    let admin = app.create_admin(&school).await;
    let teacher = app.create_user(Role::Teacher, Some(&school)).await;
    let class_id = create_class(&app, &admin.token, &school).await;
    let (student_id, _) = create_student(&app, &admin.token, &school, &class_id).await;

    let (status, body) = app
        .post("/api/fees", &admin.token, pending_fee(&student_id, &class_id, 1000.0))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["paidAmount"], 0.0);

    let (status, body) = app
        .post(
            "/api/fees",
            &admin.token,
            json!({
                "studentId": student_id,
                "classId": class_id,
                "amount": 500.0,
                "dueDate": "2024-11-01",
                "status": "partial",
                "paidAmount": 200.0,
                "paymentMethod": "cash",
                "receiptNumber": "R-100"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let (status, summary) = app
        .get(&format!("/api/fees/summary/class/{}", class_id), &teacher.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totalAmount"], 1500.0);
    assert_eq!(summary["totalPaid"], 200.0);
    assert_eq!(summary["totalPending"], 1300.0);
    assert_eq!(
        summary["statusCounts"],
        json!({ "pending": 1, "paid": 0, "partial": 1 })
    );

    let (_, fees) = app
        .get(&format!("/api/fees/class/{}", class_id), &teacher.token)
        .await;
    assert_eq!(fees.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_payment_details_are_required_once_paid() {
    let app = TestApp::new();
    let school = app.create_school("ALPHA").await;
    let admin = app.create_admin(&school).await;
    let class_id = create_class(&app, &admin.token, &school).await;
    let (student_id, _) = create_student(&app, &admin.token, &school, &class_id).await;

    let mut paid = pending_fee(&student_id, &class_id, 300.0);
    paid["status"] = json!("paid");
    paid["paidAmount"] = json!(300.0);
    let (status, body) = app.post("/api/fees", &admin.token, paid).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["message"],
        "paymentMethod is required when status is paid or partial"
    );

    let mut overpaid = pending_fee(&student_id, &class_id, 300.0);
    overpaid["paidAmount"] = json!(400.0);
    let (status, _) = app.post("/api/fees", &admin.token, overpaid).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, fee) = app
        .post("/api/fees", &admin.token, pending_fee(&student_id, &class_id, 300.0))
        .await;
    let uri = format!("/api/fees/{}", fee["id"].as_str().unwrap());

    let (status, _) = app
        .put(&uri, &admin.token, json!({ "status": "paid", "paidAmount": 300.0 }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = app
        .put(
            &uri,
            &admin.token,
            json!({
                "status": "paid",
                "paidAmount": 300.0,
                "paymentMethod": "online",
                "receiptNumber": "R-200",
                "paymentDate": "2024-11-20"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["status"], "paid");
    assert_eq!(body["paymentMethod"], "online");
}

#[tokio::test]
async fn test_fee_needs_student_and_class_of_the_school() {
    let app = TestApp::new();
    let alpha = app.create_school("ALPHA").await;
    let beta = app.create_school("BETA").await;
    let admin = app.create_admin(&alpha).await;
    let class_id = create_class(&app, &admin.token, &alpha).await;
    let foreign = app.create_user(Role::Student, Some(&beta)).await;

    let (status, body) = app
        .post(
            "/api/fees",
            &admin.token,
            pending_fee(&foreign.id.to_string(), &class_id, 100.0),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Student not found");
}

#[tokio::test]
async fn test_fee_permissions() {
    let app = TestApp::new();
    let school = app.create_school("ALPHA").await;
    let admin = app.create_admin(&school).await;
    let teacher = app.create_user(Role::Teacher, Some(&school)).await;
    let class_id = create_class(&app, &admin.token, &school).await;
    let (student_id, created) = create_student(&app, &admin.token, &school, &class_id).await;
    let student_login = created["credentials"]["userId"].as_str().unwrap();
    let student_password = created["credentials"]["password"].as_str().unwrap();
    let other = app.create_user(Role::Student, Some(&school)).await;

    let (status, _) = app
        .post("/api/fees", &teacher.token, pending_fee(&student_id, &class_id, 50.0))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, fee) = app
        .post("/api/fees", &admin.token, pending_fee(&student_id, &class_id, 50.0))
        .await;

    let (_, login) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({
                "userId": student_login,
                "password": student_password,
                "schoolId": "ALPHA"
            })),
        )
        .await;
    let student_token = login["token"].as_str().unwrap();

    let (status, body) = app
        .get(&format!("/api/fees/student/{}", student_id), student_token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], fee["id"]);

    let (status, _) = app
        .get(&format!("/api/fees/student/{}", other.id), student_token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .get(&format!("/api/fees/class/{}", class_id), student_token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!("/api/fees/{}", fee["id"].as_str().unwrap());
    let (status, _) = app.delete(&uri, &teacher.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.delete(&uri, &admin.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Fee deleted successfully");

    let (status, _) = app.delete(&uri, &admin.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_school_stats() {
    let app = TestApp::new();
    let school = app.create_school("ALPHA").await;
    let other = app.create_school("BETA").await;
    let admin = app.create_admin(&school).await;
    let other_admin = app.create_admin(&other).await;
    let teacher = app.create_user(Role::Teacher, Some(&school)).await;
    app.create_user(Role::Teacher, Some(&school)).await;
    let class_id = create_class(&app, &admin.token, &school).await;
    let (first, _) = create_student(&app, &admin.token, &school, &class_id).await;
    let (second, _) = create_student(&app, &admin.token, &school, &class_id).await;
    create_class(&app, &other_admin.token, &other).await;

    app.post(
        "/api/attendance/mark",
        &admin.token,
        json!({
            "classId": class_id,
            "date": Utc::now().date_naive(),
            "records": [
                { "studentId": first, "status": "present" },
                { "studentId": second, "status": "absent" }
            ]
        }),
    )
    .await;
    app.post(
        "/api/attendance/mark",
        &admin.token,
        json!({
            "classId": class_id,
            "date": "2020-01-01",
            "records": [{ "studentId": first, "status": "present" }]
        }),
    )
    .await;

    app.post("/api/fees", &admin.token, pending_fee(&first, &class_id, 800.0))
        .await;
    app.post(
        "/api/fees",
        &admin.token,
        json!({
            "studentId": second,
            "classId": class_id,
            "amount": 400.0,
            "dueDate": "2024-11-01",
            "status": "paid",
            "paidAmount": 400.0,
            "paymentMethod": "cheque",
            "receiptNumber": "R-1"
        }),
    )
    .await;

    let (status, stats) = app.get("/api/admin/stats", &admin.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats,
        json!({
            "totalTeachers": 2,
            "totalStudents": 2,
            "totalClasses": 1,
            "totalAttendance": 2,
            "totalFees": 800.0
        })
    );

    let (status, _) = app.get("/api/admin/stats", &teacher.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
