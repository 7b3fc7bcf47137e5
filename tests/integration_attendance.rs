mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{TestApp, create_class, create_student};
use schoolhub_config::{AttendanceConfig, AttendancePolicy};
use schoolhub_core::Role;
use serde_json::json;

#[tokio::test]
async fn test_repeated_mark_replaces_earlier_one() {
    let app = TestApp::new();
    let school = app.create_school("ALPHA").await;
    let admin = app.create_admin(&school).await;
    let teacher = app.create_user(Role::Teacher, Some(&school)).await;
    let class_id = create_class(&app, &admin.token, &school).await;
    let (student_id, _) = create_student(&app, &admin.token, &school, &class_id).await;

    for status in ["absent", "late"] {
        let (code, body) = app
            .post(
                "/api/attendance/mark",
                &teacher.token,
                json!({
                    "classId": class_id,
                    "date": "2024-10-01",
                    "records": [{ "studentId": student_id, "status": status }]
                }),
            )
            .await;
        assert_eq!(code, StatusCode::CREATED, "{}", body);
        assert_eq!(body["message"], "Attendance marked successfully");
    }

    let (status, body) = app
        .get(
            &format!("/api/attendance/class/{}?date=2024-10-01", class_id),
            &teacher.token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["status"], "late");
    assert_eq!(records[0]["markedBy"], teacher.id.to_string());
}

#[tokio::test]
async fn test_append_policy_keeps_every_mark() {
    let app = TestApp::with(|state| {
        state.with_attendance_config(AttendanceConfig {
            policy: AttendancePolicy::Append,
        })
    });
    let school = app.create_school("ALPHA").await;
    let admin = app.create_admin(&school).await;
    let class_id = create_class(&app, &admin.token, &school).await;
    let (student_id, _) = create_student(&app, &admin.token, &school, &class_id).await;

    for status in ["absent", "present"] {
        let (code, _) = app
            .post(
                "/api/attendance/mark",
                &admin.token,
                json!({
                    "classId": class_id,
                    "date": "2024-10-01",
                    "attendanceData": [{ "studentId": student_id, "status": status }]
                }),
            )
            .await;
        assert_eq!(code, StatusCode::CREATED);
    }

    let (_, body) = app
        .get(
            &format!("/api/attendance/class/{}?date=2024-10-01", class_id),
            &admin.token,
        )
        .await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_marking_a_foreign_student_writes_nothing() {
    let app = TestApp::new();
    let alpha = app.create_school("ALPHA").await;
    let beta = app.create_school("BETA").await;
    let admin = app.create_admin(&alpha).await;
    let class_id = create_class(&app, &admin.token, &alpha).await;
    let (student_id, _) = create_student(&app, &admin.token, &alpha, &class_id).await;
    let foreign = app.create_user(Role::Student, Some(&beta)).await;

    let (status, body) = app
        .post(
            "/api/attendance/mark",
            &admin.token,
            json!({
                "classId": class_id,
                "date": "2024-10-01",
                "records": [
                    { "studentId": student_id, "status": "present" },
                    { "studentId": foreign.id, "status": "present" }
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Student not found");

    let (_, body) = app
        .get(
            &format!("/api/attendance/class/{}?date=2024-10-01", class_id),
            &admin.token,
        )
        .await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_marking_needs_a_non_empty_batch_and_staff() {
    let app = TestApp::new();
    let school = app.create_school("ALPHA").await;
    let admin = app.create_admin(&school).await;
    let student = app.create_user(Role::Student, Some(&school)).await;
    let class_id = create_class(&app, &admin.token, &school).await;

    let (status, _) = app
        .post(
            "/api/attendance/mark",
            &admin.token,
            json!({ "classId": class_id, "date": "2024-10-01", "records": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .post(
            "/api/attendance/mark",
            &student.token,
            json!({
                "classId": class_id,
                "date": "2024-10-01",
                "records": [{ "studentId": student.id, "status": "present" }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_student_reads_only_own_history() {
    let app = TestApp::new();
    let school = app.create_school("ALPHA").await;
    let admin = app.create_admin(&school).await;
    let class_id = create_class(&app, &admin.token, &school).await;
    let student = app.create_user(Role::Student, Some(&school)).await;
    let classmate = app.create_user(Role::Student, Some(&school)).await;

    for date in ["2024-10-01", "2024-10-02", "2024-10-03"] {
        app.post(
            "/api/attendance/mark",
            &admin.token,
            json!({
                "classId": class_id,
                "date": date,
                "records": [{ "studentId": student.id, "status": "present" }]
            }),
        )
        .await;
    }

    let own = format!("/api/attendance/student/{}", student.id);
    let (status, body) = app.get(&own, &student.token).await;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-10-03", "2024-10-02", "2024-10-01"]);

    let (_, body) = app
        .get(
            &format!("{}?startDate=2024-10-02&endDate=2024-10-02", own),
            &student.token,
        )
        .await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = app
        .get(
            &format!("{}?startDate=2024-10-03&endDate=2024-10-01", own),
            &student.token,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .get(&format!("/api/attendance/student/{}", classmate.id), &student.token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get(&own, &admin.token).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_attendance_record() {
    let app = TestApp::new();
    let school = app.create_school("ALPHA").await;
    let admin = app.create_admin(&school).await;
    let class_id = create_class(&app, &admin.token, &school).await;
    let (student_id, _) = create_student(&app, &admin.token, &school, &class_id).await;
    let today = Utc::now().date_naive().to_string();

    let (_, marked) = app
        .post(
            "/api/attendance/mark",
            &admin.token,
            json!({
                "classId": class_id,
                "date": today,
                "records": [{ "studentId": student_id, "status": "absent" }]
            }),
        )
        .await;
    let id = marked["records"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .put(
            &format!("/api/attendance/{}", id),
            &admin.token,
            json!({ "status": "present", "remarks": "Arrived with a note" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["status"], "present");
    assert_eq!(body["remarks"], "Arrived with a note");

    // Without a date the class report covers today.
    let (_, body) = app
        .get(&format!("/api/attendance/class/{}", class_id), &admin.token)
        .await;
    assert_eq!(body[0]["status"], "present");
}
