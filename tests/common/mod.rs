#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use http_body_util::BodyExt;
use parking_lot::Mutex;
use schoolhub::router::init_router;
use schoolhub::state::AppState;
use schoolhub::utils::email::{CredentialNotice, Notifier};
use schoolhub_auth::create_access_token;
use schoolhub_config::{JwtConfig, PasswordConfig};
use schoolhub_core::{AppError, Role, hash_password};
use schoolhub_db::{MemoryStore, PrincipalRepository, SchoolRepository};
use schoolhub_models::principals::Principal;
use schoolhub_models::schools::School;
use schoolhub_models::{PrincipalId, SchoolId};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";
pub const TEST_PASSWORD: &str = "testpass123";

pub struct TestUser {
    pub id: PrincipalId,
    pub login_id: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub school_id: Option<SchoolId>,
    pub token: String,
}

/// Keeps every credential notice handed to it.
#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<CredentialNotice>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_credentials(&self, notice: &CredentialNotice) -> Result<(), AppError> {
        self.notices.lock().push(notice.clone());
        Ok(())
    }
}

/// An SMTP server that is always down.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send_credentials(&self, _notice: &CredentialNotice) -> Result<(), AppError> {
        Err(AppError::internal_error("SMTP connection refused"))
    }
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig::new(TEST_JWT_SECRET).unwrap()
}

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(|state| state)
    }

    /// Builds the app with extra state tweaks applied after the defaults.
    pub fn with(configure: impl FnOnce(AppState) -> AppState) -> Self {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let state = AppState::new(store.clone(), jwt_config())
            .with_password_config(PasswordConfig { bcrypt_cost: 4 })
            .with_notifier(notifier.clone());

        Self {
            store,
            state: configure(state),
            notifier,
        }
    }

    pub fn router(&self) -> Router {
        init_router(self.state.clone())
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request("GET", uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request("DELETE", uri, Some(token), None).await
    }

    /// Sends a `data` JSON part plus an `image` part.
    pub async fn multipart(
        &self,
        method: &str,
        uri: &str,
        token: &str,
        data: &Value,
        image_type: &str,
        image: &[u8],
    ) -> (StatusCode, Value) {
        let boundary = "SCHOOLHUBBOUNDARY";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"data\"\r\n\r\n{data}\r\n\
                 --{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"photo\"\r\nContent-Type: {t}\r\n\r\n",
                b = boundary,
                data = data,
                t = image_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(image);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {}", token))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap();

        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    pub async fn create_school(&self, code: &str) -> SchoolId {
        let now = Utc::now();
        let school = School {
            school_id: SchoolId::new(code),
            name: format!("School {}", code),
            address: "1 Main Street".to_string(),
            contact_email: format!("office@{}.test", code.to_lowercase()),
            contact_phone: "555-0100".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_school(&school).await.unwrap();
        school.school_id
    }

    pub async fn create_user(&self, role: Role, school_id: Option<&SchoolId>) -> TestUser {
        let suffix = Uuid::new_v4().simple().to_string();
        let login_id = format!("u{}", &suffix[..10]);
        let email = generate_unique_email();

        let principal = Principal::new(
            role,
            school_id.cloned(),
            login_id.clone(),
            email.clone(),
            hash_password(TEST_PASSWORD, 4).unwrap(),
            "Test",
            role.as_str(),
        );
        self.store.insert_principal(&principal).await.unwrap();

        TestUser {
            id: principal.id,
            login_id,
            email,
            password: TEST_PASSWORD.to_string(),
            role,
            school_id: principal.school_id.clone(),
            token: token_for(principal.id, role),
        }
    }

    pub async fn create_super_admin(&self) -> TestUser {
        self.create_user(Role::SuperAdmin, None).await
    }

    pub async fn create_admin(&self, school_id: &SchoolId) -> TestUser {
        self.create_user(Role::Admin, Some(school_id)).await
    }

    /// Waits for background credential tasks to reach the notifier.
    pub async fn wait_for_notices(&self, count: usize) -> Vec<CredentialNotice> {
        for _ in 0..100 {
            if self.notifier.notices.lock().len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.notifier.notices.lock().clone()
    }
}

pub fn token_for(id: PrincipalId, role: Role) -> String {
    create_access_token(id.into_inner(), role, &jwt_config()).unwrap()
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

pub async fn create_class(app: &TestApp, token: &str, school_id: &SchoolId) -> String {
    let (status, body) = app
        .post(
            &format!("/api/admin/classes?schoolId={}", school_id),
            token,
            serde_json::json!({ "name": "Grade 5", "section": "A", "capacity": 30 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_str().unwrap().to_string()
}

pub async fn create_student(
    app: &TestApp,
    token: &str,
    school_id: &SchoolId,
    class_id: &str,
) -> (String, Value) {
    let (status, body) = app
        .post(
            &format!("/api/admin/students?schoolId={}", school_id),
            token,
            serde_json::json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": generate_unique_email(),
                "classId": class_id,
                "admissionYear": 2024
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    (body["student"]["id"].as_str().unwrap().to_string(), body)
}
