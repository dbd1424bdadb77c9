#![allow(dead_code)]

use api::auth::generate_jwt;
use api::routes::routes;
use api::state::AppState;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use db::models::teacher::Role;
use db::{FileStore, Gateway};
use serde_json::Value;
use services::Actor;
use services::teacher_service::{CreateTeacher, TeacherService};
use tempfile::TempDir;
use tower::ServiceExt;
use util::config::AppConfig;

/// A router over a fresh store, an admin and a teacher with tokens.
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub admin: Actor,
    pub admin_token: String,
    pub teacher: Actor,
    pub teacher_token: String,
    _dir: TempDir,
}

/// In-memory primary store, fallback in a temporary directory.
pub async fn make_test_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let primary = db::test_utils::setup_sql_store().await;
    build(Gateway::new(Some(primary), FileStore::new(dir.path())), dir).await
}

/// No primary store at all: every request is served from flat files.
pub async fn make_fallback_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    build(Gateway::new(None, FileStore::new(dir.path())), dir).await
}

async fn build(gateway: Gateway, dir: TempDir) -> TestApp {
    AppConfig::set_jwt_secret("test-secret");

    let state = AppState::new(gateway);
    let session = state.session().await;

    let admin = TeacherService::insert_teacher(
        &session.store,
        CreateTeacher {
            name: "Head".into(),
            email: "head@school.test".into(),
            subject: None,
            role: Role::Admin,
        },
    )
    .await
    .unwrap();
    let admin = Actor::new(admin.id, admin.role);

    let teacher = TeacherService::create(
        &session,
        &admin,
        CreateTeacher {
            name: "Ms Frizzle".into(),
            email: "frizzle@school.test".into(),
            subject: Some("Math".into()),
            role: Role::Teacher,
        },
    )
    .await
    .unwrap();
    let teacher = Actor::new(teacher.id, teacher.role);

    let (admin_token, _) = generate_jwt(admin.id, admin.role).unwrap();
    let (teacher_token, _) = generate_jwt(teacher.id, teacher.role).unwrap();

    TestApp {
        app: Router::new().nest("/api", routes(state.clone())),
        state,
        admin,
        admin_token,
        teacher,
        teacher_token,
        _dir: dir,
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Sends one request through a clone of the router and decodes the envelope.
pub async fn call(t: &TestApp, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let response = t.app.clone().oneshot(request(method, uri, token, body)).await.unwrap();
    let status = response.status();
    (status, get_json_body(response).await)
}
