//! `ApiClient` against a throwaway axum backend bound to 127.0.0.1:0.

use std::sync::{Arc, Mutex};

use api::{ApiClient, ApiError, DEFAULT_TIMEOUT};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
};
use forms::{
    Collaborator, NewUser, RegisterForm, SubmitError, SubmitOutcome, TaskDraft, TaskStatus,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

const TAKEN: &str = "taken@site.com";

#[derive(Clone, Default)]
struct Backend {
    requests: Arc<Mutex<Vec<(String, Value)>>>,
}

impl Backend {
    fn record(&self, route: impl Into<String>, body: Value) {
        self.requests.lock().unwrap().push((route.into(), body));
    }

    fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }
}

async fn create_user(
    State(backend): State<Backend>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    backend.record("POST /users", body.clone());
    if body["email"] == TAKEN {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Email already exists" })),
        );
    }
    (StatusCode::CREATED, Json(json!({ "id": 1 })))
}

async fn update_task(
    State(backend): State<Backend>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> StatusCode {
    backend.record(format!("PUT /tasks/{id}"), body);
    if id == 404 {
        return StatusCode::NOT_FOUND;
    }
    StatusCode::OK
}

async fn create_task(State(backend): State<Backend>, Json(body): Json<Value>) -> StatusCode {
    backend.record("POST /tasks", body);
    StatusCode::CREATED
}

async fn spawn_backend() -> (String, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/users", post(create_user))
        .route("/tasks", post(create_task))
        .route("/tasks/:id", put(update_task))
        .with_state(backend.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), backend)
}

#[derive(Default)]
struct Routes(Vec<&'static str>);

impl Collaborator<NewUser> for Routes {
    fn on_submit_success(&mut self, _payload: &NewUser) {
        self.0.push("/login");
    }

    fn on_cancel(&mut self) {}
}

#[tokio::test]
async fn register_user_posts_trimmed_credentials() {
    let (url, backend) = spawn_backend().await;
    let client = ApiClient::new(&url, DEFAULT_TIMEOUT).unwrap();
    let mut form = RegisterForm::new(client, Routes::default());
    form.set_value("email", "  user@site.com").unwrap();
    form.set_value("password", "Abcdef1!").unwrap();

    let outcome = form.submit().await;

    assert!(outcome.is_success());
    assert_eq!(form.collaborator().0, vec!["/login"]);
    assert_eq!(
        backend.requests(),
        vec![(
            "POST /users".to_string(),
            json!({ "email": "user@site.com", "password": "Abcdef1!" })
        )]
    );
}

#[tokio::test]
async fn conflict_message_reaches_the_form() {
    let (url, _backend) = spawn_backend().await;
    let client = ApiClient::new(&url, DEFAULT_TIMEOUT).unwrap();
    let mut form = RegisterForm::new(client, Routes::default());
    form.set_value("email", TAKEN).unwrap();
    form.set_value("password", "Abcdef1!").unwrap();

    let outcome = form.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed("Email already exists".into()));
    assert_eq!(form.error(), Some("Email already exists"));
    assert_eq!(form.form().value("email"), Some(TAKEN));
    assert!(form.collaborator().0.is_empty());
}

#[tokio::test]
async fn unreachable_backend_falls_back_to_generic_message() {
    // Bind and drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(&format!("http://{addr}"), DEFAULT_TIMEOUT).unwrap();
    let mut form = RegisterForm::new(client, Routes::default());
    form.set_value("email", "user@site.com").unwrap();
    form.set_value("password", "Abcdef1!").unwrap();

    assert_eq!(
        form.submit().await,
        SubmitOutcome::Failed("Registration failed.".into())
    );
}

#[tokio::test]
async fn save_task_updates_or_creates() {
    let (url, backend) = spawn_backend().await;
    let client = ApiClient::new(&url, DEFAULT_TIMEOUT).unwrap();

    let existing = TaskDraft {
        id: Some(7),
        title: "Buy oat milk".into(),
        description: String::new(),
        status: TaskStatus::Completed,
    };
    let fresh = TaskDraft {
        id: None,
        title: "Water plants".into(),
        description: "balcony".into(),
        status: TaskStatus::Pending,
    };

    client.save_task(&existing).await.unwrap();
    client.save_task(&fresh).await.unwrap();

    assert_eq!(
        backend.requests(),
        vec![
            (
                "PUT /tasks/7".to_string(),
                json!({ "id": 7, "title": "Buy oat milk", "description": "", "status": "completed" })
            ),
            (
                "POST /tasks".to_string(),
                json!({ "title": "Water plants", "description": "balcony", "status": "pending" })
            ),
        ]
    );
}

#[tokio::test]
async fn missing_task_maps_to_server_error_without_message() {
    let (url, _backend) = spawn_backend().await;
    let client = ApiClient::new(&url, DEFAULT_TIMEOUT).unwrap();
    let draft = TaskDraft {
        id: Some(404),
        title: "Gone".into(),
        description: String::new(),
        status: TaskStatus::Pending,
    };

    let err = client.save_task(&draft).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, message: None }));
    assert_eq!(
        SubmitError::from(err),
        SubmitError::Server {
            status: Some(404),
            message: None
        }
    );
}
