use std::{sync::Arc, time::Instant};

use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{Path, Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, get, post},
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{Instrument, error, info, warn};

use crate::{
    AppConfig, AssignmentEntry, AssignmentKey, AssignmentService, FlatFileStore, RepeatType,
    ServiceError,
};

pub mod session;

pub type SharedService = Arc<AssignmentService<FlatFileStore>>;

#[derive(Clone)]
pub struct AppState {
    service: SharedService,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let service = AssignmentService::new(FlatFileStore::new(&config.data_file));
        Self::with_shared(Arc::new(service), config)
    }

    pub fn with_shared(service: SharedService, config: AppConfig) -> Self {
        Self {
            service,
            config: Arc::new(config),
        }
    }

    fn service(&self) -> SharedService {
        self.service.clone()
    }

    fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Unauthorized(String),
    Internal(String),
}

impl ApiError {
    fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Validation(message) => ApiError::Invalid(message),
            ServiceError::NotFound(message) => ApiError::NotFound(message),
            ServiceError::Persistence(err) => {
                error!(error = %err, "assignment store failure");
                ApiError::internal(err.to_string())
            }
        }
    }
}

impl From<askama::Error> for ApiError {
    fn from(value: askama::Error) -> Self {
        error!(error = %value, "template rendering failed");
        ApiError::internal(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, "unauthorized", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginPage {
    error: String,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexPage {
    username: String,
    current_time: String,
    entries: Vec<AssignmentEntry>,
    repeat_options: &'static [(&'static str, &'static str)],
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddAssignmentPayload {
    pub name: String,
    pub course: String,
    pub due_date: String,
    pub repeat: String,
}

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/", get(index))
        .route("/api/assignments", get(list_assignments))
        .route("/api/assignments/:key", delete(delete_assignment_by_key))
        .route("/api/add", post(add_assignment))
        .route("/api/delete/:index", delete(delete_assignment))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session::require_login,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
        .merge(protected)
        .layer(middleware::from_fn(trace_requests))
        .with_state(state)
}

pub async fn serve(config: AppConfig) -> std::io::Result<()> {
    let addr = config.bind_addr;
    let state = AppState::new(config);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "homework tracker listening");
    axum::serve(listener, app).await
}

async fn trace_requests(request: Request, next: Next) -> Response {
    let span = tracing::info_span!(
        "http.request",
        method = %request.method(),
        route = %request.uri().path(),
    );
    async move {
        let started = Instant::now();
        let response = next.run(request).await;
        info!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request finished"
        );
        response
    }
    .instrument(span)
    .await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn login_page() -> Result<Html<String>, ApiError> {
    let page = LoginPage {
        error: String::new(),
    };
    Ok(Html(page.render()?))
}

async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let config = state.config();
    if form.username == config.username && form.password == config.password {
        let value = session::sign_session(&config.secret_key, &form.username)
            .ok_or_else(|| ApiError::internal("could not sign session"))?;
        info!(username = %form.username, "login succeeded");
        return Ok((
            [(header::SET_COOKIE, session::session_cookie(&value))],
            Redirect::to("/"),
        )
            .into_response());
    }
    warn!(username = %form.username, "login rejected");
    let page = LoginPage {
        error: "Invalid username or password".to_string(),
    };
    Ok((StatusCode::UNAUTHORIZED, Html(page.render()?)).into_response())
}

async fn logout() -> Response {
    (
        [(header::SET_COOKIE, session::expired_session_cookie())],
        Redirect::to("/login"),
    )
        .into_response()
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let entries = state.service().list_entries()?;
    let page = IndexPage {
        username: state.config().username.clone(),
        current_time: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        entries,
        repeat_options: RepeatType::variants(),
    };
    Ok(Html(page.render()?))
}

async fn list_assignments(
    State(state): State<AppState>,
) -> Result<Json<Vec<AssignmentEntry>>, ApiError> {
    Ok(Json(state.service().list_entries()?))
}

async fn add_assignment(
    State(state): State<AppState>,
    Json(payload): Json<AddAssignmentPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let repeat = if payload.repeat.is_empty() {
        RepeatType::None.as_str()
    } else {
        payload.repeat.as_str()
    };
    state
        .service()
        .add(&payload.name, &payload.course, &payload.due_date, repeat)?;
    Ok(Json(json!({ "success": true })))
}

async fn delete_assignment(
    State(state): State<AppState>,
    Path(index): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.service().delete(index)?;
    Ok(Json(json!({ "success": true })))
}

async fn delete_assignment_by_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let key = AssignmentKey::from(key.as_str());
    state.service().delete_by_key(&key)?;
    Ok(Json(json!({ "success": true })))
}
