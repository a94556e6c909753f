//! JSON API over the task orchestrator.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use goalforge_core::{
    ExecutorError, Metrics, MetricsSnapshot, OrchestratorError, RoundContext, TaskExecutor,
    TaskOrchestrator,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: TaskOrchestrator,
    pub executor: Arc<dyn TaskExecutor>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(orchestrator: TaskOrchestrator, executor: Arc<dyn TaskExecutor>) -> Self {
        let metrics = orchestrator.metrics();
        Self {
            orchestrator,
            executor,
            metrics,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/metrics", get(metrics))
        .route("/api/agent/start", post(start_agent))
        .route("/api/agent/create", post(create_tasks))
        .route("/api/agent/execute", post(execute_task))
        .with_state(state)
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        warn!(error = %err, "task creation failed");
        Self::bad_gateway(err.to_string())
    }
}

impl From<ExecutorError> for ApiError {
    fn from(err: ExecutorError) -> Self {
        warn!(error = %err, "task execution failed");
        Self::bad_gateway(err.to_string())
    }
}

fn require_goal(goal: &str) -> Result<&str, ApiError> {
    let goal = goal.trim();
    if goal.is_empty() {
        return Err(ApiError::bad_request("goal must not be empty"));
    }
    Ok(goal)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub goal: String,
    #[serde(default)]
    pub custom_api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub goal: String,
    #[serde(default)]
    pub tasks: Vec<String>,
    #[serde(default)]
    pub last_task: String,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub custom_api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub goal: String,
    pub task: String,
    #[serde(default)]
    pub custom_api_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TasksResponse {
    pub tasks: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ExecuteResponse {
    pub response: String,
}

async fn health() -> &'static str {
    "ok"
}

async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

/// POST /api/agent/start - initial task list for a goal.
async fn start_agent(
    State(state): State<AppState>,
    payload: Result<Json<StartRequest>, JsonRejection>,
) -> Result<Json<TasksResponse>, ApiError> {
    let Json(request) = payload?;
    let goal = require_goal(&request.goal)?;
    let tasks = state
        .orchestrator
        .start_goal(goal, request.custom_api_key.as_deref())
        .await?;
    info!(count = tasks.len(), "start: tasks proposed");
    Ok(Json(TasksResponse { tasks }))
}

/// POST /api/agent/create - follow-up tasks after one has been executed.
async fn create_tasks(
    State(state): State<AppState>,
    payload: Result<Json<CreateRequest>, JsonRejection>,
) -> Result<Json<TasksResponse>, ApiError> {
    let Json(request) = payload?;
    let goal = require_goal(&request.goal)?;
    let context = RoundContext {
        goal,
        existing_tasks: &request.tasks,
        last_task: &request.last_task,
        last_result: &request.result,
        api_key: request.custom_api_key.as_deref(),
    };
    let tasks = state.orchestrator.create_tasks(&context).await?;
    info!(count = tasks.len(), "create: tasks proposed");
    Ok(Json(TasksResponse { tasks }))
}

/// POST /api/agent/execute - carry out one task.
async fn execute_task(
    State(state): State<AppState>,
    payload: Result<Json<ExecuteRequest>, JsonRejection>,
) -> Result<Json<ExecuteResponse>, ApiError> {
    let Json(request) = payload?;
    let goal = require_goal(&request.goal)?;
    if request.task.trim().is_empty() {
        return Err(ApiError::bad_request("task must not be empty"));
    }
    let response = state
        .executor
        .execute(goal, request.task.trim(), request.custom_api_key.as_deref())
        .await?;
    state.metrics.inc_tasks_completed();
    Ok(Json(ExecuteResponse { response }))
}
