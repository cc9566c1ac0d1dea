//! HTTP surface: liveness probe and the analysis pipeline endpoint.

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::executor::execute_script;
use crate::extract::extract_script;
use crate::patch::apply_patches;
use crate::prompt::{build_user_prompt, SYSTEM_PROMPT};
use crate::state::AppState;
use crate::validate::validate;
use crate::workspace::Workspace;

/// Filename that marks the task-description upload, matched
/// case-insensitively.
const TASK_FILENAME: &str = "questions.txt";
/// Name the generated script is persisted under before execution.
const SCRIPT_FILENAME: &str = "agent_script.py";
/// Uploads carry datasets; axum's 2 MB default is too small.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/", post(analyze))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// One end-to-end session: workspace, uploads, generation, execution,
/// validation. The workspace is torn down when it drops, whichever path
/// this handler leaves by.
async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let session_id = Uuid::new_v4().to_string();
    let workspace = Workspace::create(&state.config.workspace_root, &session_id)?;

    let mut artifact_names: Vec<String> = Vec::new();
    let mut task_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::Internal(format!("malformed multipart body: {err}")))?
    {
        let Some(filename) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let bytes = field.bytes().await.map_err(|err| {
            AppError::Internal(format!("failed to read upload {filename}: {err}"))
        })?;
        workspace.write_artifact(&filename, &bytes)?;
        if filename.eq_ignore_ascii_case(TASK_FILENAME) {
            task_text = Some(String::from_utf8_lossy(&bytes).into_owned());
        }
        artifact_names.push(filename);
    }

    let task_text = task_text
        .filter(|text| !text.is_empty())
        .ok_or(AppError::MissingTaskFile)?;

    info!(
        "[{}] generating script for files: {}",
        session_id,
        artifact_names.join(", ")
    );
    let user_prompt = build_user_prompt(&task_text, &artifact_names);
    let raw = state.llm.generate_script(SYSTEM_PROMPT, &user_prompt).await?;

    let script = apply_patches(&extract_script(&raw));
    let script_path = workspace.write_artifact(SCRIPT_FILENAME, script.as_bytes())?;

    info!("[{}] executing generated script", session_id);
    let outcome = execute_script(
        &state.config.interpreter,
        &script_path,
        workspace.path(),
        state.config.exec_timeout,
    )
    .await?;

    let value = validate(outcome)?;
    info!("[{}] session complete", session_id);
    Ok(Json(value))
}
