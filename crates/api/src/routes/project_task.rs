use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::DateTime;
use chrono::{NaiveDate, NaiveTime, TimeZone};
use academy_db::models::{Audience, NotificationCategory, ProjectColumn, ProjectTask};
use academy_services::dao::DaoError;
use academy_services::dao::project::TaskUpdate;
use serde::{Deserialize, Serialize};

use super::parse_oid;
use super::project::{ensure_access, project_by_slug};
use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub owner: String,
    /// `YYYY-MM-DD` local date or an RFC 3339 instant.
    pub due_date: String,
    pub column: Option<ProjectColumn>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub owner: Option<String>,
    pub due_date: Option<String>,
    pub column: Option<ProjectColumn>,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub owner: String,
    pub due_date: String,
    pub column: ProjectColumn,
}

pub(crate) fn to_task_response(t: ProjectTask) -> TaskResponse {
    TaskResponse {
        id: t.id.map(|id| id.to_hex()).unwrap_or_default(),
        project_id: t.project_id.to_hex(),
        title: t.title,
        owner: t.owner,
        due_date: t.due_date.try_to_rfc3339_string().unwrap_or_default(),
        column: t.column,
    }
}

fn parse_due_date(state: &AppState, raw: &str) -> Result<DateTime, ApiError> {
    let raw = raw.trim();
    if let Ok(instant) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(DateTime::from_chrono(instant));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest("due_date must be YYYY-MM-DD or RFC 3339".to_string()))?;
    let local = state
        .offset
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .single()
        .ok_or_else(|| ApiError::BadRequest("due_date is out of range".to_string()))?;
    Ok(DateTime::from_chrono(local))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn task_by_id(state: &AppState, task_id: &str) -> Result<ProjectTask, ApiError> {
    let tid = parse_oid(task_id, "task_id")?;
    state.projects.find_task(tid).await.map_err(|e| match e {
        DaoError::NotFound => ApiError::NotFound("Task not found".to_string()),
        other => other.into(),
    })
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
    Json(body): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let title = body.title.trim().to_string();
    let owner = body.owner.trim().to_string();
    if title.is_empty() || owner.is_empty() || body.due_date.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "title, owner and due_date are required".to_string(),
        ));
    }
    let due_date = parse_due_date(&state, &body.due_date)?;

    let (_, project_id) = project_by_slug(&state, &slug).await?;
    ensure_access(&state, &auth, project_id).await?;

    let task = state
        .projects
        .create_task(project_id, title, owner, due_date, body.column.unwrap_or_default())
        .await?;
    state
        .projects
        .add_log(
            project_id,
            auth.user_id,
            format!("{}님이 \"{}\" 작업을 만들었습니다.", auth.display_name(), task.title),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(to_task_response(task))))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<String>,
    Json(body): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = task_by_id(&state, &task_id).await?;
    ensure_access(&state, &auth, task.project_id).await?;

    let due_date = match non_empty(body.due_date) {
        Some(raw) => Some(parse_due_date(&state, &raw)?),
        None => None,
    };
    let update = TaskUpdate {
        title: non_empty(body.title),
        owner: non_empty(body.owner),
        due_date,
        column: body.column,
    };

    let previous_column = task.column;
    let task_id = task.id.ok_or_else(|| ApiError::Internal("Task has no _id".to_string()))?;
    let updated = state.projects.update_task(task_id, update).await?;

    if updated.column != previous_column {
        state
            .projects
            .add_log(
                updated.project_id,
                auth.user_id,
                format!(
                    "{}님이 \"{}\" 작업을 {} 열로 옮겼습니다.",
                    auth.display_name(),
                    updated.title,
                    updated.column.as_str()
                ),
            )
            .await?;
    }

    Ok(Json(to_task_response(updated)))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let task = task_by_id(&state, &task_id).await?;
    ensure_access(&state, &auth, task.project_id).await?;

    let task_id = task.id.ok_or_else(|| ApiError::Internal("Task has no _id".to_string()))?;
    state.projects.delete_task(task_id).await?;

    state
        .notifications
        .create(
            None,
            Audience::Admin,
            NotificationCategory::Project,
            "프로젝트 작업 변경".to_string(),
            format!("{}님이 \"{}\" 작업을 삭제했습니다.", auth.display_name(), task.title),
            Some("/projects".to_string()),
        )
        .await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
