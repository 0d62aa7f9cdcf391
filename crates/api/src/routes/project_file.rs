use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use academy_db::models::ProjectFile;
use academy_services::dao::DaoError;
use academy_services::dao::project::NewProjectFile;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::parse_oid;
use super::project::{ensure_access, ensure_manage, project_by_slug};
use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct RegisterFileRequest {
    pub logical_name: String,
    pub file_name: String,
    #[serde(alias = "url")]
    pub file_url: String,
    pub public_id: Option<String>,
    pub language: Option<String>,
    pub change_summary: Option<String>,
    pub size: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct FileResponse {
    pub id: String,
    pub logical_name: String,
    pub file_name: String,
    pub file_url: String,
    pub language: Option<String>,
    pub change_summary: Option<String>,
    pub version: u32,
    pub size: Option<i64>,
    pub uploaded_by: String,
    pub uploaded_at: String,
}

pub(crate) fn to_file_response(f: ProjectFile) -> FileResponse {
    FileResponse {
        id: f.id.map(|id| id.to_hex()).unwrap_or_default(),
        logical_name: f.logical_name,
        file_name: f.file_name,
        file_url: f.file_url,
        language: f.language,
        change_summary: f.change_summary,
        version: f.version,
        size: f.size,
        uploaded_by: f.uploaded_by.to_hex(),
        uploaded_at: f.uploaded_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}

/// Highest version of each logical file, in first-seen order.
pub(crate) fn latest_versions(files: Vec<ProjectFile>) -> Vec<ProjectFile> {
    let mut order: Vec<String> = Vec::new();
    let mut latest: HashMap<String, ProjectFile> = HashMap::new();
    for file in files {
        match latest.get(&file.logical_name) {
            Some(current) if current.version >= file.version => {}
            Some(_) => {
                latest.insert(file.logical_name.clone(), file);
            }
            None => {
                order.push(file.logical_name.clone());
                latest.insert(file.logical_name.clone(), file);
            }
        }
    }
    order
        .into_iter()
        .filter_map(|name| latest.remove(&name))
        .collect()
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<Vec<FileResponse>>, ApiError> {
    let (_, project_id) = project_by_slug(&state, &slug).await?;
    ensure_access(&state, &auth, project_id).await?;

    let files = state.projects.list_files(project_id).await?;
    Ok(Json(files.into_iter().map(to_file_response).collect()))
}

pub async fn register(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
    Json(body): Json<RegisterFileRequest>,
) -> Result<(StatusCode, Json<FileResponse>), ApiError> {
    let logical_name = body.logical_name.trim().to_string();
    let file_name = body.file_name.trim().to_string();
    let file_url = body.file_url.trim().to_string();
    if logical_name.is_empty() || file_name.is_empty() || file_url.is_empty() {
        return Err(ApiError::BadRequest(
            "logical_name, file_name and file_url are required".to_string(),
        ));
    }

    let (_, project_id) = project_by_slug(&state, &slug).await?;
    ensure_access(&state, &auth, project_id).await?;

    let file = state
        .projects
        .add_file(
            project_id,
            auth.user_id,
            NewProjectFile {
                logical_name,
                file_name,
                file_url,
                public_id: body.public_id,
                language: trimmed(body.language),
                change_summary: trimmed(body.change_summary),
                size: body.size.map(|s| s.round() as i64),
            },
        )
        .await?;

    state
        .projects
        .add_log(
            project_id,
            auth.user_id,
            format!(
                "{}님이 {} v{}을(를) 올렸습니다.",
                auth.display_name(),
                file.logical_name,
                file.version
            ),
        )
        .await?;
    info!(%slug, logical_name = %file.logical_name, version = file.version, "Project file version registered");

    Ok((StatusCode::CREATED, Json(to_file_response(file))))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(file_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let fid = parse_oid(&file_id, "file_id")?;
    let file = state.projects.find_file(fid).await.map_err(|e| match e {
        DaoError::NotFound => ApiError::NotFound("File not found".to_string()),
        other => other.into(),
    })?;
    ensure_manage(&state, &auth, file.project_id, true).await?;

    state.projects.delete_file(fid).await?;
    state
        .projects
        .add_log(
            file.project_id,
            auth.user_id,
            format!(
                "{}님이 {} v{} 파일을 삭제했습니다.",
                auth.display_name(),
                file.logical_name,
                file.version
            ),
        )
        .await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub content: String,
    pub logical_name: String,
    pub language: Option<String>,
    pub version: u32,
}

pub async fn preview(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(file_id): Path<String>,
) -> Result<Json<PreviewResponse>, ApiError> {
    let fid = parse_oid(&file_id, "file_id")?;
    let file = state.projects.find_file(fid).await.map_err(|e| match e {
        DaoError::NotFound => ApiError::NotFound("File not found".to_string()),
        other => other.into(),
    })?;
    ensure_access(&state, &auth, file.project_id).await?;

    let content = state.previews.fetch(&file.file_url).await.inspect_err(|e| {
        warn!(file_id = %fid, error = %e, "Project file preview fetch failed");
    })?;

    Ok(Json(PreviewResponse {
        content,
        logical_name: file.logical_name,
        language: file.language,
        version: file.version,
    }))
}
