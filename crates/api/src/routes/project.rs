use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use academy_db::models::{
    NotificationCategory, Project, ProjectMember, ProjectRole, ProjectStatus,
};
use academy_services::project_access::{can_access_project, can_manage_project};
use academy_services::rbac::{is_admin_tier, role_to_audience};
use academy_services::dao::DaoError;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::project_file::{FileResponse, latest_versions, to_file_response};
use super::project_task::{TaskResponse, to_task_response};
use super::require_id;
use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState, ws::dispatcher};

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub progress: u8,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub user_id: String,
    pub name: String,
    pub user_tag: String,
    pub role: ProjectRole,
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub message: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct ProjectDetailResponse {
    pub project: ProjectResponse,
    pub members: Vec<MemberResponse>,
    pub files: Vec<FileResponse>,
    pub tasks: Vec<TaskResponse>,
    pub logs: Vec<LogResponse>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub user_tag: String,
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InviteResponse {
    pub project_id: String,
    pub user_id: String,
    pub user_tag: String,
    pub role: ProjectRole,
}

pub(crate) fn to_project_response(p: Project) -> ProjectResponse {
    ProjectResponse {
        id: p.id.map(|id| id.to_hex()).unwrap_or_default(),
        slug: p.slug,
        title: p.title,
        description: p.description,
        status: p.status,
        progress: p.progress,
        updated_at: p.updated_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}

/// Loads a project by slug; 404 when absent.
pub(crate) async fn project_by_slug(state: &AppState, slug: &str) -> Result<(Project, ObjectId), ApiError> {
    let project = state.projects.find_by_slug(slug).await.map_err(|e| match e {
        DaoError::NotFound => ApiError::NotFound("Project not found".to_string()),
        other => other.into(),
    })?;
    let project_id = require_id(project.id)?;
    Ok((project, project_id))
}

pub(crate) async fn ensure_access(
    state: &AppState,
    auth: &AuthUser,
    project_id: ObjectId,
) -> Result<(), ApiError> {
    let allowed = can_access_project(
        state.projects.as_ref(),
        project_id,
        Some(auth.user_id),
        Some(auth.role),
    )
    .await?;
    if !allowed {
        return Err(ApiError::Forbidden("No access to this project".to_string()));
    }
    Ok(())
}

pub(crate) async fn ensure_manage(
    state: &AppState,
    auth: &AuthUser,
    project_id: ObjectId,
    owner_only: bool,
) -> Result<(), ApiError> {
    let allowed = can_manage_project(
        state.projects.as_ref(),
        project_id,
        Some(auth.user_id),
        Some(auth.role),
        owner_only,
    )
    .await?;
    if !allowed {
        return Err(ApiError::Forbidden("Project owner rights required".to_string()));
    }
    Ok(())
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ProjectResponse>>, ApiError> {
    let projects = if is_admin_tier(Some(auth.role)) {
        state.projects.list_all().await?
    } else {
        state.projects.list_for_member(auth.user_id).await?
    };
    Ok(Json(projects.into_iter().map(to_project_response).collect()))
}

fn valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiError> {
    if !is_admin_tier(Some(auth.role)) {
        return Err(ApiError::Forbidden("Only admins can create projects".to_string()));
    }

    let slug = body.slug.trim().to_string();
    let title = body.title.trim().to_string();
    if !valid_slug(&slug) {
        return Err(ApiError::BadRequest(
            "slug must be lowercase letters, digits and dashes".to_string(),
        ));
    }
    if title.is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }

    let project = state
        .projects
        .create(slug, title, body.description, auth.user_id)
        .await?;
    info!(slug = %project.slug, creator = ?auth.user_id, "Project created");

    Ok((StatusCode::CREATED, Json(to_project_response(project))))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<ProjectDetailResponse>, ApiError> {
    let (project, project_id) = project_by_slug(&state, &slug).await?;
    ensure_access(&state, &auth, project_id).await?;

    let memberships = state.projects.list_members(project_id).await?;
    let user_ids: Vec<ObjectId> = memberships.iter().map(|m| m.user_id).collect();
    let users = state.users.find_by_ids(&user_ids).await?;
    let members = memberships
        .iter()
        .map(|m: &ProjectMember| {
            let user = users.iter().find(|u| u.id == Some(m.user_id));
            MemberResponse {
                user_id: m.user_id.to_hex(),
                name: user.map(|u| u.display_name().to_string()).unwrap_or_default(),
                user_tag: user.map(|u| u.user_tag.clone()).unwrap_or_default(),
                role: m.role,
            }
        })
        .collect();

    let files = latest_versions(state.projects.list_files(project_id).await?)
        .into_iter()
        .map(to_file_response)
        .collect();
    let tasks = state
        .projects
        .list_tasks(project_id)
        .await?
        .into_iter()
        .map(to_task_response)
        .collect();
    let logs = state
        .projects
        .recent_logs(project_id)
        .await?
        .into_iter()
        .map(|l| LogResponse {
            message: l.message,
            created_at: l.created_at.try_to_rfc3339_string().unwrap_or_default(),
        })
        .collect();

    Ok(Json(ProjectDetailResponse {
        project: to_project_response(project),
        members,
        files,
        tasks,
        logs,
    }))
}

pub async fn invite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
    Json(body): Json<InviteRequest>,
) -> Result<(StatusCode, Json<InviteResponse>), ApiError> {
    let (project, project_id) = project_by_slug(&state, &slug).await?;
    ensure_manage(&state, &auth, project_id, true).await?;

    let user_tag = body.user_tag.trim();
    if user_tag.is_empty() {
        return Err(ApiError::BadRequest("user_tag is required".to_string()));
    }
    let role: ProjectRole = body
        .role
        .as_deref()
        .unwrap_or("Member")
        .parse()
        .map_err(ApiError::BadRequest)?;

    let invitee = state.users.find_by_tag(user_tag).await.map_err(|e| match e {
        DaoError::NotFound => ApiError::NotFound("No user with that tag".to_string()),
        other => other.into(),
    })?;
    let invitee_id = require_id(invitee.id)?;

    let member = state
        .projects
        .add_member(project_id, invitee_id, role)
        .await
        .map_err(|e| match e {
            DaoError::DuplicateKey(_) => ApiError::Conflict("Already a member".to_string()),
            other => other.into(),
        })?;

    let notification = state
        .notifications
        .create(
            Some(invitee_id),
            role_to_audience(Some(invitee.role)),
            NotificationCategory::Project,
            "프로젝트 초대".to_string(),
            format!("{} 프로젝트에 초대되었습니다.", project.title),
            Some(format!("/projects/{}", project.slug)),
        )
        .await?;
    state
        .projects
        .add_log(
            project_id,
            auth.user_id,
            format!("{}님이 {}님을 {}(으)로 초대했습니다.", auth.display_name(), invitee.display_name(), role),
        )
        .await?;

    let event = serde_json::json!({
        "type": "notification",
        "data": {
            "id": notification.id.map(|id| id.to_hex()),
            "title": notification.title,
            "message": notification.message,
            "link": notification.link,
        }
    });
    dispatcher::send_to_user(&state.ws_storage, &invitee_id, &event).await;

    info!(slug = %project.slug, invitee = %invitee.user_tag, %role, "Project member invited");

    Ok((
        StatusCode::CREATED,
        Json(InviteResponse {
            project_id: member.project_id.to_hex(),
            user_id: member.user_id.to_hex(),
            user_tag: invitee.user_tag,
            role: member.role,
        }),
    ))
}
