use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::DateTime;
use academy_db::models::CurriculumFile;
use academy_services::dao::DaoError;
use academy_services::rbac::is_admin_tier;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{parse_oid, require_id};
use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct MaterialFile {
    pub name: String,
    pub url: String,
    pub public_id: Option<String>,
    pub size: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct AddMaterialRequest {
    pub week_id: String,
    pub file: MaterialFile,
}

#[derive(Debug, Serialize)]
pub struct MaterialResponse {
    pub id: String,
    pub week_id: Option<String>,
    pub name: String,
    pub url: String,
    pub public_id: Option<String>,
    pub size: Option<i64>,
    pub uploaded_at: String,
}

fn to_material_response(file: CurriculumFile, week_id: Option<String>) -> MaterialResponse {
    MaterialResponse {
        id: file.id,
        week_id,
        name: file.name,
        url: file.url,
        public_id: file.public_id,
        size: file.size,
        uploaded_at: file.uploaded_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}

fn ensure_admin(auth: &AuthUser) -> Result<(), ApiError> {
    if !is_admin_tier(Some(auth.role)) {
        return Err(ApiError::Forbidden("Only admins can manage class materials".to_string()));
    }
    Ok(())
}

fn not_found(what: &'static str) -> impl Fn(DaoError) -> ApiError {
    move |e| match e {
        DaoError::NotFound => ApiError::NotFound(format!("{what} not found")),
        other => other.into(),
    }
}

pub async fn add_material(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
    Json(body): Json<AddMaterialRequest>,
) -> Result<(StatusCode, Json<MaterialResponse>), ApiError> {
    ensure_admin(&auth)?;

    let name = body.file.name.trim().to_string();
    let url = body.file.url.trim().to_string();
    if name.is_empty() || url.is_empty() {
        return Err(ApiError::BadRequest("file name and url are required".to_string()));
    }

    let class = state.classes.find_by_slug(&slug).await.map_err(not_found("Class"))?;
    let class_id = require_id(class.id)?;
    let week_id = parse_oid(&body.week_id, "week_id")?;
    state
        .classes
        .find_week_in_class(class_id, week_id)
        .await
        .map_err(not_found("Curriculum week"))?;

    let file = CurriculumFile {
        id: Uuid::new_v4().to_string(),
        name,
        url,
        public_id: body.file.public_id,
        size: body.file.size.map(|s| s.round() as i64),
        uploaded_at: DateTime::now(),
        uploader_id: auth.user_id,
    };
    state.classes.add_material(week_id, &file).await?;
    info!(%slug, file_id = %file.id, "Class material added");

    Ok((
        StatusCode::CREATED,
        Json(to_material_response(file, Some(week_id.to_hex()))),
    ))
}

pub async fn remove_material(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((slug, file_id)): Path<(String, String)>,
) -> Result<Json<MaterialResponse>, ApiError> {
    ensure_admin(&auth)?;

    let class = state.classes.find_by_slug(&slug).await.map_err(not_found("Class"))?;
    let class_id = require_id(class.id)?;
    let removed = state
        .classes
        .remove_material(class_id, &file_id)
        .await
        .map_err(not_found("Material"))?;
    info!(%slug, %file_id, "Class material removed");

    Ok(Json(to_material_response(removed, None)))
}
