use axum::{
    Json,
    extract::{Path, State},
};
use academy_db::models::{Audience, Notification, NotificationCategory};
use academy_services::rbac::role_to_audience;
use serde::{Deserialize, Serialize};

use super::parse_oid;
use crate::{
    error::ApiError,
    extractors::auth::{AuthUser, MaybeAuthUser},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub audience: Audience,
    pub category: NotificationCategory,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub read: bool,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    pub ids: Vec<String>,
}

pub(crate) fn to_notification_response(n: Notification) -> NotificationResponse {
    NotificationResponse {
        id: n.id.map(|id| id.to_hex()).unwrap_or_default(),
        audience: n.audience,
        category: n.category,
        title: n.title,
        message: n.message,
        link: n.link,
        read: n.read_at.is_some(),
        created_at: n.created_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}

/// Empty without a session.
pub async fn list(
    State(state): State<AppState>,
    MaybeAuthUser(auth): MaybeAuthUser,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let Some(auth) = auth else {
        return Ok(Json(Vec::new()));
    };

    let notifications = state
        .notifications
        .list_for(auth.user_id, role_to_audience(Some(auth.role)))
        .await?;
    Ok(Json(
        notifications
            .into_iter()
            .map(to_notification_response)
            .collect(),
    ))
}

pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<MarkReadRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let ids = body
        .ids
        .iter()
        .map(|id| parse_oid(id, "notification id"))
        .collect::<Result<Vec<_>, _>>()?;

    let updated = state.notifications.mark_read(&ids, auth.user_id).await?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}

pub async fn mark_one_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(notification_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_oid(&notification_id, "notification id")?;
    let updated = state.notifications.mark_read(&[id], auth.user_id).await?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}
