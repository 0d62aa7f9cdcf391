use axum::{Json, extract::State, http::StatusCode};
use academy_db::models::AttendanceStatus;
use academy_services::attendance::{class_for_weekday, today_in, weekday_index};
use academy_services::dao::DaoError;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::attendance::{AttendanceResponse, to_attendance_response};
use super::require_id;
use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub api_key: String,
    pub user_tag: String,
    pub note: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    pub user_name: String,
    pub class_name: String,
    pub record: AttendanceResponse,
}

/// Anything other than an explicit check-out is recorded as a check-in.
fn requested_status(raw: Option<&str>) -> AttendanceStatus {
    match raw {
        Some("CHECK_OUT") => AttendanceStatus::CheckOut,
        _ => AttendanceStatus::CheckIn,
    }
}

pub async fn check_in(
    State(state): State<AppState>,
    Json(body): Json<CheckInRequest>,
) -> Result<(StatusCode, Json<CheckInResponse>), ApiError> {
    let kiosk = state
        .kiosks
        .find_active_by_key(&body.api_key)
        .await
        .map_err(|e| match e {
            DaoError::NotFound => ApiError::Unauthorized("Invalid kiosk key".to_string()),
            other => other.into(),
        })?;
    let kiosk_id = require_id(kiosk.id)?;

    let user = state
        .users
        .find_by_tag(body.user_tag.trim())
        .await
        .map_err(|e| match e {
            DaoError::NotFound => ApiError::NotFound("Unknown user tag".to_string()),
            other => other.into(),
        })?;
    let user_id = require_id(user.id)?;

    let classes = state.classes.find_enrolled_classes(user_id).await?;
    let weekday = weekday_index(today_in(&state.offset));
    let class = class_for_weekday(&classes, weekday)
        .ok_or_else(|| ApiError::BadRequest("No class scheduled today".to_string()))?;
    let class_id = require_id(class.id)?;

    let note = body.note.filter(|n| !n.trim().is_empty());
    let record = state
        .attendance
        .record(
            user_id,
            class_id,
            Some(kiosk_id),
            requested_status(body.status.as_deref()),
            note,
        )
        .await?;
    state.kiosks.touch(kiosk_id).await?;

    info!(?user_id, ?class_id, kiosk = %kiosk.name, status = record.status.as_str(), "Kiosk attendance recorded");

    Ok((
        StatusCode::CREATED,
        Json(CheckInResponse {
            user_name: user.display_name().to_string(),
            class_name: class.name.clone(),
            record: to_attendance_response(&record),
        }),
    ))
}
