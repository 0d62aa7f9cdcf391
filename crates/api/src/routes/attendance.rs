use axum::{
    Json,
    extract::{Query, State},
};
use bson::oid::ObjectId;
use chrono::NaiveDate;
use academy_db::models::AttendanceLog;
use academy_services::attendance::{CalendarDay, build_monthly_calendar, month_bounds, today_in};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    /// `YYYY-MM`; defaults to the current local month.
    pub month: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub month: String,
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Serialize)]
pub struct AttendanceResponse {
    pub id: String,
    pub user_id: String,
    pub class_id: String,
    pub status: String,
    pub label: String,
    pub note: Option<String>,
    pub marked_by_kiosk: bool,
    pub check_in_time: String,
}

pub(crate) fn to_attendance_response(log: &AttendanceLog) -> AttendanceResponse {
    AttendanceResponse {
        id: log.id.map(|id| id.to_hex()).unwrap_or_default(),
        user_id: log.user_id.to_hex(),
        class_id: log.class_id.to_hex(),
        status: log.status.as_str().to_string(),
        label: log.status.label().to_string(),
        note: log.note.clone(),
        marked_by_kiosk: log.marked_by_kiosk,
        check_in_time: log.check_in_time.try_to_rfc3339_string().unwrap_or_default(),
    }
}

pub(crate) fn parse_month(month: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest("month must be YYYY-MM".to_string()))
}

/// Calendar for `user_id` over `target`'s month, built from that month's
/// records in check-in order.
pub(crate) async fn month_calendar(
    state: &AppState,
    user_id: ObjectId,
    target: NaiveDate,
) -> Result<Vec<CalendarDay>, ApiError> {
    let (from, to) = month_bounds(target, &state.offset)
        .ok_or_else(|| ApiError::BadRequest("month out of range".to_string()))?;
    let logs = state
        .attendance
        .for_user_between(
            user_id,
            bson::DateTime::from_chrono(from),
            bson::DateTime::from_chrono(to),
            state.settings.attendance.calendar_log_limit,
        )
        .await?;
    Ok(build_monthly_calendar(&logs, target, &state.offset))
}

pub async fn calendar(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, ApiError> {
    let target = match query.month.as_deref() {
        Some(month) => parse_month(month)?,
        None => today_in(&state.offset),
    };

    let days = month_calendar(&state, auth.user_id, target).await?;
    Ok(Json(CalendarResponse {
        month: target.format("%Y-%m").to_string(),
        days,
    }))
}
