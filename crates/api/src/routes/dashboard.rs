use axum::{Json, extract::State};
use bson::DateTime;
use chrono::{NaiveTime, TimeZone};
use academy_db::models::Audience;
use academy_services::attendance::{CalendarDay, today_in};
use academy_services::rbac::{DashboardAccess, dashboard_path_for, login_redirect, require_role, role_label};
use serde::Serialize;

use super::attendance::{AttendanceResponse, month_calendar, to_attendance_response};
use super::notification::{NotificationResponse, to_notification_response};
use super::project::{ProjectResponse, to_project_response};
use super::require_id;
use crate::{error::ApiError, extractors::auth::MaybeAuthUser, state::AppState};

const ADMIN_RECENT_ATTENDANCE: i64 = 6;
const ADMIN_NOTICES: i64 = 3;
const PARENT_NOTICES: i64 = 5;

#[derive(Debug, Serialize)]
pub struct Totals {
    pub users: u64,
    pub projects: u64,
    pub attendance_today: u64,
}

#[derive(Debug, Serialize)]
pub struct RecentAttendance {
    pub user_name: String,
    #[serde(flatten)]
    pub record: AttendanceResponse,
}

#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub role_label: String,
    pub totals: Totals,
    pub recent_attendance: Vec<RecentAttendance>,
    pub notices: Vec<NotificationResponse>,
}

#[derive(Debug, Serialize)]
pub struct ClassSummary {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub class_days: Vec<u32>,
    pub schedule: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StudentDashboard {
    pub role_label: String,
    pub calendar: Vec<CalendarDay>,
    pub classes: Vec<ClassSummary>,
    pub projects: Vec<ProjectResponse>,
    pub notifications: Vec<NotificationResponse>,
}

#[derive(Debug, Serialize)]
pub struct ChildSummary {
    pub id: String,
    pub name: String,
    pub user_tag: String,
    pub calendar: Vec<CalendarDay>,
}

#[derive(Debug, Serialize)]
pub struct ParentDashboard {
    pub role_label: String,
    pub children: Vec<ChildSummary>,
    pub notices: Vec<NotificationResponse>,
}

/// Where the caller's dashboard lives.
pub async fn landing(MaybeAuthUser(auth): MaybeAuthUser) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(auth) = auth else {
        return Err(ApiError::Redirect(login_redirect("/dashboard")));
    };
    Ok(Json(serde_json::json!({
        "redirect": dashboard_path_for(Some(auth.role)),
    })))
}

/// Start of the current local day, as a UTC instant.
fn start_of_today(state: &AppState) -> DateTime {
    let midnight = today_in(&state.offset).and_time(NaiveTime::MIN);
    state
        .offset
        .from_local_datetime(&midnight)
        .single()
        .map(|local| DateTime::from_chrono(local.with_timezone(&chrono::Utc)))
        .unwrap_or_else(DateTime::now)
}

pub async fn admin(
    State(state): State<AppState>,
    maybe: MaybeAuthUser,
) -> Result<Json<AdminDashboard>, ApiError> {
    let session = maybe.session();
    let session = require_role(session.as_ref(), DashboardAccess::ADMIN, "/dashboard/admin")?;

    let logs = state.attendance.recent(ADMIN_RECENT_ATTENDANCE).await?;
    let user_ids: Vec<_> = logs.iter().map(|l| l.user_id).collect();
    let users = state.users.find_by_ids(&user_ids).await?;

    let recent_attendance = logs
        .iter()
        .map(|log| RecentAttendance {
            user_name: users
                .iter()
                .find(|u| u.id == Some(log.user_id))
                .map(|u| u.display_name().to_string())
                .unwrap_or_default(),
            record: to_attendance_response(log),
        })
        .collect();

    let notices = state
        .notifications
        .list_broadcast(Audience::Admin, ADMIN_NOTICES)
        .await?;

    let totals = Totals {
        users: state.users.count_active().await?,
        projects: state.projects.count().await?,
        attendance_today: state.attendance.count_since(start_of_today(&state)).await?,
    };

    Ok(Json(AdminDashboard {
        role_label: session.role.map(role_label).unwrap_or_default().to_string(),
        totals,
        recent_attendance,
        notices: notices.into_iter().map(to_notification_response).collect(),
    }))
}

pub async fn student(
    State(state): State<AppState>,
    maybe: MaybeAuthUser,
) -> Result<Json<StudentDashboard>, ApiError> {
    let session = maybe.session();
    let session = require_role(session.as_ref(), DashboardAccess::STUDENT, "/dashboard/student")?;
    let user_id = session.user_id;

    let calendar = month_calendar(&state, user_id, today_in(&state.offset)).await?;

    let classes = state
        .classes
        .find_enrolled_classes(user_id)
        .await?
        .into_iter()
        .map(|c| ClassSummary {
            id: c.id.map(|id| id.to_hex()).unwrap_or_default(),
            slug: c.slug,
            name: c.name,
            class_days: c.class_days,
            schedule: c.schedule,
        })
        .collect();

    let projects = state
        .projects
        .list_for_member(user_id)
        .await?
        .into_iter()
        .map(to_project_response)
        .collect();

    let notifications = state
        .notifications
        .list_for(user_id, Audience::Student)
        .await?
        .into_iter()
        .map(to_notification_response)
        .collect();

    Ok(Json(StudentDashboard {
        role_label: session.role.map(role_label).unwrap_or_default().to_string(),
        calendar,
        classes,
        projects,
        notifications,
    }))
}

pub async fn parent(
    State(state): State<AppState>,
    maybe: MaybeAuthUser,
) -> Result<Json<ParentDashboard>, ApiError> {
    let session = maybe.session();
    let session = require_role(session.as_ref(), DashboardAccess::PARENT, "/dashboard/parent")?;

    let today = today_in(&state.offset);
    let mut children = Vec::new();
    for child in state.users.find_children(session.user_id).await? {
        let child_id = require_id(child.id)?;
        children.push(ChildSummary {
            id: child_id.to_hex(),
            name: child.display_name().to_string(),
            user_tag: child.user_tag.clone(),
            calendar: month_calendar(&state, child_id, today).await?,
        });
    }

    let notices = state
        .notifications
        .list_broadcast(Audience::Parent, PARENT_NOTICES)
        .await?;

    Ok(Json(ParentDashboard {
        role_label: session.role.map(role_label).unwrap_or_default().to_string(),
        children,
        notices: notices.into_iter().map(to_notification_response).collect(),
    }))
}
