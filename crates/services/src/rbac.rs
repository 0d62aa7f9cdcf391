//! Role tables and the dashboard access guard.
//!
//! Everything here is pure and synchronous: the HTTP layer resolves the
//! session once per request and hands it in.

use bson::oid::ObjectId;
use academy_db::models::{Audience, UserRole};

pub const ADMIN_ROLES: &[UserRole] = &[UserRole::SuperAdmin, UserRole::Admin];

pub const LOGIN_PATH: &str = "/login";
pub const DEFAULT_DASHBOARD_PATH: &str = "/dashboard";

/// Allowed role sets for the three guarded dashboards.
pub struct DashboardAccess;

impl DashboardAccess {
    pub const ADMIN: &'static [UserRole] = ADMIN_ROLES;
    pub const STUDENT: &'static [UserRole] = &[UserRole::FullMember, UserRole::AssociateMember];
    pub const PARENT: &'static [UserRole] = &[UserRole::Parent];
}

/// Human-readable label shown next to author names and in headers.
pub fn role_label(role: UserRole) -> &'static str {
    match role {
        UserRole::SuperAdmin => "원장 (T1)",
        UserRole::Admin => "멘토 (T2)",
        UserRole::FullMember => "정회원 (T3)",
        UserRole::Parent => "학부모",
        UserRole::AssociateMember => "준회원",
        UserRole::Visitor => "방문자",
    }
}

pub fn dashboard_path_for(role: Option<UserRole>) -> &'static str {
    match role {
        Some(UserRole::SuperAdmin | UserRole::Admin) => "/dashboard/admin",
        Some(UserRole::FullMember | UserRole::AssociateMember) => "/dashboard/student",
        Some(UserRole::Parent) => "/dashboard/parent",
        Some(UserRole::Visitor) | None => DEFAULT_DASHBOARD_PATH,
    }
}

pub fn is_admin_tier(role: Option<UserRole>) -> bool {
    is_allowed(role, ADMIN_ROLES)
}

pub fn is_allowed(role: Option<UserRole>, allowed: &[UserRole]) -> bool {
    role.is_some_and(|r| allowed.contains(&r))
}

pub fn role_to_audience(role: Option<UserRole>) -> Audience {
    match role {
        Some(UserRole::SuperAdmin | UserRole::Admin) => Audience::Admin,
        Some(UserRole::FullMember | UserRole::AssociateMember) => Audience::Student,
        Some(UserRole::Parent) => Audience::Parent,
        Some(UserRole::Visitor) | None => Audience::General,
    }
}

/// The authenticated identity a guard decision is made on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: ObjectId,
    pub role: Option<UserRole>,
    pub name: String,
    pub user_tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDenied {
    /// No session; send the caller to log in and come back.
    Unauthenticated { location: String },
    /// Signed in with a role outside the allowed set.
    Unauthorized { location: String },
}

impl AccessDenied {
    pub fn location(&self) -> &str {
        match self {
            AccessDenied::Unauthenticated { location } | AccessDenied::Unauthorized { location } => {
                location
            }
        }
    }
}

pub fn login_redirect(current_path: &str) -> String {
    format!(
        "{LOGIN_PATH}?callbackUrl={}",
        urlencoding::encode(current_path)
    )
}

pub fn require_role<'a>(
    session: Option<&'a Session>,
    allowed: &[UserRole],
    current_path: &str,
) -> Result<&'a Session, AccessDenied> {
    let Some(session) = session else {
        return Err(AccessDenied::Unauthenticated {
            location: login_redirect(current_path),
        });
    };

    if !is_allowed(session.role, allowed) {
        return Err(AccessDenied::Unauthorized {
            location: dashboard_path_for(session.role).to_string(),
        });
    }

    Ok(session)
}
