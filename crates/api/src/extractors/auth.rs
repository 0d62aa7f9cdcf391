use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use bson::oid::ObjectId;
use academy_db::models::UserRole;
use academy_services::auth::Claims;
use academy_services::rbac::Session;

use crate::{error::ApiError, state::AppState};

/// Extracts the authenticated user from JWT (cookie or Authorization header)
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: ObjectId,
    pub email: String,
    pub name: String,
    pub user_tag: String,
    pub role: UserRole,
    pub claims: Claims,
}

impl AuthUser {
    pub fn session(&self) -> Session {
        Session {
            user_id: self.user_id,
            role: Some(self.role),
            name: self.name.clone(),
            user_tag: self.user_tag.clone(),
        }
    }

    /// Display name, falling back to the user tag.
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            self.user_tag.clone()
        } else {
            self.name.clone()
        }
    }
}

fn bearer_or_cookie(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|s| s.to_string())
        .or_else(|| {
            parts
                .headers
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .and_then(|cookies| {
                    cookies.split(';').find_map(|cookie| {
                        cookie
                            .trim()
                            .strip_prefix("access_token=")
                            .map(|s| s.to_string())
                    })
                })
        })
}

fn resolve(app_state: &AppState, token: &str) -> Result<AuthUser, ApiError> {
    let claims = app_state.auth.verify_access_token(token)?;
    let user_id = claims.user_id()?;

    Ok(AuthUser {
        user_id,
        email: claims.email.clone(),
        name: claims.name.clone(),
        user_tag: claims.user_tag.clone(),
        role: claims.role,
        claims,
    })
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let token = bearer_or_cookie(parts)
            .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))?;
        resolve(&app_state, &token)
    }
}

/// Session if one is present and valid; never rejects.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    pub fn session(&self) -> Option<Session> {
        self.0.as_ref().map(AuthUser::session)
    }
}

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let user = bearer_or_cookie(parts).and_then(|token| resolve(&app_state, &token).ok());
        Ok(MaybeAuthUser(user))
    }
}

/// Helper trait for extracting AppState from composite state types
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

impl FromRef<AppState> for AppState {
    fn from_ref(input: &AppState) -> Self {
        input.clone()
    }
}
