use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
};
use academy_db::models::{User, UserRole};
use academy_services::auth::TokenPair;
use academy_services::rbac::{dashboard_path_for, role_label};
use serde::{Deserialize, Serialize};

use super::require_id;
use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub user_tag: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub user: UserResponse,
    /// Where the client should land after signing in.
    pub dashboard: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub user_tag: String,
    pub role: UserRole,
    pub role_label: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub(crate) fn to_user_response(user: &User) -> Result<UserResponse, ApiError> {
    Ok(UserResponse {
        id: require_id(user.id)?.to_hex(),
        email: user.email.clone(),
        name: user.name.clone(),
        user_tag: user.user_tag.clone(),
        role: user.role,
        role_label: role_label(user.role).to_string(),
    })
}

fn cookie_headers(tokens: &TokenPair) -> Result<HeaderMap, ApiError> {
    let cookie = format!(
        "access_token={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        tokens.access_token, tokens.expires_in
    );
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| ApiError::Internal(e.to_string()))?,
    );
    Ok(headers)
}

fn auth_response(user: &User, tokens: TokenPair) -> Result<AuthResponse, ApiError> {
    Ok(AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
        user: to_user_response(user)?,
        dashboard: dashboard_path_for(Some(user.role)).to_string(),
    })
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, HeaderMap, Json<AuthResponse>), ApiError> {
    let email = body.email.trim().to_lowercase();
    let name = body.name.trim().to_string();
    let user_tag = body.user_tag.trim().to_string();
    if email.is_empty() || name.is_empty() || user_tag.is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "email, name, user_tag and password are required".to_string(),
        ));
    }

    let password_hash = state.auth.hash_password(&body.password)?;
    let user = state
        .users
        .create(email, name, user_tag, password_hash, UserRole::AssociateMember)
        .await?;

    let tokens = state.auth.generate_tokens(&user)?;
    let headers = cookie_headers(&tokens)?;
    Ok((StatusCode::CREATED, headers, Json(auth_response(&user, tokens)?)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    let user = state
        .users
        .find_by_email(&body.email.trim().to_lowercase())
        .await
        .map_err(|_| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let password_hash = user
        .password_hash
        .as_ref()
        .ok_or_else(|| ApiError::Unauthorized("No password set".to_string()))?;

    let valid = state.auth.verify_password(&body.password, password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let tokens = state.auth.generate_tokens(&user)?;
    let headers = cookie_headers(&tokens)?;
    Ok((headers, Json(auth_response(&user, tokens)?)))
}

pub async fn logout() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_static("access_token=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0"),
    );
    headers
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.base.find_by_id(auth.user_id).await?;
    Ok(Json(to_user_response(&user)?))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    let claims = state.auth.verify_refresh_token(&body.refresh_token)?;
    let user = state.users.base.find_by_id(claims.user_id()?).await?;

    // Re-issue from the stored record so role changes take effect
    let tokens = state.auth.generate_tokens(&user)?;
    let headers = cookie_headers(&tokens)?;
    Ok((headers, Json(auth_response(&user, tokens)?)))
}
