use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use academy_db::models::{Audience, CommunityComment, CommunityPost, NotificationCategory};
use academy_services::dao::DaoError;
use academy_services::rbac::role_label;
use academy_services::sanitize::{has_visible_text, sanitize_html};
use serde::{Deserialize, Serialize};

use super::parse_oid;
use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub author_name: String,
    pub author_role: String,
    pub comment_count: u32,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub content: String,
    pub author_name: String,
    pub author_role: String,
    pub created_at: String,
}

fn to_post_response(p: CommunityPost) -> PostResponse {
    PostResponse {
        id: p.id.map(|id| id.to_hex()).unwrap_or_default(),
        title: p.title,
        content: p.content,
        category: p.category,
        author_name: p.author_name,
        author_role: p.author_role,
        comment_count: p.comment_count,
        created_at: p.created_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}

fn to_comment_response(c: CommunityComment) -> CommentResponse {
    CommentResponse {
        id: c.id.map(|id| id.to_hex()).unwrap_or_default(),
        post_id: c.post_id.to_hex(),
        content: c.content,
        author_name: c.author_name,
        author_role: c.author_role,
        created_at: c.created_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}

pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = state.community.list_posts().await?;
    Ok(Json(posts.into_iter().map(to_post_response).collect()))
}

pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let title = body.title.trim().to_string();
    let category = body.category.trim().to_string();
    if title.is_empty() || category.is_empty() || !has_visible_text(&body.content) {
        return Err(ApiError::BadRequest(
            "title, content and category are required".to_string(),
        ));
    }

    let author_name = auth.display_name();
    let post = state
        .community
        .create_post(
            title,
            sanitize_html(&body.content),
            category,
            author_name.clone(),
            role_label(auth.role).to_string(),
        )
        .await?;

    state
        .notifications
        .create(
            None,
            Audience::Community,
            NotificationCategory::Community,
            "새 커뮤니티 글".to_string(),
            format!("{author_name}님이 \"{}\" 글을 올렸습니다.", post.title),
            Some("/community".to_string()),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(to_post_response(post))))
}

async fn existing_post(state: &AppState, post_id: &str) -> Result<CommunityPost, ApiError> {
    let pid = parse_oid(post_id, "post_id")?;
    state.community.find_post(pid).await.map_err(|e| match e {
        DaoError::NotFound => ApiError::NotFound("Post not found".to_string()),
        other => other.into(),
    })
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let post = existing_post(&state, &post_id).await?;
    let pid = super::require_id(post.id)?;
    let comments = state.community.list_comments(pid).await?;
    Ok(Json(comments.into_iter().map(to_comment_response).collect()))
}

pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_id): Path<String>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    if !has_visible_text(&body.content) {
        return Err(ApiError::BadRequest("content is required".to_string()));
    }
    let post = existing_post(&state, &post_id).await?;
    let pid = super::require_id(post.id)?;

    let comment = state
        .community
        .create_comment(
            pid,
            sanitize_html(&body.content),
            auth.display_name(),
            role_label(auth.role).to_string(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(to_comment_response(comment))))
}
