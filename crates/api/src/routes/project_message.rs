use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::DateTime;
use academy_db::models::ProjectMessage;
use academy_services::chat_cipher::{ChatCipher, EncryptedPayload};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::project::{ensure_access, project_by_slug};
use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState, ws::dispatcher};

pub const UNREADABLE_MESSAGE: &str = "[메시지를 복호화할 수 없습니다.]";

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessageResponse {
    pub id: String,
    pub author_tag: String,
    pub message: String,
    pub created_at: String,
}

fn decrypt_row(cipher: &ChatCipher, row: ProjectMessage) -> ChatMessageResponse {
    let payload = EncryptedPayload {
        ciphertext: row.encrypted_content,
        iv: row.iv,
        auth_tag: row.auth_tag,
    };
    let message = match cipher.decrypt(&payload) {
        Ok(text) => text,
        Err(e) => {
            warn!(id = ?row.id, %e, "Failed to decrypt project message");
            UNREADABLE_MESSAGE.to_string()
        }
    };
    ChatMessageResponse {
        id: row.id.map(|id| id.to_hex()).unwrap_or_default(),
        author_tag: row.author_tag,
        message,
        created_at: row.created_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}

/// Trimmed text capped at `max_chars` characters; `None` when blank.
pub(crate) fn prepare_text(raw: &str, max_chars: usize) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(max_chars).collect())
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<Vec<ChatMessageResponse>>, ApiError> {
    let (_, project_id) = project_by_slug(&state, &slug).await?;
    ensure_access(&state, &auth, project_id).await?;

    let rows = state
        .projects
        .recent_messages(project_id, state.settings.chat.history_limit)
        .await?;
    Ok(Json(
        rows.into_iter()
            .map(|row| decrypt_row(&state.cipher, row))
            .collect(),
    ))
}

pub async fn send(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessageResponse>), ApiError> {
    let text = prepare_text(&body.message, state.settings.chat.max_message_length)
        .ok_or_else(|| ApiError::BadRequest("message is required".to_string()))?;

    let (_, project_id) = project_by_slug(&state, &slug).await?;
    ensure_access(&state, &auth, project_id).await?;

    let encrypted = state.cipher.encrypt(&text)?;
    let author_tag = if auth.user_tag.is_empty() {
        auth.display_name()
    } else {
        auth.user_tag.clone()
    };
    let record = state
        .projects
        .add_message(&ProjectMessage {
            id: None,
            project_id,
            author_id: auth.user_id,
            author_tag,
            encrypted_content: encrypted.ciphertext,
            iv: encrypted.iv,
            auth_tag: encrypted.auth_tag,
            created_at: DateTime::now(),
        })
        .await?;

    let response = ChatMessageResponse {
        id: record.id.map(|id| id.to_hex()).unwrap_or_default(),
        author_tag: record.author_tag,
        message: text,
        created_at: record.created_at.try_to_rfc3339_string().unwrap_or_default(),
    };

    let event = serde_json::json!({
        "type": "chat-message",
        "data": {
            "project_id": project_id.to_hex(),
            "message": &response,
        }
    });
    dispatcher::broadcast_to_room(&state.ws_storage, &project_id, &event).await;

    Ok((StatusCode::CREATED, Json(response)))
}
