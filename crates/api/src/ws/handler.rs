use axum::{
    extract::{Query, State, WebSocketUpgrade, ws::{Message, WebSocket}},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bson::oid::ObjectId;
use futures::{SinkExt, StreamExt};
use academy_db::models::UserRole;
use academy_services::project_access::can_access_project;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::dispatcher::send_to_connection;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: String,
}

pub async fn ws_upgrade(
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
    ws: WebSocketUpgrade,
) -> Response {
    // Verify JWT before accepting the WebSocket
    let claims = match state.auth.verify_access_token(&params.token) {
        Ok(c) => c,
        Err(_) => return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
    };

    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(_) => return (StatusCode::BAD_REQUEST, "Invalid user ID").into_response(),
    };
    let role = claims.role;

    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id, role))
}

async fn handle_socket(socket: WebSocket, state: AppState, user_id: ObjectId, role: UserRole) {
    let connection_id = Uuid::new_v4().to_string();
    info!(?user_id, %connection_id, "WebSocket connected");

    let (sender, mut receiver) = socket.split();
    let sender = Arc::new(Mutex::new(sender));

    state
        .ws_storage
        .add(user_id, connection_id.clone(), sender.clone());

    let connected = serde_json::json!({
        "type": "connected",
        "data": { "user_id": user_id.to_hex(), "connection_id": connection_id },
    });
    send_to_connection(&state.ws_storage, &connection_id, &connected).await;

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                handle_client_message(&state, user_id, role, &connection_id, text.as_str()).await;
            }
            Ok(Message::Ping(data)) => {
                let mut guard = sender.lock().await;
                let _ = guard.send(Message::Pong(data)).await;
            }
            Ok(Message::Close(_)) => break,
            Err(e) => {
                warn!(?user_id, %connection_id, %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    state.ws_storage.remove(&connection_id);
    info!(
        ?user_id,
        %connection_id,
        remaining = state.ws_storage.connection_count(),
        "WebSocket disconnected"
    );
}

fn project_id_of(data: Option<&serde_json::Value>) -> Option<ObjectId> {
    data.and_then(|d| d.get("project_id"))
        .and_then(|p| p.as_str())
        .and_then(|p| ObjectId::parse_str(p).ok())
}

fn error_event(message: &str) -> serde_json::Value {
    serde_json::json!({ "type": "error", "data": { "message": message } })
}

async fn handle_client_message(
    state: &AppState,
    user_id: ObjectId,
    role: UserRole,
    connection_id: &str,
    text: &str,
) {
    let parsed: serde_json::Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(_) => return,
    };

    let msg_type = parsed.get("type").and_then(|t| t.as_str()).unwrap_or("");
    let data = parsed.get("data");

    debug!(?user_id, %connection_id, msg_type, "WS message received");

    match msg_type {
        "ping" => {
            let pong = serde_json::json!({ "type": "pong" });
            send_to_connection(&state.ws_storage, connection_id, &pong).await;
        }
        "join" => {
            let Some(project_id) = project_id_of(data) else {
                send_to_connection(&state.ws_storage, connection_id, &error_event("project_id required")).await;
                return;
            };

            let allowed = match can_access_project(
                state.projects.as_ref(),
                project_id,
                Some(user_id),
                Some(role),
            )
            .await
            {
                Ok(allowed) => allowed,
                Err(e) => {
                    warn!(?user_id, ?project_id, %e, "Membership lookup failed");
                    false
                }
            };

            if !allowed {
                send_to_connection(&state.ws_storage, connection_id, &error_event("Forbidden")).await;
                return;
            }

            state.ws_storage.join_room(project_id, connection_id);
            debug!(?project_id, %connection_id, size = state.ws_storage.room_size(&project_id), "Joined project room");
            let joined = serde_json::json!({
                "type": "joined",
                "data": { "project_id": project_id.to_hex() },
            });
            send_to_connection(&state.ws_storage, connection_id, &joined).await;
        }
        "leave" => {
            if let Some(project_id) = project_id_of(data) {
                state.ws_storage.leave_room(&project_id, connection_id);
                let left = serde_json::json!({
                    "type": "left",
                    "data": { "project_id": project_id.to_hex() },
                });
                send_to_connection(&state.ws_storage, connection_id, &left).await;
            }
        }
        _ => {
            debug!(?user_id, msg_type, "Unknown WS message type");
        }
    }
}
