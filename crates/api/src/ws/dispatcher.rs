use axum::extract::ws::Message;
use bson::oid::ObjectId;
use futures::SinkExt;
use tracing::{debug, warn};

use super::storage::{WsSender, WsStorage};

async fn send_text(sender: &WsSender, text: String) -> Result<(), axum::Error> {
    let mut guard = sender.lock().await;
    guard.send(Message::text(text)).await
}

/// Sends a JSON event to every connection in a project's chat room.
pub async fn broadcast_to_room(
    ws_storage: &WsStorage,
    project_id: &ObjectId,
    message: &serde_json::Value,
) {
    let text = message.to_string();

    for (connection_id, sender) in ws_storage.room_senders(project_id) {
        if let Err(e) = send_text(&sender, text.clone()).await {
            warn!(?project_id, %connection_id, %e, "Failed to send WS message");
        } else {
            debug!(?project_id, %connection_id, "WS message sent");
        }
    }
}

pub async fn send_to_connection(
    ws_storage: &WsStorage,
    connection_id: &str,
    message: &serde_json::Value,
) {
    let Some(sender) = ws_storage.get_sender(connection_id) else {
        return;
    };
    if let Err(e) = send_text(&sender, message.to_string()).await {
        warn!(%connection_id, %e, "Failed to send WS message");
    }
}

/// Sends a JSON event to all of a user's connections.
pub async fn send_to_user(ws_storage: &WsStorage, user_id: &ObjectId, message: &serde_json::Value) {
    let text = message.to_string();
    for sender in ws_storage.get_user_senders(user_id) {
        if let Err(e) = send_text(&sender, text.clone()).await {
            warn!(?user_id, %e, "Failed to send WS message");
        }
    }
}
