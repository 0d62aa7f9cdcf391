use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use bson::oid::ObjectId;
use dashmap::DashMap;
use futures::stream::SplitSink;
use tokio::sync::Mutex;

pub type WsSender = Arc<Mutex<SplitSink<WebSocket, Message>>>;

struct Connection {
    user_id: ObjectId,
    sender: WsSender,
}

/// Live WebSocket connections keyed by connection id, plus project chat
/// rooms. A user may hold several connections (tabs, devices).
pub struct WsStorage {
    connections: DashMap<String, Connection>,
    rooms: DashMap<ObjectId, HashSet<String>>,
}

impl WsStorage {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            rooms: DashMap::new(),
        }
    }

    pub fn add(&self, user_id: ObjectId, connection_id: String, sender: WsSender) {
        self.connections
            .insert(connection_id, Connection { user_id, sender });
    }

    /// Drops the connection and removes it from every room it joined.
    pub fn remove(&self, connection_id: &str) {
        self.connections.remove(connection_id);
        self.rooms.retain(|_, members| {
            members.remove(connection_id);
            !members.is_empty()
        });
    }

    pub fn join_room(&self, project_id: ObjectId, connection_id: &str) {
        self.rooms
            .entry(project_id)
            .or_default()
            .insert(connection_id.to_string());
    }

    pub fn leave_room(&self, project_id: &ObjectId, connection_id: &str) {
        if let Some(mut members) = self.rooms.get_mut(project_id) {
            members.remove(connection_id);
            if members.is_empty() {
                drop(members);
                self.rooms.remove(project_id);
            }
        }
    }

    pub fn get_sender(&self, connection_id: &str) -> Option<WsSender> {
        self.connections.get(connection_id).map(|c| c.sender.clone())
    }

    pub fn get_user_senders(&self, user_id: &ObjectId) -> Vec<WsSender> {
        self.connections
            .iter()
            .filter(|c| c.user_id == *user_id)
            .map(|c| c.sender.clone())
            .collect()
    }

    pub fn room_senders(&self, project_id: &ObjectId) -> Vec<(String, WsSender)> {
        let Some(members) = self.rooms.get(project_id).map(|m| m.clone()) else {
            return Vec::new();
        };
        members
            .into_iter()
            .filter_map(|conn_id| {
                let sender = self.get_sender(&conn_id)?;
                Some((conn_id, sender))
            })
            .collect()
    }

    pub fn room_size(&self, project_id: &ObjectId) -> usize {
        self.rooms.get(project_id).map_or(0, |m| m.len())
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for WsStorage {
    fn default() -> Self {
        Self::new()
    }
}
