use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use super::role::Audience;

/// A notification is either targeted (`user_id` set) or broadcast to an
/// audience (`user_id` empty).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: Option<ObjectId>,
    pub audience: Audience,
    pub category: NotificationCategory,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub read_at: Option<DateTime>,
    pub created_at: DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationCategory {
    Notice,
    Assignment,
    Message,
    Project,
    Community,
}

impl Notification {
    pub const COLLECTION: &'static str = "notifications";
}
