use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use super::role::UserRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub name: String,
    /// Unique `name#0001` handle typed at kiosks and used for invites.
    pub user_tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub deleted_at: Option<DateTime>,
}

impl User {
    pub const COLLECTION: &'static str = "users";

    /// Name shown in activity logs and chat, falling back to the tag.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.user_tag
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentLink {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub student_id: ObjectId,
    pub parent_id: ObjectId,
    pub created_at: DateTime,
}

impl ParentLink {
    pub const COLLECTION: &'static str = "parent_links";
}
