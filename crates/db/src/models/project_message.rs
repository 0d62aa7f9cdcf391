use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Chat message stored encrypted; all three payload fields are base64.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMessage {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub project_id: ObjectId,
    pub author_id: ObjectId,
    pub author_tag: String,
    pub encrypted_content: String,
    pub iv: String,
    pub auth_tag: String,
    pub created_at: DateTime,
}

impl ProjectMessage {
    pub const COLLECTION: &'static str = "project_messages";
}
