use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityPost {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    /// Sanitised HTML.
    pub content: String,
    pub category: String,
    pub author_name: String,
    pub author_role: String,
    #[serde(default)]
    pub comment_count: u32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl CommunityPost {
    pub const COLLECTION: &'static str = "community_posts";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityComment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub post_id: ObjectId,
    pub content: String,
    pub author_name: String,
    pub author_role: String,
    pub created_at: DateTime,
}

impl CommunityComment {
    pub const COLLECTION: &'static str = "community_comments";
}
