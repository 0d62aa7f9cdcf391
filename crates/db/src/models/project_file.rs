use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// One version of a logical file inside a project. Versions of the same
/// `logical_name` count up from 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub project_id: ObjectId,
    pub logical_name: String,
    pub file_name: String,
    pub file_url: String,
    pub public_id: Option<String>,
    pub language: Option<String>,
    pub change_summary: Option<String>,
    pub version: u32,
    pub size: Option<i64>,
    pub uploaded_by: ObjectId,
    pub uploaded_at: DateTime,
}

impl ProjectFile {
    pub const COLLECTION: &'static str = "project_files";
}
