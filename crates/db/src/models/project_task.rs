use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectTask {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub project_id: ObjectId,
    pub title: String,
    pub owner: String,
    pub due_date: DateTime,
    #[serde(default)]
    pub column: ProjectColumn,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl ProjectTask {
    pub const COLLECTION: &'static str = "project_tasks";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectColumn {
    #[default]
    Todo,
    InProgress,
    Review,
}

impl ProjectColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectColumn::Todo => "TODO",
            ProjectColumn::InProgress => "IN_PROGRESS",
            ProjectColumn::Review => "REVIEW",
        }
    }
}

/// Human-readable activity line shown in the project feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectLog {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub project_id: ObjectId,
    pub user_id: ObjectId,
    pub message: String,
    pub created_at: DateTime,
}

impl ProjectLog {
    pub const COLLECTION: &'static str = "project_logs";
}
