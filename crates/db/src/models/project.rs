use std::fmt;
use std::str::FromStr;

use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub progress: u8,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Project {
    pub const COLLECTION: &'static str = "projects";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Planning,
    InProgress,
    Review,
    Complete,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMember {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub project_id: ObjectId,
    pub user_id: ObjectId,
    pub role: ProjectRole,
    pub created_at: DateTime,
}

impl ProjectMember {
    pub const COLLECTION: &'static str = "project_members";
}

/// Role inside a single project.
///
/// New memberships are only ever written as `Owner` or `Member`; rows that
/// predate write-time validation and carry any other text read back as
/// `Unrecognized`, which grants no owner rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectRole {
    Owner,
    Member,
    #[serde(other)]
    Unrecognized,
}

impl ProjectRole {
    pub fn is_owner(&self) -> bool {
        matches!(self, ProjectRole::Owner)
    }
}

impl fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProjectRole::Owner => "Owner",
            ProjectRole::Member => "Member",
            ProjectRole::Unrecognized => "Unrecognized",
        };
        f.write_str(s)
    }
}

/// Only the two assignable roles parse.
impl FromStr for ProjectRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Owner" => Ok(ProjectRole::Owner),
            "Member" => Ok(ProjectRole::Member),
            other => Err(format!("Invalid project role '{other}', expected Owner or Member")),
        }
    }
}
