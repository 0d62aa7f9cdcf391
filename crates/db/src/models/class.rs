use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub slug: String,
    pub name: String,
    pub category: String,
    pub level: String,
    pub description: Option<String>,
    #[serde(default)]
    pub cost: i64,
    /// Weekdays the class meets, 0 = Sunday through 6 = Saturday.
    #[serde(default)]
    pub class_days: Vec<u32>,
    pub schedule: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub current_students: u32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Class {
    pub const COLLECTION: &'static str = "classes";

    pub fn meets_on(&self, weekday_from_sunday: u32) -> bool {
        self.class_days.contains(&weekday_from_sunday)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub class_id: ObjectId,
    pub created_at: DateTime,
}

impl Enrollment {
    pub const COLLECTION: &'static str = "enrollments";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumWeek {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub class_id: ObjectId,
    pub week_number: u32,
    pub title: String,
    pub description: Option<String>,
    pub open_date: Option<DateTime>,
    #[serde(default)]
    pub files: Vec<CurriculumFile>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl CurriculumWeek {
    pub const COLLECTION: &'static str = "curriculum_weeks";
}

/// Material attached to a curriculum week. The binary itself lives at the
/// media host; only its URL and public id are kept here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurriculumFile {
    pub id: String,
    pub name: String,
    pub url: String,
    pub public_id: Option<String>,
    pub size: Option<i64>,
    pub uploaded_at: DateTime,
    pub uploader_id: ObjectId,
}
