pub mod attendance;
pub mod auth;
pub mod class;
pub mod community;
pub mod dashboard;
pub mod kiosk;
pub mod notification;
pub mod project;
pub mod project_file;
pub mod project_message;
pub mod project_task;

use bson::oid::ObjectId;

use crate::error::ApiError;

pub(crate) fn parse_oid(value: &str, field: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value).map_err(|_| ApiError::BadRequest(format!("Invalid {field}")))
}

pub(crate) fn require_id(id: Option<ObjectId>) -> Result<ObjectId, ApiError> {
    id.ok_or_else(|| ApiError::Internal("Stored document has no _id".to_string()))
}
