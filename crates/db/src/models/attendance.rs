use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceLog {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub class_id: ObjectId,
    pub kiosk_id: Option<ObjectId>,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    #[serde(default)]
    pub marked_by_kiosk: bool,
    pub check_in_time: DateTime,
}

impl AttendanceLog {
    pub const COLLECTION: &'static str = "attendance_logs";
}

/// Status stored on an attendance record.
///
/// Rows written by older clients may carry a tag outside the known set; those
/// are preserved verbatim in `Other` so they survive a read/write cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttendanceStatus {
    CheckIn,
    Late,
    CheckOut,
    Other(String),
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AttendanceStatus::CheckIn => "CHECK_IN",
            AttendanceStatus::Late => "LATE",
            AttendanceStatus::CheckOut => "CHECK_OUT",
            AttendanceStatus::Other(raw) => raw,
        }
    }

    /// Korean label shown on calendars; unknown tags pass through unchanged.
    pub fn label(&self) -> &str {
        match self {
            AttendanceStatus::CheckIn => "입실",
            AttendanceStatus::Late => "지각",
            AttendanceStatus::CheckOut => "퇴실",
            AttendanceStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for AttendanceStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "CHECK_IN" => AttendanceStatus::CheckIn,
            "LATE" => AttendanceStatus::Late,
            "CHECK_OUT" => AttendanceStatus::CheckOut,
            _ => AttendanceStatus::Other(raw),
        }
    }
}

impl From<AttendanceStatus> for String {
    fn from(status: AttendanceStatus) -> Self {
        match status {
            AttendanceStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}
