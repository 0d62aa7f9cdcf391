use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Academy-wide role carried by every user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    FullMember,
    AssociateMember,
    Parent,
    Visitor,
}

impl UserRole {
    pub const ALL: [UserRole; 6] = [
        UserRole::SuperAdmin,
        UserRole::Admin,
        UserRole::FullMember,
        UserRole::AssociateMember,
        UserRole::Parent,
        UserRole::Visitor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "SUPER_ADMIN",
            UserRole::Admin => "ADMIN",
            UserRole::FullMember => "FULL_MEMBER",
            UserRole::AssociateMember => "ASSOCIATE_MEMBER",
            UserRole::Parent => "PARENT",
            UserRole::Visitor => "VISITOR",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Broadcast target for notifications and announcements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Audience {
    General,
    Admin,
    Student,
    Parent,
    Community,
    Marketing,
}
