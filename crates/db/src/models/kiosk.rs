use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KioskAccount {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    /// Hex sha-256 of the kiosk API key. The key itself is never stored.
    pub api_key_hash: String,
    #[serde(default = "bool_true")]
    pub is_active: bool,
    pub last_used_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn bool_true() -> bool {
    true
}

impl KioskAccount {
    pub const COLLECTION: &'static str = "kiosk_accounts";
}
