use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use sha2::{Digest, Sha256};
use academy_db::models::KioskAccount;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct KioskDao {
    pub base: BaseDao<KioskAccount>,
}

/// Hex sha-256 of a kiosk API key, the form stored in `api_key_hash`.
pub fn hash_api_key(api_key: &str) -> String {
    hex::encode(Sha256::digest(api_key.as_bytes()))
}

impl KioskDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, KioskAccount::COLLECTION),
        }
    }

    pub async fn create(&self, name: String, api_key: &str) -> DaoResult<KioskAccount> {
        let now = DateTime::now();
        let kiosk = KioskAccount {
            id: None,
            name,
            api_key_hash: hash_api_key(api_key),
            is_active: true,
            last_used_at: None,
            created_at: now,
            updated_at: now,
        };
        let id = self.base.insert_one(&kiosk).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_active_by_key(&self, api_key: &str) -> DaoResult<KioskAccount> {
        self.base
            .find_one(doc! { "api_key_hash": hash_api_key(api_key), "is_active": true })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn touch(&self, id: ObjectId) -> DaoResult<()> {
        self.base
            .update_by_id(id, doc! { "$set": { "last_used_at": DateTime::now() } })
            .await?;
        Ok(())
    }
}
