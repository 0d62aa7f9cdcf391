use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use academy_db::models::{AttendanceLog, AttendanceStatus};

use super::base::{BaseDao, DaoResult};

pub struct AttendanceDao {
    pub base: BaseDao<AttendanceLog>,
}

impl AttendanceDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, AttendanceLog::COLLECTION),
        }
    }

    pub async fn record(
        &self,
        user_id: ObjectId,
        class_id: ObjectId,
        kiosk_id: Option<ObjectId>,
        status: AttendanceStatus,
        note: Option<String>,
    ) -> DaoResult<AttendanceLog> {
        let log = AttendanceLog {
            id: None,
            user_id,
            class_id,
            marked_by_kiosk: kiosk_id.is_some(),
            kiosk_id,
            status,
            note,
            check_in_time: DateTime::now(),
        };
        let id = self.base.insert_one(&log).await?;
        self.base.find_by_id(id).await
    }

    /// The user's records with `from <= check_in_time < to`, oldest first.
    pub async fn for_user_between(
        &self,
        user_id: ObjectId,
        from: DateTime,
        to: DateTime,
        limit: i64,
    ) -> DaoResult<Vec<AttendanceLog>> {
        self.base
            .find_limited(
                doc! {
                    "user_id": user_id,
                    "check_in_time": { "$gte": from, "$lt": to },
                },
                Some(doc! { "check_in_time": 1 }),
                Some(limit),
            )
            .await
    }

    pub async fn recent(&self, limit: i64) -> DaoResult<Vec<AttendanceLog>> {
        self.base
            .find_limited(doc! {}, Some(doc! { "check_in_time": -1 }), Some(limit))
            .await
    }

    pub async fn count_since(&self, since: DateTime) -> DaoResult<u64> {
        self.base.count(doc! { "check_in_time": { "$gte": since } }).await
    }
}
