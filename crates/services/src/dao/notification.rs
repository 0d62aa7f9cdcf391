use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use academy_db::models::{Audience, Notification, NotificationCategory};

use super::base::{BaseDao, DaoResult};

pub const NOTIFICATION_LIST_LIMIT: i64 = 10;

pub struct NotificationDao {
    pub base: BaseDao<Notification>,
}

impl NotificationDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Notification::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        user_id: Option<ObjectId>,
        audience: Audience,
        category: NotificationCategory,
        title: String,
        message: String,
        link: Option<String>,
    ) -> DaoResult<Notification> {
        let notification = Notification {
            id: None,
            user_id,
            audience,
            category,
            title,
            message,
            link,
            read_at: None,
            created_at: DateTime::now(),
        };
        let id = self.base.insert_one(&notification).await?;
        self.base.find_by_id(id).await
    }

    /// Latest notifications targeted at the user, at their audience, or at
    /// everyone.
    pub async fn list_for(&self, user_id: ObjectId, audience: Audience) -> DaoResult<Vec<Notification>> {
        let audiences = audience_filter(audience);
        self.base
            .find_limited(
                doc! {
                    "$or": [
                        { "user_id": user_id },
                        { "user_id": null, "audience": { "$in": audiences } },
                    ]
                },
                Some(doc! { "created_at": -1 }),
                Some(NOTIFICATION_LIST_LIMIT),
            )
            .await
    }

    /// Broadcast notices for one audience only.
    pub async fn list_broadcast(&self, audience: Audience, limit: i64) -> DaoResult<Vec<Notification>> {
        self.base
            .find_limited(
                doc! { "user_id": null, "audience": bson::to_bson(&audience)? },
                Some(doc! { "created_at": -1 }),
                Some(limit),
            )
            .await
    }

    /// Marks the given rows read when they belong to the user or are
    /// broadcasts. Returns the number of rows changed.
    pub async fn mark_read(&self, ids: &[ObjectId], user_id: ObjectId) -> DaoResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        self.base
            .update_many_raw(
                doc! {
                    "_id": { "$in": ids.to_vec() },
                    "$or": [ { "user_id": user_id }, { "user_id": null } ],
                    "read_at": null,
                },
                doc! { "$set": { "read_at": DateTime::now() } },
            )
            .await
    }
}

fn audience_filter(audience: Audience) -> Vec<bson::Bson> {
    let mut tags = vec![bson::Bson::String(audience_tag(Audience::General).to_string())];
    if audience != Audience::General {
        tags.push(bson::Bson::String(audience_tag(audience).to_string()));
    }
    tags
}

fn audience_tag(audience: Audience) -> &'static str {
    match audience {
        Audience::General => "GENERAL",
        Audience::Admin => "ADMIN",
        Audience::Student => "STUDENT",
        Audience::Parent => "PARENT",
        Audience::Community => "COMMUNITY",
        Audience::Marketing => "MARKETING",
    }
}
