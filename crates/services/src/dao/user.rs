use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use academy_db::models::{ParentLink, User, UserRole};

use super::base::{BaseDao, DaoError, DaoResult};

pub struct UserDao {
    pub base: BaseDao<User>,
    pub parent_links: BaseDao<ParentLink>,
}

impl UserDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
            parent_links: BaseDao::new(db, ParentLink::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        email: String,
        name: String,
        user_tag: String,
        password_hash: String,
        role: UserRole,
    ) -> DaoResult<User> {
        let now = DateTime::now();
        let user = User {
            id: None,
            email,
            name,
            user_tag,
            password_hash: Some(password_hash),
            role,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let id = self.base.insert_one(&user).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<User> {
        self.base
            .find_one(doc! { "email": email, "deleted_at": null })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn find_by_tag(&self, user_tag: &str) -> DaoResult<User> {
        self.base
            .find_one(doc! { "user_tag": user_tag, "deleted_at": null })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> DaoResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.base
            .find_many(doc! { "_id": { "$in": ids.to_vec() } }, Some(doc! { "name": 1 }))
            .await
    }

    pub async fn link_parent(
        &self,
        student_id: ObjectId,
        parent_id: ObjectId,
    ) -> DaoResult<ParentLink> {
        let link = ParentLink {
            id: None,
            student_id,
            parent_id,
            created_at: DateTime::now(),
        };
        let id = self.parent_links.insert_one(&link).await?;
        self.parent_links.find_by_id(id).await
    }

    /// Students linked to the given parent account.
    pub async fn find_children(&self, parent_id: ObjectId) -> DaoResult<Vec<User>> {
        let links = self
            .parent_links
            .find_many(doc! { "parent_id": parent_id }, None)
            .await?;
        let ids: Vec<ObjectId> = links.into_iter().map(|l| l.student_id).collect();
        self.find_by_ids(&ids).await
    }

    pub async fn count_active(&self) -> DaoResult<u64> {
        self.base.count(doc! { "deleted_at": null }).await
    }
}
