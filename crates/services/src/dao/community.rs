use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use academy_db::models::{CommunityComment, CommunityPost};

use super::base::{BaseDao, DaoError, DaoResult};

pub const POST_LIST_LIMIT: i64 = 20;

pub struct CommunityDao {
    pub posts: BaseDao<CommunityPost>,
    pub comments: BaseDao<CommunityComment>,
}

impl CommunityDao {
    pub fn new(db: &Database) -> Self {
        Self {
            posts: BaseDao::new(db, CommunityPost::COLLECTION),
            comments: BaseDao::new(db, CommunityComment::COLLECTION),
        }
    }

    pub async fn list_posts(&self) -> DaoResult<Vec<CommunityPost>> {
        self.posts
            .find_limited(doc! {}, Some(doc! { "created_at": -1 }), Some(POST_LIST_LIMIT))
            .await
    }

    pub async fn find_post(&self, post_id: ObjectId) -> DaoResult<CommunityPost> {
        self.posts.find_by_id(post_id).await
    }

    pub async fn create_post(
        &self,
        title: String,
        content: String,
        category: String,
        author_name: String,
        author_role: String,
    ) -> DaoResult<CommunityPost> {
        let now = DateTime::now();
        let post = CommunityPost {
            id: None,
            title,
            content,
            category,
            author_name,
            author_role,
            comment_count: 0,
            created_at: now,
            updated_at: now,
        };
        let id = self.posts.insert_one(&post).await?;
        self.posts.find_by_id(id).await
    }

    pub async fn list_comments(&self, post_id: ObjectId) -> DaoResult<Vec<CommunityComment>> {
        self.comments
            .find_many(doc! { "post_id": post_id }, Some(doc! { "created_at": 1 }))
            .await
    }

    pub async fn create_comment(
        &self,
        post_id: ObjectId,
        content: String,
        author_name: String,
        author_role: String,
    ) -> DaoResult<CommunityComment> {
        let comment = CommunityComment {
            id: None,
            post_id,
            content,
            author_name,
            author_role,
            created_at: DateTime::now(),
        };
        let id = self.comments.insert_one(&comment).await?;

        let matched = self
            .posts
            .update_by_id(post_id, doc! { "$inc": { "comment_count": 1 } })
            .await?;
        if !matched {
            return Err(DaoError::NotFound);
        }
        self.comments.find_by_id(id).await
    }
}
