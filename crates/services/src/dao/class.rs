use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use academy_db::models::{Class, CurriculumFile, CurriculumWeek, Enrollment};

use super::base::{BaseDao, DaoError, DaoResult};

pub struct ClassDao {
    pub base: BaseDao<Class>,
    pub enrollments: BaseDao<Enrollment>,
    pub weeks: BaseDao<CurriculumWeek>,
}

impl ClassDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Class::COLLECTION),
            enrollments: BaseDao::new(db, Enrollment::COLLECTION),
            weeks: BaseDao::new(db, CurriculumWeek::COLLECTION),
        }
    }

    pub async fn find_by_slug(&self, slug: &str) -> DaoResult<Class> {
        self.base
            .find_one(doc! { "slug": slug })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn enroll(&self, user_id: ObjectId, class_id: ObjectId) -> DaoResult<Enrollment> {
        let enrollment = Enrollment {
            id: None,
            user_id,
            class_id,
            created_at: DateTime::now(),
        };
        let id = self.enrollments.insert_one(&enrollment).await?;
        self.base
            .update_by_id(class_id, doc! { "$inc": { "current_students": 1 } })
            .await?;
        self.enrollments.find_by_id(id).await
    }

    /// Classes the user is enrolled in, in enrollment order.
    pub async fn find_enrolled_classes(&self, user_id: ObjectId) -> DaoResult<Vec<Class>> {
        let enrollments = self
            .enrollments
            .find_many(doc! { "user_id": user_id }, Some(doc! { "created_at": 1 }))
            .await?;
        if enrollments.is_empty() {
            return Ok(Vec::new());
        }

        let class_ids: Vec<ObjectId> = enrollments.iter().map(|e| e.class_id).collect();
        let classes = self
            .base
            .find_many(doc! { "_id": { "$in": class_ids.clone() } }, None)
            .await?;

        // `$in` does not preserve order; restore enrollment order
        Ok(class_ids
            .iter()
            .filter_map(|cid| classes.iter().find(|c| c.id == Some(*cid)).cloned())
            .collect())
    }

    pub async fn find_week_in_class(
        &self,
        class_id: ObjectId,
        week_id: ObjectId,
    ) -> DaoResult<CurriculumWeek> {
        self.weeks
            .find_one(doc! { "_id": week_id, "class_id": class_id })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn add_material(&self, week_id: ObjectId, file: &CurriculumFile) -> DaoResult<()> {
        let file_doc = bson::to_bson(file)?;
        let matched = self
            .weeks
            .update_by_id(week_id, doc! { "$push": { "files": file_doc } })
            .await?;
        if !matched {
            return Err(DaoError::NotFound);
        }
        Ok(())
    }

    /// Removes a material from whichever week of the class holds it and
    /// returns the removed entry.
    pub async fn remove_material(
        &self,
        class_id: ObjectId,
        file_id: &str,
    ) -> DaoResult<CurriculumFile> {
        let week = self
            .weeks
            .find_one(doc! { "class_id": class_id, "files.id": file_id })
            .await?
            .ok_or(DaoError::NotFound)?;
        let removed = week
            .files
            .iter()
            .find(|f| f.id == file_id)
            .cloned()
            .ok_or(DaoError::NotFound)?;

        let week_id = week.id.ok_or(DaoError::NotFound)?;
        self.weeks
            .update_by_id(week_id, doc! { "$pull": { "files": { "id": file_id } } })
            .await?;
        Ok(removed)
    }
}
