use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

use crate::models::{
    AttendanceLog, Class, CommunityComment, CommunityPost, CurriculumWeek, Enrollment,
    KioskAccount, Notification, ParentLink, Project, ProjectFile, ProjectLog, ProjectMember,
    ProjectMessage, ProjectTask, User,
};

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Users
    create_indexes(
        db,
        User::COLLECTION,
        vec![
            index_unique(bson::doc! { "email": 1 }),
            index_unique(bson::doc! { "user_tag": 1 }),
            index(bson::doc! { "role": 1 }),
        ],
    )
    .await?;

    // Parent links
    create_indexes(
        db,
        ParentLink::COLLECTION,
        vec![
            index_unique(bson::doc! { "student_id": 1, "parent_id": 1 }),
            index(bson::doc! { "parent_id": 1 }),
        ],
    )
    .await?;

    // Classes and enrollments
    create_indexes(
        db,
        Class::COLLECTION,
        vec![index_unique(bson::doc! { "slug": 1 })],
    )
    .await?;
    create_indexes(
        db,
        Enrollment::COLLECTION,
        vec![
            index_unique(bson::doc! { "user_id": 1, "class_id": 1 }),
            index(bson::doc! { "class_id": 1 }),
        ],
    )
    .await?;
    create_indexes(
        db,
        CurriculumWeek::COLLECTION,
        vec![
            index(bson::doc! { "class_id": 1, "week_number": 1 }),
            index(bson::doc! { "files.id": 1 }),
        ],
    )
    .await?;

    // Attendance
    create_indexes(
        db,
        AttendanceLog::COLLECTION,
        vec![
            index(bson::doc! { "user_id": 1, "check_in_time": -1 }),
            index(bson::doc! { "check_in_time": -1 }),
        ],
    )
    .await?;
    create_indexes(
        db,
        KioskAccount::COLLECTION,
        vec![index_unique(bson::doc! { "api_key_hash": 1 })],
    )
    .await?;

    // Notifications
    create_indexes(
        db,
        Notification::COLLECTION,
        vec![
            index(bson::doc! { "user_id": 1, "created_at": -1 }),
            index(bson::doc! { "audience": 1, "created_at": -1 }),
        ],
    )
    .await?;

    // Community
    create_indexes(
        db,
        CommunityPost::COLLECTION,
        vec![index(bson::doc! { "created_at": -1 })],
    )
    .await?;
    create_indexes(
        db,
        CommunityComment::COLLECTION,
        vec![index(bson::doc! { "post_id": 1, "created_at": 1 })],
    )
    .await?;

    // Projects
    create_indexes(
        db,
        Project::COLLECTION,
        vec![index_unique(bson::doc! { "slug": 1 })],
    )
    .await?;
    create_indexes(
        db,
        ProjectMember::COLLECTION,
        vec![
            index_unique(bson::doc! { "project_id": 1, "user_id": 1 }),
            index(bson::doc! { "user_id": 1 }),
        ],
    )
    .await?;
    create_indexes(
        db,
        ProjectFile::COLLECTION,
        vec![
            index(bson::doc! { "project_id": 1, "logical_name": 1, "version": -1 }),
            index(bson::doc! { "project_id": 1, "uploaded_at": -1 }),
        ],
    )
    .await?;
    create_indexes(
        db,
        ProjectTask::COLLECTION,
        vec![index(bson::doc! { "project_id": 1, "due_date": 1 })],
    )
    .await?;
    create_indexes(
        db,
        ProjectLog::COLLECTION,
        vec![index(bson::doc! { "project_id": 1, "created_at": -1 })],
    )
    .await?;
    create_indexes(
        db,
        ProjectMessage::COLLECTION,
        vec![index(bson::doc! { "project_id": 1, "created_at": -1 })],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
