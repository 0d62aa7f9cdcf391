use async_trait::async_trait;
use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::Database;
use academy_db::models::{
    Project, ProjectColumn, ProjectFile, ProjectLog, ProjectMember, ProjectMessage, ProjectRole,
    ProjectStatus, ProjectTask,
};

use super::base::{BaseDao, DaoError, DaoResult};
use crate::project_access::MembershipLookup;

pub const RECENT_LOG_LIMIT: i64 = 20;

pub struct ProjectDao {
    pub base: BaseDao<Project>,
    pub members: BaseDao<ProjectMember>,
    pub files: BaseDao<ProjectFile>,
    pub tasks: BaseDao<ProjectTask>,
    pub logs: BaseDao<ProjectLog>,
    pub messages: BaseDao<ProjectMessage>,
}

/// Fields of a new file version; the version number is assigned on insert.
pub struct NewProjectFile {
    pub logical_name: String,
    pub file_name: String,
    pub file_url: String,
    pub public_id: Option<String>,
    pub language: Option<String>,
    pub change_summary: Option<String>,
    pub size: Option<i64>,
}

#[derive(Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub owner: Option<String>,
    pub due_date: Option<DateTime>,
    pub column: Option<ProjectColumn>,
}

impl ProjectDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Project::COLLECTION),
            members: BaseDao::new(db, ProjectMember::COLLECTION),
            files: BaseDao::new(db, ProjectFile::COLLECTION),
            tasks: BaseDao::new(db, ProjectTask::COLLECTION),
            logs: BaseDao::new(db, ProjectLog::COLLECTION),
            messages: BaseDao::new(db, ProjectMessage::COLLECTION),
        }
    }

    /// Creates the project and makes `creator_id` its owner.
    pub async fn create(
        &self,
        slug: String,
        title: String,
        description: Option<String>,
        creator_id: ObjectId,
    ) -> DaoResult<Project> {
        let now = DateTime::now();
        let project = Project {
            id: None,
            slug,
            title,
            description,
            status: ProjectStatus::Planning,
            progress: 0,
            created_at: now,
            updated_at: now,
        };
        let project_id = self.base.insert_one(&project).await?;
        if let Err(e) = self
            .add_member(project_id, creator_id, ProjectRole::Owner)
            .await
        {
            // No project may exist without its owner row.
            self.base.hard_delete(doc! { "_id": project_id }).await?;
            return Err(e);
        }
        self.base.find_by_id(project_id).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> DaoResult<Project> {
        self.base
            .find_one(doc! { "slug": slug })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn list_all(&self) -> DaoResult<Vec<Project>> {
        self.base
            .find_many(doc! {}, Some(doc! { "updated_at": -1 }))
            .await
    }

    /// Projects the user holds a membership in.
    pub async fn list_for_member(&self, user_id: ObjectId) -> DaoResult<Vec<Project>> {
        let memberships = self
            .members
            .find_many(doc! { "user_id": user_id }, None)
            .await?;
        if memberships.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<ObjectId> = memberships.into_iter().map(|m| m.project_id).collect();
        self.base
            .find_many(doc! { "_id": { "$in": ids } }, Some(doc! { "updated_at": -1 }))
            .await
    }

    pub async fn count(&self) -> DaoResult<u64> {
        self.base.count(doc! {}).await
    }

    // -- members --

    pub async fn find_membership(
        &self,
        project_id: ObjectId,
        user_id: ObjectId,
    ) -> DaoResult<Option<ProjectMember>> {
        self.members
            .find_one(doc! { "project_id": project_id, "user_id": user_id })
            .await
    }

    /// Fails with `DuplicateKey` when the pair already exists.
    pub async fn add_member(
        &self,
        project_id: ObjectId,
        user_id: ObjectId,
        role: ProjectRole,
    ) -> DaoResult<ProjectMember> {
        if role == ProjectRole::Unrecognized {
            return Err(DaoError::Validation(
                "project role must be Owner or Member".to_string(),
            ));
        }
        let member = ProjectMember {
            id: None,
            project_id,
            user_id,
            role,
            created_at: DateTime::now(),
        };
        let id = self.members.insert_one(&member).await?;
        self.members.find_by_id(id).await
    }

    pub async fn list_members(&self, project_id: ObjectId) -> DaoResult<Vec<ProjectMember>> {
        self.members
            .find_many(doc! { "project_id": project_id }, Some(doc! { "created_at": 1 }))
            .await
    }

    // -- files --

    /// Next version number for a logical file: highest existing + 1, or 1.
    pub async fn next_file_version(
        &self,
        project_id: ObjectId,
        logical_name: &str,
    ) -> DaoResult<u32> {
        let latest = self
            .files
            .find_limited(
                doc! { "project_id": project_id, "logical_name": logical_name },
                Some(doc! { "version": -1 }),
                Some(1),
            )
            .await?;
        Ok(latest.first().map_or(1, |f| f.version + 1))
    }

    pub async fn add_file(
        &self,
        project_id: ObjectId,
        uploaded_by: ObjectId,
        file: NewProjectFile,
    ) -> DaoResult<ProjectFile> {
        let version = self
            .next_file_version(project_id, &file.logical_name)
            .await?;
        let record = ProjectFile {
            id: None,
            project_id,
            logical_name: file.logical_name,
            file_name: file.file_name,
            file_url: file.file_url,
            public_id: file.public_id,
            language: file.language,
            change_summary: file.change_summary,
            version,
            size: file.size,
            uploaded_by,
            uploaded_at: DateTime::now(),
        };
        let id = self.files.insert_one(&record).await?;
        self.files.find_by_id(id).await
    }

    /// Every version, newest upload first.
    pub async fn list_files(&self, project_id: ObjectId) -> DaoResult<Vec<ProjectFile>> {
        self.files
            .find_many(
                doc! { "project_id": project_id },
                Some(doc! { "uploaded_at": -1, "version": -1 }),
            )
            .await
    }

    pub async fn find_file(&self, file_id: ObjectId) -> DaoResult<ProjectFile> {
        self.files.find_by_id(file_id).await
    }

    pub async fn delete_file(&self, file_id: ObjectId) -> DaoResult<()> {
        let deleted = self.files.hard_delete(doc! { "_id": file_id }).await?;
        if deleted == 0 {
            return Err(DaoError::NotFound);
        }
        Ok(())
    }

    // -- tasks --

    pub async fn create_task(
        &self,
        project_id: ObjectId,
        title: String,
        owner: String,
        due_date: DateTime,
        column: ProjectColumn,
    ) -> DaoResult<ProjectTask> {
        let now = DateTime::now();
        let task = ProjectTask {
            id: None,
            project_id,
            title,
            owner,
            due_date,
            column,
            created_at: now,
            updated_at: now,
        };
        let id = self.tasks.insert_one(&task).await?;
        self.tasks.find_by_id(id).await
    }

    pub async fn find_task(&self, task_id: ObjectId) -> DaoResult<ProjectTask> {
        self.tasks.find_by_id(task_id).await
    }

    pub async fn list_tasks(&self, project_id: ObjectId) -> DaoResult<Vec<ProjectTask>> {
        self.tasks
            .find_many(doc! { "project_id": project_id }, Some(doc! { "due_date": 1 }))
            .await
    }

    pub async fn update_task(&self, task_id: ObjectId, update: TaskUpdate) -> DaoResult<ProjectTask> {
        let mut set = Document::new();
        if let Some(title) = update.title {
            set.insert("title", title);
        }
        if let Some(owner) = update.owner {
            set.insert("owner", owner);
        }
        if let Some(due_date) = update.due_date {
            set.insert("due_date", due_date);
        }
        if let Some(column) = update.column {
            set.insert("column", column.as_str());
        }

        let matched = self.tasks.update_by_id(task_id, doc! { "$set": set }).await?;
        if !matched {
            return Err(DaoError::NotFound);
        }
        self.tasks.find_by_id(task_id).await
    }

    pub async fn delete_task(&self, task_id: ObjectId) -> DaoResult<()> {
        let deleted = self.tasks.hard_delete(doc! { "_id": task_id }).await?;
        if deleted == 0 {
            return Err(DaoError::NotFound);
        }
        Ok(())
    }

    // -- activity log --

    pub async fn add_log(
        &self,
        project_id: ObjectId,
        user_id: ObjectId,
        message: String,
    ) -> DaoResult<()> {
        let log = ProjectLog {
            id: None,
            project_id,
            user_id,
            message,
            created_at: DateTime::now(),
        };
        self.logs.insert_one(&log).await?;
        Ok(())
    }

    pub async fn recent_logs(&self, project_id: ObjectId) -> DaoResult<Vec<ProjectLog>> {
        self.logs
            .find_limited(
                doc! { "project_id": project_id },
                Some(doc! { "created_at": -1 }),
                Some(RECENT_LOG_LIMIT),
            )
            .await
    }

    // -- chat --

    pub async fn add_message(&self, message: &ProjectMessage) -> DaoResult<ProjectMessage> {
        let id = self.messages.insert_one(message).await?;
        self.messages.find_by_id(id).await
    }

    /// The latest `limit` messages, returned oldest first.
    pub async fn recent_messages(
        &self,
        project_id: ObjectId,
        limit: i64,
    ) -> DaoResult<Vec<ProjectMessage>> {
        let mut messages = self
            .messages
            .find_limited(
                doc! { "project_id": project_id },
                Some(doc! { "created_at": -1, "_id": -1 }),
                Some(limit),
            )
            .await?;
        messages.reverse();
        Ok(messages)
    }
}

#[async_trait]
impl MembershipLookup for ProjectDao {
    async fn membership(
        &self,
        project_id: ObjectId,
        user_id: ObjectId,
    ) -> DaoResult<Option<ProjectRole>> {
        Ok(self
            .find_membership(project_id, user_id)
            .await?
            .map(|m| m.role))
    }
}
