use async_trait::async_trait;
use bson::oid::ObjectId;
use academy_db::models::{ProjectRole, UserRole};

use crate::dao::DaoResult;
use crate::rbac::is_admin_tier;

/// Source of project memberships.
#[async_trait]
pub trait MembershipLookup: Send + Sync {
    /// The caller's in-project role, or `None` when not a member.
    async fn membership(
        &self,
        project_id: ObjectId,
        user_id: ObjectId,
    ) -> DaoResult<Option<ProjectRole>>;
}

pub async fn can_access_project<S: MembershipLookup + ?Sized>(
    store: &S,
    project_id: ObjectId,
    user_id: Option<ObjectId>,
    role: Option<UserRole>,
) -> DaoResult<bool> {
    let Some(user_id) = user_id else {
        return Ok(false);
    };
    if is_admin_tier(role) {
        return Ok(true);
    }
    Ok(store.membership(project_id, user_id).await?.is_some())
}

/// Like [`can_access_project`], but `owner_only` also requires the Owner role.
pub async fn can_manage_project<S: MembershipLookup + ?Sized>(
    store: &S,
    project_id: ObjectId,
    user_id: Option<ObjectId>,
    role: Option<UserRole>,
    owner_only: bool,
) -> DaoResult<bool> {
    let Some(user_id) = user_id else {
        return Ok(false);
    };
    if is_admin_tier(role) {
        return Ok(true);
    }
    match store.membership(project_id, user_id).await? {
        None => Ok(false),
        Some(member_role) => Ok(!owner_only || member_role.is_owner()),
    }
}
