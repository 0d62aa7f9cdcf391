use academy_db::models::{Project, ProjectMember, UserRole};
use bson::doc;
use serde_json::Value;

use crate::fixtures::test_app::TestApp;

#[tokio::test]
async fn only_admins_create_projects() {
    let app = TestApp::spawn().await;
    let student = app.user_with_role("kid", UserRole::FullMember).await;

    let resp = app
        .auth_post("/api/projects", &student.access_token)
        .json(&serde_json::json!({ "slug": "robot-arm", "title": "Robot arm" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn create_validates_slug_and_rejects_duplicates() {
    let app = TestApp::spawn().await;
    let admin = app.user_with_role("mentor", UserRole::Admin).await;

    let resp = app
        .auth_post("/api/projects", &admin.access_token)
        .json(&serde_json::json!({ "slug": "Robot Arm", "title": "Robot arm" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    let project = app.create_project(&admin, "robot-arm").await;
    assert_eq!(project["slug"], "robot-arm");
    assert_eq!(project["progress"], 0);

    let resp = app
        .auth_post("/api/projects", &admin.access_token)
        .json(&serde_json::json!({ "slug": "robot-arm", "title": "Again" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
}

#[tokio::test]
async fn failed_owner_membership_leaves_no_project_behind() {
    let app = TestApp::spawn().await;
    let admin = app.user_with_role("mentor", UserRole::Admin).await;

    // Reject every membership insert.
    app.db
        .run_command(doc! {
            "collMod": ProjectMember::COLLECTION,
            "validator": { "role": "never" },
        })
        .await
        .unwrap();

    let resp = app
        .auth_post("/api/projects", &admin.access_token)
        .json(&serde_json::json!({ "slug": "robot-arm", "title": "Robot arm" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 500);

    let left = app
        .db
        .collection::<Project>(Project::COLLECTION)
        .count_documents(doc! { "slug": "robot-arm" })
        .await
        .unwrap();
    assert_eq!(left, 0);

    app.db
        .run_command(doc! { "collMod": ProjectMember::COLLECTION, "validator": {} })
        .await
        .unwrap();
    let project = app.create_project(&admin, "robot-arm").await;
    assert_eq!(project["slug"], "robot-arm");
}

#[tokio::test]
async fn creator_is_owner_in_detail() {
    let app = TestApp::spawn().await;
    let admin = app.user_with_role("mentor", UserRole::Admin).await;
    app.create_project(&admin, "robot-arm").await;

    let resp = app.auth_get("/api/projects/robot-arm", &admin.access_token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["project"]["slug"], "robot-arm");
    let members = json["members"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["user_id"], admin.id);
    assert_eq!(members[0]["role"], "Owner");
}

#[tokio::test]
async fn invite_adds_member_and_notifies() {
    let app = TestApp::spawn().await;
    let admin = app.user_with_role("mentor", UserRole::Admin).await;
    let student = app.user_with_role("kid", UserRole::FullMember).await;
    app.create_project(&admin, "robot-arm").await;

    let resp = app.invite(&admin, "robot-arm", &student.user_tag, "Member").await;
    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["user_id"], student.id);
    assert_eq!(json["role"], "Member");

    let resp = app.auth_get("/api/notifications", &student.access_token).send().await.unwrap();
    let notifications: Value = resp.json().await.unwrap();
    let invite = &notifications[0];
    assert_eq!(invite["category"], "PROJECT");
    assert_eq!(invite["link"], "/projects/robot-arm");

    let resp = app.auth_get("/api/projects/robot-arm", &admin.access_token).send().await.unwrap();
    let detail: Value = resp.json().await.unwrap();
    assert_eq!(detail["members"].as_array().unwrap().len(), 2);
    assert_eq!(detail["logs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invite_rejects_unassignable_role() {
    let app = TestApp::spawn().await;
    let admin = app.user_with_role("mentor", UserRole::Admin).await;
    let student = app.user_with_role("kid", UserRole::FullMember).await;
    app.create_project(&admin, "robot-arm").await;

    let resp = app.invite(&admin, "robot-arm", &student.user_tag, "Admin").await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn invite_unknown_tag_is_not_found() {
    let app = TestApp::spawn().await;
    let admin = app.user_with_role("mentor", UserRole::Admin).await;
    app.create_project(&admin, "robot-arm").await;

    let resp = app.invite(&admin, "robot-arm", "ghost#0404", "Member").await;
    assert_eq!(resp.status().as_u16(), 404);

    let resp = app.invite(&admin, "no-such-project", "ghost#0404", "Member").await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn duplicate_invite_conflicts() {
    let app = TestApp::spawn().await;
    let admin = app.user_with_role("mentor", UserRole::Admin).await;
    let student = app.user_with_role("kid", UserRole::FullMember).await;
    app.create_project(&admin, "robot-arm").await;

    let resp = app.invite(&admin, "robot-arm", &student.user_tag, "Member").await;
    assert_eq!(resp.status().as_u16(), 201);
    let resp = app.invite(&admin, "robot-arm", &student.user_tag, "Owner").await;
    assert_eq!(resp.status().as_u16(), 409);
}

#[tokio::test]
async fn plain_member_cannot_invite_but_owner_can() {
    let app = TestApp::spawn().await;
    let admin = app.user_with_role("mentor", UserRole::Admin).await;
    let member = app.user_with_role("kid", UserRole::FullMember).await;
    let lead = app.user_with_role("lead", UserRole::FullMember).await;
    let newcomer = app.user_with_role("newbie", UserRole::AssociateMember).await;
    app.create_project(&admin, "robot-arm").await;
    app.invite(&admin, "robot-arm", &member.user_tag, "Member").await;
    app.invite(&admin, "robot-arm", &lead.user_tag, "Owner").await;

    let resp = app.invite(&member, "robot-arm", &newcomer.user_tag, "Member").await;
    assert_eq!(resp.status().as_u16(), 403);

    let resp = app.invite(&lead, "robot-arm", &newcomer.user_tag, "Member").await;
    assert_eq!(resp.status().as_u16(), 201);
}

#[tokio::test]
async fn non_member_cannot_open_project() {
    let app = TestApp::spawn().await;
    let admin = app.user_with_role("mentor", UserRole::Admin).await;
    let outsider = app.user_with_role("stranger", UserRole::FullMember).await;
    app.create_project(&admin, "robot-arm").await;

    let resp = app.auth_get("/api/projects/robot-arm", &outsider.access_token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 403);

    let resp = app.auth_get("/api/projects/missing", &outsider.access_token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn listing_is_scoped_to_membership() {
    let app = TestApp::spawn().await;
    let admin = app.user_with_role("mentor", UserRole::Admin).await;
    let other_admin = app.user_with_role("director", UserRole::SuperAdmin).await;
    let student = app.user_with_role("kid", UserRole::FullMember).await;
    app.create_project(&admin, "robot-arm").await;
    app.create_project(&admin, "drone").await;
    app.invite(&admin, "robot-arm", &student.user_tag, "Member").await;

    let resp = app.auth_get("/api/projects", &student.access_token).send().await.unwrap();
    let json: Value = resp.json().await.unwrap();
    let slugs: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["robot-arm"]);

    // Admins see every project without being members
    let resp = app.auth_get("/api/projects", &other_admin.access_token).send().await.unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);

    let resp = app.auth_get("/api/projects/drone", &other_admin.access_token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}
