use academy_db::models::{Audience, UserRole};
use academy_services::dao::notification::NotificationDao;
use serde_json::Value;

use crate::fixtures::test_app::TestApp;

#[tokio::test]
async fn post_content_is_sanitized_and_labelled() {
    let app = TestApp::spawn().await;
    let student = app.user_with_role("kid", UserRole::FullMember).await;

    let resp = app
        .auth_post("/api/community/posts", &student.access_token)
        .json(&serde_json::json!({
            "title": "  My first robot  ",
            "content": "<p>Look <b>here</b></p><script>alert(1)</script>",
            "category": "showcase",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["title"], "My first robot");
    assert_eq!(json["author_name"], "kid");
    assert_eq!(json["author_role"], "정회원 (T3)");
    assert_eq!(json["comment_count"], 0);
    let content = json["content"].as_str().unwrap();
    assert!(content.contains("<b>here</b>"));
    assert!(!content.contains("script"));

    let resp = app.client.get(app.url("/api/community/posts")).send().await.unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn post_without_visible_text_is_rejected() {
    let app = TestApp::spawn().await;
    let student = app.user_with_role("kid", UserRole::FullMember).await;

    let resp = app
        .auth_post("/api/community/posts", &student.access_token)
        .json(&serde_json::json!({
            "title": "Empty",
            "content": "<p> </p><br>",
            "category": "free",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn posting_requires_a_session() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/api/community/posts"))
        .json(&serde_json::json!({ "title": "t", "content": "c", "category": "free" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn new_post_broadcasts_community_notification() {
    let app = TestApp::spawn().await;
    let student = app.user_with_role("kid", UserRole::FullMember).await;

    app.auth_post("/api/community/posts", &student.access_token)
        .json(&serde_json::json!({
            "title": "Drone race",
            "content": "Who is in?",
            "category": "event",
        }))
        .send()
        .await
        .unwrap();

    let notices = NotificationDao::new(&app.db)
        .list_broadcast(Audience::Community, 10)
        .await
        .unwrap();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].message.contains("Drone race"));
    assert_eq!(notices[0].link.as_deref(), Some("/community"));
}

#[tokio::test]
async fn comments_increment_the_count() {
    let app = TestApp::spawn().await;
    let author = app.user_with_role("kid", UserRole::FullMember).await;
    let mentor = app.user_with_role("mentor", UserRole::Admin).await;

    let resp = app
        .auth_post("/api/community/posts", &author.access_token)
        .json(&serde_json::json!({ "title": "Help", "content": "Servo jitter", "category": "qna" }))
        .send()
        .await
        .unwrap();
    let post: Value = resp.json().await.unwrap();
    let post_id = post["id"].as_str().unwrap();

    let resp = app
        .auth_post(&format!("/api/community/posts/{post_id}/comments"), &mentor.access_token)
        .json(&serde_json::json!({ "content": "<i>Check</i> the power supply" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let comment: Value = resp.json().await.unwrap();
    assert_eq!(comment["post_id"], post_id);
    assert_eq!(comment["author_role"], "멘토 (T2)");

    let resp = app
        .client
        .get(app.url(&format!("/api/community/posts/{post_id}/comments")))
        .send()
        .await
        .unwrap();
    let comments: Value = resp.json().await.unwrap();
    assert_eq!(comments.as_array().unwrap().len(), 1);

    let resp = app.client.get(app.url("/api/community/posts")).send().await.unwrap();
    let posts: Value = resp.json().await.unwrap();
    assert_eq!(posts[0]["comment_count"], 1);
}

#[tokio::test]
async fn comment_on_missing_post_is_not_found() {
    let app = TestApp::spawn().await;
    let student = app.user_with_role("kid", UserRole::FullMember).await;
    let missing = bson::oid::ObjectId::new().to_hex();

    let resp = app
        .auth_post(&format!("/api/community/posts/{missing}/comments"), &student.access_token)
        .json(&serde_json::json!({ "content": "hello" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}
