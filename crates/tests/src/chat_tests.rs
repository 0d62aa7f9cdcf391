use std::time::Duration;

use academy_db::models::{ProjectMessage, UserRole};
use academy_services::dao::base::BaseDao;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio_tungstenite::tungstenite::Message;

use crate::fixtures::seed::SeededUser;
use crate::fixtures::test_app::TestApp;

async fn send(app: &TestApp, user: &SeededUser, slug: &str, message: &str) -> reqwest::Response {
    app.auth_post(&format!("/api/projects/{slug}/messages"), &user.access_token)
        .json(&serde_json::json!({ "message": message }))
        .send()
        .await
        .unwrap()
}

/// Project with an admin owner and one plain member.
async fn project_with_member(app: &TestApp) -> (SeededUser, SeededUser, String) {
    let admin = app.user_with_role("mentor", UserRole::Admin).await;
    let student = app.user_with_role("kid", UserRole::FullMember).await;
    let project = app.create_project(&admin, "robot-arm").await;
    app.invite(&admin, "robot-arm", &student.user_tag, "Member").await;
    (admin, student, project["id"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn history_is_returned_oldest_first() {
    let app = TestApp::spawn().await;
    let (admin, student, _) = project_with_member(&app).await;

    let resp = send(&app, &student, "robot-arm", "  first  ").await;
    assert_eq!(resp.status().as_u16(), 201);
    let sent: Value = resp.json().await.unwrap();
    assert_eq!(sent["message"], "first");
    assert_eq!(sent["author_tag"], "kid#0001");

    tokio::time::sleep(Duration::from_millis(5)).await;
    send(&app, &admin, "robot-arm", "second").await;

    let resp = app
        .auth_get("/api/projects/robot-arm/messages", &student.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let history: Value = resp.json().await.unwrap();
    let texts: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["message"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["first", "second"]);
}

#[tokio::test]
async fn blank_message_is_rejected() {
    let app = TestApp::spawn().await;
    let (_, student, _) = project_with_member(&app).await;

    let resp = send(&app, &student, "robot-arm", "   \n\t").await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn long_message_is_truncated() {
    let app = TestApp::spawn().await;
    let (_, student, _) = project_with_member(&app).await;

    let resp = send(&app, &student, "robot-arm", &"가".repeat(2100)).await;
    assert_eq!(resp.status().as_u16(), 201);
    let sent: Value = resp.json().await.unwrap();
    assert_eq!(sent["message"].as_str().unwrap().chars().count(), 2000);
}

#[tokio::test]
async fn outsiders_cannot_read_or_post() {
    let app = TestApp::spawn().await;
    project_with_member(&app).await;
    let outsider = app.user_with_role("stranger", UserRole::FullMember).await;

    let resp = send(&app, &outsider, "robot-arm", "hi").await;
    assert_eq!(resp.status().as_u16(), 403);

    let resp = app
        .auth_get("/api/projects/robot-arm/messages", &outsider.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn stored_rows_hold_no_plaintext() {
    let app = TestApp::spawn().await;
    let (_, student, _) = project_with_member(&app).await;
    send(&app, &student, "robot-arm", "the wifi password is hunter2").await;

    let messages: BaseDao<ProjectMessage> = BaseDao::new(&app.db, ProjectMessage::COLLECTION);
    let rows = messages.find_many(bson::doc! {}, None).await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert!(!row.encrypted_content.contains("hunter2"));
    assert!(!row.iv.is_empty());
    assert!(!row.auth_tag.is_empty());
}

#[tokio::test]
async fn corrupted_rows_render_placeholder() {
    let app = TestApp::spawn().await;
    let (_, student, _) = project_with_member(&app).await;
    send(&app, &student, "robot-arm", "hello").await;

    // Corrupt the tag so the stored row no longer authenticates
    let messages: BaseDao<ProjectMessage> = BaseDao::new(&app.db, ProjectMessage::COLLECTION);
    messages
        .update_many_raw(bson::doc! {}, bson::doc! { "$set": { "auth_tag": "AAAAAAAAAAAAAAAAAAAAAA==" } })
        .await
        .unwrap();

    let resp = app
        .auth_get("/api/projects/robot-arm/messages", &student.access_token)
        .send()
        .await
        .unwrap();
    let history: Value = resp.json().await.unwrap();
    assert_eq!(history[0]["message"], "[메시지를 복호화할 수 없습니다.]");
}

async fn next_json<S>(ws: &mut S) -> Value
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("Timeout waiting for WS message")
        .unwrap()
        .unwrap();
    serde_json::from_str(msg.to_text().unwrap()).unwrap()
}

#[tokio::test]
async fn joined_member_receives_chat_broadcast() {
    let app = TestApp::spawn().await;
    let (admin, student, project_id) = project_with_member(&app).await;

    let (mut ws, _) = tokio_tungstenite::connect_async(app.ws_url(&student.access_token))
        .await
        .expect("WS connect failed");
    let connected = next_json(&mut ws).await;
    assert_eq!(connected["type"], "connected");
    assert_eq!(connected["data"]["user_id"], student.id);

    let join = serde_json::json!({ "type": "join", "data": { "project_id": project_id } });
    ws.send(Message::Text(join.to_string().into())).await.unwrap();
    let joined = next_json(&mut ws).await;
    assert_eq!(joined["type"], "joined");
    assert_eq!(joined["data"]["project_id"], project_id);

    let resp = send(&app, &admin, "robot-arm", "standup in 5").await;
    assert_eq!(resp.status().as_u16(), 201);

    let event = next_json(&mut ws).await;
    assert_eq!(event["type"], "chat-message");
    assert_eq!(event["data"]["project_id"], project_id);
    assert_eq!(event["data"]["message"]["message"], "standup in 5");
    assert_eq!(event["data"]["message"]["author_tag"], "mentor#0001");
}

#[tokio::test]
async fn outsider_cannot_join_project_room() {
    let app = TestApp::spawn().await;
    let (_, _, project_id) = project_with_member(&app).await;
    let outsider = app.user_with_role("stranger", UserRole::FullMember).await;

    let (mut ws, _) = tokio_tungstenite::connect_async(app.ws_url(&outsider.access_token))
        .await
        .expect("WS connect failed");
    next_json(&mut ws).await;

    let join = serde_json::json!({ "type": "join", "data": { "project_id": project_id } });
    ws.send(Message::Text(join.to_string().into())).await.unwrap();
    let reply = next_json(&mut ws).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["data"]["message"], "Forbidden");

    let join = serde_json::json!({ "type": "join", "data": {} });
    ws.send(Message::Text(join.to_string().into())).await.unwrap();
    let reply = next_json(&mut ws).await;
    assert_eq!(reply["data"]["message"], "project_id required");
}

#[tokio::test]
async fn ping_gets_pong() {
    let app = TestApp::spawn().await;
    let student = app.user_with_role("kid", UserRole::FullMember).await;

    let (mut ws, _) = tokio_tungstenite::connect_async(app.ws_url(&student.access_token))
        .await
        .expect("WS connect failed");
    next_json(&mut ws).await;

    ws.send(Message::Text(r#"{"type":"ping"}"#.into())).await.unwrap();
    let reply = next_json(&mut ws).await;
    assert_eq!(reply["type"], "pong");
}

#[tokio::test]
async fn invalid_token_cannot_connect() {
    let app = TestApp::spawn().await;
    let result = tokio_tungstenite::connect_async(app.ws_url("not-a-jwt")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn invite_pushes_notification_to_open_socket() {
    let app = TestApp::spawn().await;
    let admin = app.user_with_role("mentor", UserRole::Admin).await;
    let student = app.user_with_role("kid", UserRole::FullMember).await;
    app.create_project(&admin, "robot-arm").await;

    let (mut ws, _) = tokio_tungstenite::connect_async(app.ws_url(&student.access_token))
        .await
        .expect("WS connect failed");
    next_json(&mut ws).await;

    let resp = app.invite(&admin, "robot-arm", &student.user_tag, "Member").await;
    assert_eq!(resp.status().as_u16(), 201);

    let event = next_json(&mut ws).await;
    assert_eq!(event["type"], "notification");
    assert_eq!(event["data"]["link"], "/projects/robot-arm");
}
