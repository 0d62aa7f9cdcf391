use academy_db::models::UserRole;
use serde_json::Value;

use crate::fixtures::seed::PASSWORD;
use crate::fixtures::test_app::TestApp;

#[tokio::test]
async fn register_creates_associate_member_and_returns_tokens() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&serde_json::json!({
            "email": "alice@test.com",
            "name": "Alice",
            "user_tag": "alice#0001",
            "password": PASSWORD,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 201);
    assert!(resp.headers().get("set-cookie").is_some());

    let json: Value = resp.json().await.unwrap();
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["user"]["email"], "alice@test.com");
    assert_eq!(json["user"]["user_tag"], "alice#0001");
    assert_eq!(json["user"]["role"], "ASSOCIATE_MEMBER");
    assert_eq!(json["user"]["role_label"], "준회원");
    assert_eq!(json["dashboard"], "/dashboard/student");
}

#[tokio::test]
async fn register_duplicate_email_conflicts() {
    let app = TestApp::spawn().await;
    app.register_user("dup@test.com", "First", "first#0001").await;

    let resp = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&serde_json::json!({
            "email": "dup@test.com",
            "name": "Second",
            "user_tag": "second#0001",
            "password": PASSWORD,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
}

#[tokio::test]
async fn register_requires_every_field() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&serde_json::json!({
            "email": "blank@test.com",
            "name": "  ",
            "user_tag": "blank#0001",
            "password": PASSWORD,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn login_with_wrong_password_fails() {
    let app = TestApp::spawn().await;
    app.register_user("bob@test.com", "Bob", "bob#0001").await;

    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({ "email": "bob@test.com", "password": "nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);

    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({ "email": "ghost@test.com", "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn login_reports_dashboard_for_role() {
    let app = TestApp::spawn().await;
    let admin = app.user_with_role("mentor", UserRole::Admin).await;

    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({ "email": admin.email, "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["user"]["role"], "ADMIN");
    assert_eq!(json["dashboard"], "/dashboard/admin");
}

#[tokio::test]
async fn me_accepts_bearer_and_cookie() {
    let app = TestApp::spawn().await;
    let user = app.register_user("carol@test.com", "Carol", "carol#0001").await;

    let resp = app.auth_get("/api/auth/me", &user.access_token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["name"], "Carol");

    let resp = app
        .client
        .get(app.url("/api/auth/me"))
        .header("Cookie", format!("theme=dark; access_token={}", user.access_token))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app.client.get(app.url("/api/auth/me")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn refresh_picks_up_role_change() {
    let app = TestApp::spawn().await;
    let user = app.register_user("dave@test.com", "Dave", "dave#0001").await;
    app.set_role(&user, UserRole::FullMember).await;

    let resp = app
        .client
        .post(app.url("/api/auth/refresh"))
        .json(&serde_json::json!({ "refresh_token": user.refresh_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["user"]["role"], "FULL_MEMBER");

    // An access token is not accepted as a refresh token
    let resp = app
        .client
        .post(app.url("/api/auth/refresh"))
        .json(&serde_json::json!({ "refresh_token": user.access_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn logout_clears_cookie() {
    let app = TestApp::spawn().await;
    let resp = app.client.post(app.url("/api/auth/logout")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let cookie = resp.headers().get("set-cookie").unwrap().to_str().unwrap();
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::spawn().await;
    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ok");
}
