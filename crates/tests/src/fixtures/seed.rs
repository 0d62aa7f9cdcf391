use bson::{DateTime, doc, oid::ObjectId};
use academy_db::models::{Class, CurriculumWeek, UserRole};
use academy_services::dao::{base::BaseDao, class::ClassDao, kiosk::KioskDao, user::UserDao};
use serde_json::Value;

use super::test_app::TestApp;

pub const PASSWORD: &str = "Password123!";

#[derive(Debug, Clone)]
pub struct SeededUser {
    pub id: String,
    pub email: String,
    pub user_tag: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl SeededUser {
    pub fn oid(&self) -> ObjectId {
        ObjectId::parse_str(&self.id).unwrap()
    }
}

pub struct SeededClass {
    pub id: ObjectId,
    pub slug: String,
    pub week_id: ObjectId,
}

fn seeded_from(json: &Value, email: &str) -> SeededUser {
    SeededUser {
        id: json["user"]["id"].as_str().unwrap().to_string(),
        email: email.to_string(),
        user_tag: json["user"]["user_tag"].as_str().unwrap().to_string(),
        access_token: json["access_token"].as_str().unwrap().to_string(),
        refresh_token: json["refresh_token"].as_str().unwrap().to_string(),
    }
}

impl TestApp {
    /// Register a user (always ASSOCIATE_MEMBER) and return their auth info.
    pub async fn register_user(&self, email: &str, name: &str, user_tag: &str) -> SeededUser {
        let resp = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&serde_json::json!({
                "email": email,
                "name": name,
                "user_tag": user_tag,
                "password": PASSWORD,
            }))
            .send()
            .await
            .expect("Register request failed");

        let status = resp.status().as_u16();
        let json: Value = resp.json().await.expect("Failed to parse register response");
        assert_eq!(status, 201, "Register failed: {json}");

        seeded_from(&json, email)
    }

    /// Login a user and return their auth info.
    pub async fn login_user(&self, email: &str) -> SeededUser {
        let resp = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({
                "email": email,
                "password": PASSWORD,
            }))
            .send()
            .await
            .expect("Login request failed");

        let status = resp.status();
        let json: Value = resp.json().await.expect("Failed to parse login response");
        assert!(status.is_success(), "Login failed: {json}");

        seeded_from(&json, email)
    }

    /// Writes the role straight to the user record and logs in again so the
    /// returned token carries it.
    pub async fn set_role(&self, user: &SeededUser, role: UserRole) -> SeededUser {
        let users = UserDao::new(&self.db);
        users
            .base
            .update_by_id(user.oid(), doc! { "$set": { "role": role.as_str() } })
            .await
            .expect("Failed to set role");
        self.login_user(&user.email).await
    }

    /// Register a user and give them `role`.
    pub async fn user_with_role(&self, handle: &str, role: UserRole) -> SeededUser {
        let email = format!("{handle}@academy.test");
        let user = self
            .register_user(&email, handle, &format!("{handle}#0001"))
            .await;
        if role == UserRole::AssociateMember {
            return user;
        }
        self.set_role(&user, role).await
    }

    pub async fn seed_kiosk(&self, api_key: &str) -> ObjectId {
        let kiosk = KioskDao::new(&self.db)
            .create("Front desk".to_string(), api_key)
            .await
            .expect("Failed to seed kiosk");
        kiosk.id.unwrap()
    }

    /// A class meeting on the given weekdays, with one curriculum week.
    pub async fn seed_class(&self, slug: &str, class_days: Vec<u32>) -> SeededClass {
        let classes = ClassDao::new(&self.db);
        let now = DateTime::now();
        let class = Class {
            id: None,
            slug: slug.to_string(),
            name: format!("{slug} class"),
            category: "coding".to_string(),
            level: "beginner".to_string(),
            description: None,
            cost: 120_000,
            class_days,
            schedule: Some("16:00-17:30".to_string()),
            tags: vec!["python".to_string()],
            current_students: 0,
            created_at: now,
            updated_at: now,
        };
        let id = classes.base.insert_one(&class).await.expect("Failed to seed class");

        let weeks: BaseDao<CurriculumWeek> = BaseDao::new(&self.db, CurriculumWeek::COLLECTION);
        let week_id = weeks
            .insert_one(&CurriculumWeek {
                id: None,
                class_id: id,
                week_number: 1,
                title: "Week 1".to_string(),
                description: None,
                open_date: None,
                files: Vec::new(),
                created_at: now,
                updated_at: now,
            })
            .await
            .expect("Failed to seed curriculum week");

        SeededClass {
            id,
            slug: slug.to_string(),
            week_id,
        }
    }

    pub async fn enroll(&self, user: &SeededUser, class: &SeededClass) {
        ClassDao::new(&self.db)
            .enroll(user.oid(), class.id)
            .await
            .expect("Failed to enroll");
    }

    pub async fn link_parent(&self, student: &SeededUser, parent: &SeededUser) {
        UserDao::new(&self.db)
            .link_parent(student.oid(), parent.oid())
            .await
            .expect("Failed to link parent");
    }

    /// Create a project through the API as `admin`.
    pub async fn create_project(&self, admin: &SeededUser, slug: &str) -> Value {
        let resp = self
            .auth_post("/api/projects", &admin.access_token)
            .json(&serde_json::json!({
                "slug": slug,
                "title": format!("Project {slug}"),
                "description": "Robot arm build",
            }))
            .send()
            .await
            .expect("Create project request failed");
        let status = resp.status().as_u16();
        let json: Value = resp.json().await.unwrap();
        assert_eq!(status, 201, "Create project failed: {json}");
        json
    }

    /// Invite `user_tag` into the project as `inviter`.
    pub async fn invite(&self, inviter: &SeededUser, slug: &str, user_tag: &str, role: &str) -> reqwest::Response {
        self.auth_post(&format!("/api/projects/{slug}/members"), &inviter.access_token)
            .json(&serde_json::json!({ "user_tag": user_tag, "role": role }))
            .send()
            .await
            .expect("Invite request failed")
    }

    /// Create an authenticated request with the given token.
    pub fn auth_get(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_post(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_patch(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .patch(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_delete(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }
}
