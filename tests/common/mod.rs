#![allow(dead_code)]

use aura::core::{AppState, encode_jwt};
use aura::domain::Identity;
use aura::dtos::CreateUserDTO;
use aura::repositories::{self, Create};
use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;

pub const JWT_SECRET: &str = "aura-integration-test-secret";
pub const PASSWORD: &str = "hunter22";

/// AppState on a fresh in-memory database with migrations applied
pub async fn create_test_state() -> Arc<AppState> {
    let pool = repositories::connect_in_memory()
        .await
        .expect("Failed to open in-memory database");
    Arc::new(AppState::new(pool, JWT_SECRET.to_string(), 60))
}

pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = aura::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

pub fn create_test_jwt(user_id: i64) -> String {
    encode_jwt(user_id, JWT_SECRET, 60).expect("Failed to create JWT token")
}

/// A user inserted straight into the database with a cheap password hash,
/// together with a valid token
pub struct Seeded {
    pub identity: Identity,
    pub token: String,
}

pub async fn seed_user(state: &AppState, name: &str) -> Seeded {
    let email = format!("{}@example.com", name.to_lowercase());
    let password = bcrypt::hash(PASSWORD, 4).expect("Failed to hash password");
    let user = state
        .user
        .create(&CreateUserDTO {
            email,
            name: name.to_string(),
            password,
            timezone: Some("Europe/Stockholm".to_string()),
        })
        .await
        .expect("Failed to seed user");

    Seeded {
        token: create_test_jwt(user.user_id),
        identity: Identity::from(user),
    }
}

/// Makes `a` and `b` confirmed friends through the API
pub async fn befriend(server: &TestServer, a: &Seeded, b: &Seeded) {
    server
        .post(&format!("/api/friends/{}/request", b.identity.id))
        .authorization_bearer(&a.token)
        .await
        .assert_status_ok();
    server
        .post(&format!("/api/friends/{}/approve", a.identity.id))
        .authorization_bearer(&b.token)
        .await
        .assert_status_ok();
}

pub fn ping_body(title: &str, starts_in_minutes: i64, invitee_ids: &[i64]) -> serde_json::Value {
    let starts_at = chrono::Utc::now() + chrono::Duration::minutes(starts_in_minutes);
    json!({
        "title": title,
        "location": "Kvarnen",
        "starts_at": starts_at,
        "invitee_ids": invitee_ids,
    })
}
