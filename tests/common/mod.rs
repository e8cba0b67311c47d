//! Common test utilities

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::util::ServiceExt;
use uuid::Uuid;

use event_hub::model::{User, UserCreate};
use event_hub::repository::UserRepository;

/// Connect and migrate the test database.
///
/// Returns `None` (and the test is skipped) when `DATABASE_URL` is unset.
pub async fn setup_test_db() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    event_hub::db::MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

/// Full application router over the test pool
pub fn app(pool: &PgPool) -> Router {
    event_hub::api::build_app(pool.clone(), &[])
}

/// Insert a user directly; emails are unique per call
pub async fn create_user(pool: &PgPool, is_superuser: bool) -> User {
    let user = User::new(
        UserCreate {
            email: format!("user-{}@example.com", Uuid::new_v4()),
            password: "not-used-here".to_string(),
            is_active: true,
            is_superuser,
            full_name: None,
        },
        "$argon2id$test".to_string(),
    );

    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    UserRepository::insert(&mut conn, &user)
        .await
        .expect("Failed to insert user");

    user
}

/// Send one request as `user` (anonymous when `None`) and decode the JSON body
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<Uuid>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user {
        builder = builder.header("X-Request-User-Id", user_id.to_string());
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Create an event through the API and return its id
pub async fn create_event(app: &Router, organizer: Uuid, title: &str) -> Uuid {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/events/",
        Some(organizer),
        Some(serde_json::json!({
            "title": title,
            "description": "Quarterly meetup",
            "date": "2026-12-01T18:00:00Z",
            "location": "Berlin",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Event creation failed: {}", body);

    body["id"].as_str().unwrap().parse().unwrap()
}
