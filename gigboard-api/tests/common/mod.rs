/// Common test utilities for integration tests
///
/// Shared infrastructure for the API integration tests:
/// - Test database setup (migrations run on first use)
/// - App construction with real state
/// - Helpers for registering users and issuing requests

use axum::body::Body;
use axum::http::{Request, StatusCode};
use gigboard_api::app::{build_router, AppState};
use gigboard_api::config::Config;
use gigboard_shared::db::migrations::{ensure_database_exists, run_migrations};
use serde_json::Value;
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

/// Test context containing the app and its backing resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
}

/// A registered user plus their session token
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub token: String,
}

impl TestContext {
    /// Creates a new test context against the configured database
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        ensure_database_exists(&config.database.url).await?;
        let db = PgPool::connect(&config.database.url).await?;
        run_migrations(&db).await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext { db, app, config })
    }

    /// Sends a request through the router and returns (status, JSON body)
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Registers a fresh user through the API and returns their identity
    ///
    /// Usernames and emails are salted with a UUID so tests never collide.
    pub async fn register_user(&self, prefix: &str) -> TestUser {
        let suffix = Uuid::new_v4().simple().to_string();
        let username = format!("{}-{}", prefix, &suffix[..12]);
        let email = format!("{}@example.com", username);

        let (status, body) = self
            .request(
                "POST",
                "/auth/register",
                None,
                Some(serde_json::json!({
                    "username": username,
                    "email": email,
                    "password": "correct-horse-battery",
                })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        TestUser {
            id: body["user"]["id"].as_str().unwrap().parse().unwrap(),
            username,
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    /// Creates a task through the API and returns its ID
    pub async fn create_task(&self, owner: &TestUser, title: &str, budget: f64) -> Uuid {
        let (status, body) = self
            .request(
                "POST",
                "/tasks",
                Some(&owner.token),
                Some(serde_json::json!({
                    "title": title,
                    "description": "integration test task",
                    "budget": budget,
                    "deadline": "2025-01-01T00:00:00Z",
                })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "create task failed: {}", body);

        body["id"].as_str().unwrap().parse().unwrap()
    }
}
