use std::sync::Arc;

use auth::TokenCodec;
use chrono::Duration;
use jsonwebtoken::Algorithm;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use volunteer_service::domain::auth::service::AuthService;
use volunteer_service::inbound::http::router::create_router;
use volunteer_service::outbound::repositories::SqliteProfileReader;
use volunteer_service::outbound::repositories::SqliteRoleRepository;
use volunteer_service::outbound::repositories::SqliteUserRepository;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub db: SqlitePool,
    pub api_client: reqwest::Client,
    pub token_codec: TokenCodec,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // A single connection keeps every query on the same in-memory
        // database; a second connection would see an empty one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let role_repository = Arc::new(SqliteRoleRepository::new(pool.clone()));
        role_repository
            .seed_defaults()
            .await
            .expect("Failed to seed default roles");

        let token_codec = Arc::new(TokenCodec::new(
            TEST_SECRET,
            Algorithm::HS256,
            Duration::minutes(30),
        ));

        let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
        let profile_reader = Arc::new(SqliteProfileReader::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(
            user_repository,
            Arc::clone(&role_repository),
            profile_reader,
            Arc::clone(&token_codec),
        ));

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(auth_service, role_repository, token_codec);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            db: pool,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
            token_codec: TokenCodec::new(TEST_SECRET, Algorithm::HS256, Duration::minutes(30)),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register a user and return the response body
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> (reqwest::StatusCode, serde_json::Value) {
        let response = self
            .post("/auth/register")
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");
        let status = response.status();
        let body = response.json().await.expect("Failed to parse response");
        (status, body)
    }

    /// Log a user in and return the access token
    pub async fn login_token(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/auth/login")
            .json(&serde_json::json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["access_token"]
            .as_str()
            .expect("No access token in response")
            .to_string()
    }

    /// Look up a seeded role's id through the public roles endpoint
    pub async fn role_id(&self, name: &str) -> String {
        let response = self
            .get("/api/roles")
            .send()
            .await
            .expect("Failed to execute request");
        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["roles"]
            .as_array()
            .expect("No roles array")
            .iter()
            .find(|r| r["name"] == name)
            .unwrap_or_else(|| panic!("Role {} not seeded", name))["id"]
            .as_str()
            .expect("Role id is not a string")
            .to_string()
    }
}
