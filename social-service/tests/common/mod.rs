use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::JwtHandler;
use auth::PasswordHasher;
use serde_json::json;
use serde_json::Value;
use social_service::domain::post::ports::PostRepository;
use social_service::domain::profile::ports::ProfileRepository;
use social_service::domain::user::ports::UserRepository;
use social_service::domain::post::service::PostService;
use social_service::domain::profile::service::ProfileService;
use social_service::domain::user::service::UserService;
use social_service::inbound::http::router::create_router;
use social_service::inbound::http::router::AppState;
use social_service::outbound::avatar::GravatarProvider;
use social_service::outbound::repositories::InMemoryPostRepository;
use social_service::outbound::repositories::InMemoryProfileRepository;
use social_service::outbound::repositories::InMemoryUserRepository;
use social_service::outbound::repositories::PostgresPostRepository;
use social_service::outbound::repositories::PostgresProfileRepository;
use social_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Store,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

/// Storage the application under test runs on.
pub enum Store {
    Memory(InMemoryUserRepository),
    Postgres(TestDb),
}

/// Test database helper
pub struct TestDb {
    pub pool: PgPool,
    pub db_name: String,
    postgres_url: String,
}

/// Account created through the API.
pub struct Registered {
    pub id: String,
    pub token: String,
}

impl TestApp {
    /// Spawn the application over in-memory stores
    pub async fn spawn() -> Self {
        let users = InMemoryUserRepository::new();
        let user_repository = Arc::new(users.clone());

        Self::spawn_with(
            user_repository,
            Arc::new(InMemoryProfileRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
            Store::Memory(users),
        )
        .await
    }

    /// Spawn the application over a fresh, migrated PostgreSQL database.
    ///
    /// Returns `None` when `DATABASE_URL` is not set.
    pub async fn spawn_postgres() -> Option<Self> {
        let Ok(postgres_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set; skipping PostgreSQL test");
            return None;
        };
        let db = TestDb::new(postgres_url).await;

        let app = Self::spawn_with(
            Arc::new(PostgresUserRepository::new(db.pool.clone())),
            Arc::new(PostgresProfileRepository::new(db.pool.clone())),
            Arc::new(PostgresPostRepository::new(db.pool.clone())),
            Store::Postgres(db),
        )
        .await;

        Some(app)
    }

    async fn spawn_with<UR, PR, PoR>(
        user_repository: Arc<UR>,
        profile_repository: Arc<PR>,
        post_repository: Arc<PoR>,
        store: Store,
    ) -> Self
    where
        UR: UserRepository,
        PR: ProfileRepository,
        PoR: PostRepository,
    {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Cheapest valid work factor keeps the suite fast.
        let password_hasher =
            PasswordHasher::with_cost(1024, 1, 1).expect("Failed to build password hasher");

        let state = AppState {
            user_service: Arc::new(UserService::new(
                Arc::clone(&user_repository),
                Arc::clone(&profile_repository),
                Arc::new(GravatarProvider::new()),
                password_hasher,
            )),
            profile_service: Arc::new(ProfileService::new(
                profile_repository,
                Arc::clone(&user_repository),
            )),
            post_service: Arc::new(PostService::new(post_repository, user_repository)),
            authenticator: Arc::new(Authenticator::new(
                JWT_SECRET,
                Duration::from_secs(24 * 3600),
            )),
        };

        let router = create_router(state, Duration::from_secs(30));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            store,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(JWT_SECRET),
        }
    }

    /// Number of stored accounts.
    pub async fn user_count(&self) -> usize {
        match &self.store {
            Store::Memory(users) => users.count().await,
            Store::Postgres(db) => {
                let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
                    .fetch_one(&db.pool)
                    .await
                    .expect("Failed to count users");
                count as usize
            }
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register an account and return its id and session token.
    pub async fn register(&self, name: &str, email: &str) -> Registered {
        let response = self
            .post("/api/users")
            .json(&json!({ "name": name, "email": email, "password": "secret1" }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        let token = body["token"].as_str().expect("token missing").to_string();

        let claims: auth::SessionClaims = self
            .jwt_handler
            .decode(&token)
            .expect("Issued token does not decode");
        let id = claims.user_id().expect("user.id missing").to_string();

        Registered { id, token }
    }

    /// Create a post as `author` and return its id.
    pub async fn create_post(&self, author: &Registered, text: &str) -> String {
        let response = self
            .post_authenticated("/api/posts", &author.token)
            .json(&json!({ "text": text }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["id"].as_str().expect("post id missing").to_string()
    }
}

impl TestDb {
    /// Create a new test database with a unique name
    pub async fn new(postgres_url: String) -> Self {
        let db_name = format!(
            "test_social_service_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&postgres_url)
            .await
            .expect("Failed to connect to Postgres");

        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = postgres_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE_URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            db_name,
            postgres_url,
        }
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // Database cleanup happens asynchronously
        let db_name = self.db_name.clone();
        let postgres_url = self.postgres_url.clone();
        tokio::spawn(async move {
            if let Ok(mut conn) = PgConnection::connect(&postgres_url).await {
                let _ = conn
                    .execute(
                        format!(
                            r#"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}';"#,
                            db_name
                        )
                        .as_str(),
                    )
                    .await;

                let _ = conn
                    .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, db_name).as_str())
                    .await;
            }
        });
    }
}
