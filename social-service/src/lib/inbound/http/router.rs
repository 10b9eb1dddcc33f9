use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::authentication;
use super::handlers::posts;
use super::handlers::profiles;
use super::handlers::users;
use super::middleware::authenticate as auth_middleware;
use crate::domain::post::ports::PostServicePort;
use crate::domain::profile::ports::ProfileServicePort;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub profile_service: Arc<dyn ProfileServicePort>,
    pub post_service: Arc<dyn PostServicePort>,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let public_routes = Router::new()
        .route("/api/users", post(users::register))
        .route("/api/auth", post(authentication::login))
        .route("/api/profile", get(profiles::list_profiles))
        .route("/api/profile/user/:user_id", get(profiles::profile_by_user));

    let protected_routes = Router::new()
        .route("/api/users/:user_id", delete(users::delete_user))
        .route("/api/auth", get(authentication::current_user))
        .route("/api/profile/me", get(profiles::my_profile))
        .route(
            "/api/profile",
            post(profiles::upsert_profile).delete(profiles::delete_profile),
        )
        .route("/api/profile/experience", put(profiles::add_experience))
        .route(
            "/api/profile/experience/:exp_id",
            delete(profiles::remove_experience),
        )
        .route("/api/profile/education", put(profiles::add_education))
        .route(
            "/api/profile/education/:edu_id",
            delete(profiles::remove_education),
        )
        .route("/api/posts", post(posts::create_post).get(posts::list_posts))
        .route("/api/posts/:id", get(posts::get_post).delete(posts::delete_post))
        .route("/api/posts/like/:id", put(posts::like_post))
        .route("/api/posts/unlike/:id", put(posts::unlike_post))
        .route("/api/posts/comment/:id", post(posts::add_comment))
        .route(
            "/api/posts/comment/:id/:comment_id",
            delete(posts::delete_comment),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    // Routes sharing a path across the two groups are combined method by method on merge.
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::http::header::CONTENT_TYPE;
    use async_trait::async_trait;
    use axum::http::header::AUTHORIZATION;
    use axum::http::StatusCode;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::post::service::PostService;
    use crate::domain::profile::service::ProfileService;
    use crate::domain::user::errors::UserError;
    use crate::domain::user::models::CreateUserCommand;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::User;
    use crate::domain::user::models::UserId;
    use crate::domain::user::service::UserService;
    use crate::outbound::avatar::GravatarProvider;
    use crate::outbound::repositories::InMemoryPostRepository;
    use crate::outbound::repositories::InMemoryProfileRepository;
    use crate::outbound::repositories::InMemoryUserRepository;

    fn state() -> AppState {
        let users = Arc::new(InMemoryUserRepository::new());
        let profiles = Arc::new(InMemoryProfileRepository::new());

        AppState {
            user_service: Arc::new(UserService::new(
                Arc::clone(&users),
                Arc::clone(&profiles),
                Arc::new(GravatarProvider::new()),
                auth::PasswordHasher::with_cost(1024, 1, 1).unwrap(),
            )),
            profile_service: Arc::new(ProfileService::new(profiles, Arc::clone(&users))),
            post_service: Arc::new(PostService::new(
                Arc::new(InMemoryPostRepository::new()),
                users,
            )),
            authenticator: Arc::new(Authenticator::new(
                b"router-test-secret",
                Duration::from_secs(3600),
            )),
        }
    }

    fn router() -> Router {
        create_router(state(), Duration::from_secs(5))
    }

    /// User service whose registration never finishes.
    struct StalledUserService;

    #[async_trait]
    impl UserServicePort for StalledUserService {
        async fn create_user(&self, _command: CreateUserCommand) -> Result<User, UserError> {
            std::future::pending().await
        }

        async fn authenticate(
            &self,
            _email: &EmailAddress,
            _password: &str,
        ) -> Result<User, UserError> {
            Err(UserError::InvalidCredentials)
        }

        async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
            Err(UserError::NotFound(id.to_string()))
        }

        async fn delete_user(&self, _id: &UserId, _caller: &UserId) -> Result<(), UserError> {
            Ok(())
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_shared_path_keeps_public_and_protected_methods_apart() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/auth")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["errors"][0]["msg"], "No token, authorization denied");

        let response = router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"email":"ada@example.com"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["errors"][0]["param"], "password");
    }

    #[tokio::test]
    async fn test_profile_list_is_public() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/profile")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_malformed_bearer_header_rejected() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/posts")
                    .header("authorization", "Token abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bearer_scheme_is_case_insensitive() {
        let state = state();
        let token = state.authenticator.issue_token(UserId::new()).unwrap();

        let response = create_router(state, Duration::from_secs(5))
            .oneshot(
                Request::builder()
                    .uri("/api/posts")
                    .header(AUTHORIZATION, format!("bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_slow_request_times_out() {
        let state = AppState {
            user_service: Arc::new(StalledUserService),
            ..state()
        };

        let response = create_router(state, Duration::from_millis(50))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/users")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"name":"Ada","email":"ada@example.com","password":"secret1"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
