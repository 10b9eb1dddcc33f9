use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageResponseData;
use crate::domain::post::models::Comment;
use crate::domain::post::models::CommentId;
use crate::domain::post::models::Like;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostId;
use crate::domain::post::models::PostText;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::ValidationErrors;
use crate::inbound::http::validation::Validator;

pub async fn create_post(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    body: Result<Json<TextRequest>, JsonRejection>,
) -> Result<ApiSuccess<PostResponseData>, ApiError> {
    let Json(body) = body?;
    let text = body.try_into_text()?;

    let post = state
        .post_service
        .create_post(&caller.user_id, text)
        .await?;

    Ok(ApiSuccess::new(StatusCode::CREATED, post.into()))
}

pub async fn list_posts(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<PostResponseData>>, ApiError> {
    let posts = state.post_service.list_posts().await?;
    Ok(ApiSuccess::ok(
        posts.into_iter().map(PostResponseData::from).collect(),
    ))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<ApiSuccess<PostResponseData>, ApiError> {
    let post_id = parse_post_id(&post_id)?;

    let post = state.post_service.get_post(&post_id).await?;
    Ok(ApiSuccess::ok(post.into()))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(post_id): Path<String>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    let post_id = parse_post_id(&post_id)?;

    state
        .post_service
        .delete_post(&post_id, &caller.user_id)
        .await?;

    Ok(ApiSuccess::ok(MessageResponseData::new("Post removed")))
}

pub async fn like_post(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(post_id): Path<String>,
) -> Result<ApiSuccess<Vec<LikeData>>, ApiError> {
    let post_id = parse_post_id(&post_id)?;

    let likes = state
        .post_service
        .like_post(&post_id, &caller.user_id)
        .await?;

    Ok(ApiSuccess::ok(likes.into_iter().map(LikeData::from).collect()))
}

pub async fn unlike_post(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(post_id): Path<String>,
) -> Result<ApiSuccess<Vec<LikeData>>, ApiError> {
    let post_id = parse_post_id(&post_id)?;

    let likes = state
        .post_service
        .unlike_post(&post_id, &caller.user_id)
        .await?;

    Ok(ApiSuccess::ok(likes.into_iter().map(LikeData::from).collect()))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(post_id): Path<String>,
    body: Result<Json<TextRequest>, JsonRejection>,
) -> Result<ApiSuccess<Vec<CommentData>>, ApiError> {
    let post_id = parse_post_id(&post_id)?;
    let Json(body) = body?;
    let text = body.try_into_text()?;

    let comments = state
        .post_service
        .add_comment(&post_id, &caller.user_id, text)
        .await?;

    Ok(ApiSuccess::ok(
        comments.into_iter().map(CommentData::from).collect(),
    ))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> Result<ApiSuccess<Vec<CommentData>>, ApiError> {
    let post_id = parse_post_id(&post_id)?;
    let comment_id = CommentId::from_string(&comment_id)
        .map_err(|_| ApiError::NotFound("Comment does not exist".to_string()))?;

    let comments = state
        .post_service
        .delete_comment(&post_id, &comment_id, &caller.user_id)
        .await?;

    Ok(ApiSuccess::ok(
        comments.into_iter().map(CommentData::from).collect(),
    ))
}

fn parse_post_id(raw: &str) -> Result<PostId, ApiError> {
    PostId::from_string(raw).map_err(|_| ApiError::NotFound("Post not found".to_string()))
}

/// Body of a new post or comment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TextRequest {
    text: Option<String>,
}

impl TextRequest {
    fn try_into_text(self) -> Result<PostText, ValidationErrors> {
        let mut validator = Validator::new();
        let text = validator.check("text", PostText::new(self.text.unwrap_or_default()));
        validator.finish(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LikeData {
    pub user: String,
}

impl From<Like> for LikeData {
    fn from(like: Like) -> Self {
        Self {
            user: like.user.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentData {
    pub id: String,
    pub user: String,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

impl From<Comment> for CommentData {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            user: comment.user.to_string(),
            text: comment.text,
            name: comment.name,
            avatar: comment.avatar,
            date: comment.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostResponseData {
    pub id: String,
    pub user: String,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub likes: Vec<LikeData>,
    pub comments: Vec<CommentData>,
    pub date: DateTime<Utc>,
}

impl From<Post> for PostResponseData {
    fn from(post: Post) -> Self {
        Self {
            id: post.id.to_string(),
            user: post.user.to_string(),
            text: post.text,
            name: post.name,
            avatar: post.avatar,
            likes: post.likes.into_iter().map(Into::into).collect(),
            comments: post.comments.into_iter().map(Into::into).collect(),
            date: post.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::validation::FieldError;

    #[test]
    fn test_blank_text_is_rejected() {
        let body: TextRequest = serde_json::from_str(r#"{"text":"   "}"#).unwrap();

        let ValidationErrors(errors) = body.try_into_text().unwrap_err();
        assert_eq!(errors, vec![FieldError::for_param("text", "Text is required")]);
    }

    #[test]
    fn test_malformed_post_id_is_not_found() {
        assert_eq!(
            parse_post_id("123").unwrap_err(),
            ApiError::NotFound("Post not found".to_string())
        );
    }
}
