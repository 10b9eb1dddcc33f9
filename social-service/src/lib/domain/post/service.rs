use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::post::errors::PostError;
use crate::domain::post::models::Comment;
use crate::domain::post::models::CommentId;
use crate::domain::post::models::Like;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostId;
use crate::domain::post::models::PostText;
use crate::domain::post::ports::PostRepository;
use crate::domain::post::ports::PostServicePort;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// Domain service implementation for post operations.
///
/// Ownership checks run here, before any destructive storage call.
pub struct PostService<PR, UR>
where
    PR: PostRepository,
    UR: UserRepository,
{
    repository: Arc<PR>,
    user_repository: Arc<UR>,
}

impl<PR, UR> PostService<PR, UR>
where
    PR: PostRepository,
    UR: UserRepository,
{
    pub fn new(repository: Arc<PR>, user_repository: Arc<UR>) -> Self {
        Self {
            repository,
            user_repository,
        }
    }

    async fn author(&self, id: &UserId) -> Result<User, PostError> {
        self.user_repository
            .find_by_id(id)
            .await
            .map_err(|e| PostError::DatabaseError(e.to_string()))?
            .ok_or_else(|| PostError::AuthorNotFound(id.to_string()))
    }
}

#[async_trait]
impl<PR, UR> PostServicePort for PostService<PR, UR>
where
    PR: PostRepository,
    UR: UserRepository,
{
    async fn create_post(&self, author: &UserId, text: PostText) -> Result<Post, PostError> {
        let user = self.author(author).await?;

        let post = Post {
            id: PostId::new(),
            user: user.id,
            text: text.into_inner(),
            name: user.name.as_str().to_string(),
            avatar: user.avatar_url,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        };

        let created = self.repository.create(post).await?;
        tracing::info!(post_id = %created.id, user_id = %author, "Post created");

        Ok(created)
    }

    async fn list_posts(&self) -> Result<Vec<Post>, PostError> {
        self.repository.list_all().await
    }

    async fn get_post(&self, id: &PostId) -> Result<Post, PostError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| PostError::NotFound(id.to_string()))
    }

    async fn delete_post(&self, id: &PostId, caller: &UserId) -> Result<(), PostError> {
        let post = self.get_post(id).await?;
        if let Err(e) = auth::ensure_owner(post.user, caller) {
            tracing::warn!(post_id = %id, user_id = %caller, "Post deletion rejected: not the author");
            return Err(e.into());
        }

        if !self.repository.delete(id).await? {
            return Err(PostError::NotFound(id.to_string()));
        }
        tracing::info!(post_id = %id, user_id = %caller, "Post deleted");

        Ok(())
    }

    async fn like_post(&self, id: &PostId, caller: &UserId) -> Result<Vec<Like>, PostError> {
        if !self.repository.add_like(id, caller).await? {
            return Err(PostError::AlreadyLiked);
        }

        Ok(self.get_post(id).await?.likes)
    }

    async fn unlike_post(&self, id: &PostId, caller: &UserId) -> Result<Vec<Like>, PostError> {
        // Existence first so an unknown post is NotFound rather than a silent no-op.
        self.get_post(id).await?;

        if !self.repository.remove_like(id, caller).await? {
            tracing::debug!(post_id = %id, user_id = %caller, "Unlike without prior like");
        }

        Ok(self.get_post(id).await?.likes)
    }

    async fn add_comment(
        &self,
        id: &PostId,
        author: &UserId,
        text: PostText,
    ) -> Result<Vec<Comment>, PostError> {
        let user = self.author(author).await?;

        let comment = Comment {
            id: CommentId::new(),
            user: user.id,
            text: text.into_inner(),
            name: user.name.as_str().to_string(),
            avatar: user.avatar_url,
            created_at: Utc::now(),
        };

        self.repository.add_comment(id, comment).await?;

        Ok(self.get_post(id).await?.comments)
    }

    async fn delete_comment(
        &self,
        id: &PostId,
        comment: &CommentId,
        caller: &UserId,
    ) -> Result<Vec<Comment>, PostError> {
        let post = self.get_post(id).await?;
        let target = post
            .comment(comment)
            .ok_or_else(|| PostError::CommentNotFound(comment.to_string()))?;
        auth::ensure_owner(target.user, caller)?;

        if !self.repository.remove_comment(id, comment).await? {
            return Err(PostError::CommentNotFound(comment.to_string()));
        }

        Ok(self.get_post(id).await?.comments)
    }
}
