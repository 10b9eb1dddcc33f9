use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::post::errors::PostError;
use crate::domain::post::models::Comment;
use crate::domain::post::models::CommentId;
use crate::domain::post::models::Like;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostId;
use crate::domain::post::ports::PostRepository;
use crate::domain::user::models::UserId;

/// Post store kept in process memory, newest post first.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPostRepository {
    posts: Arc<RwLock<Vec<Post>>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: Post) -> Result<Post, PostError> {
        self.posts.write().await.insert(0, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostError> {
        Ok(self
            .posts
            .read()
            .await
            .iter()
            .find(|post| post.id == *id)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Post>, PostError> {
        Ok(self.posts.read().await.clone())
    }

    async fn delete(&self, id: &PostId) -> Result<bool, PostError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|post| post.id != *id);
        Ok(posts.len() < before)
    }

    async fn add_like(&self, id: &PostId, user: &UserId) -> Result<bool, PostError> {
        let mut posts = self.posts.write().await;
        let post = posts
            .iter_mut()
            .find(|post| post.id == *id)
            .ok_or_else(|| PostError::NotFound(id.to_string()))?;

        if post.likes.iter().any(|like| like.user == *user) {
            return Ok(false);
        }

        post.likes.insert(0, Like { user: *user });
        Ok(true)
    }

    async fn remove_like(&self, id: &PostId, user: &UserId) -> Result<bool, PostError> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|post| post.id == *id) else {
            return Ok(false);
        };

        let before = post.likes.len();
        post.likes.retain(|like| like.user != *user);
        Ok(post.likes.len() < before)
    }

    async fn add_comment(&self, id: &PostId, comment: Comment) -> Result<(), PostError> {
        let mut posts = self.posts.write().await;
        let post = posts
            .iter_mut()
            .find(|post| post.id == *id)
            .ok_or_else(|| PostError::NotFound(id.to_string()))?;

        post.comments.insert(0, comment);
        Ok(())
    }

    async fn remove_comment(&self, id: &PostId, comment: &CommentId) -> Result<bool, PostError> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|post| post.id == *id) else {
            return Ok(false);
        };

        let before = post.comments.len();
        post.comments.retain(|item| item.id != *comment);
        Ok(post.comments.len() < before)
    }
}
