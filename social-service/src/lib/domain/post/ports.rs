use async_trait::async_trait;

use crate::domain::post::errors::PostError;
use crate::domain::post::models::Comment;
use crate::domain::post::models::CommentId;
use crate::domain::post::models::Like;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostId;
use crate::domain::post::models::PostText;
use crate::domain::user::models::UserId;

/// Port for post domain service operations.
#[async_trait]
pub trait PostServicePort: Send + Sync + 'static {
    /// Publish a post under the caller's current name and avatar.
    ///
    /// # Errors
    /// * `AuthorNotFound` - Caller's account no longer exists
    async fn create_post(&self, author: &UserId, text: PostText) -> Result<Post, PostError>;

    /// All posts, newest first.
    async fn list_posts(&self) -> Result<Vec<Post>, PostError>;

    /// # Errors
    /// * `NotFound` - No such post
    async fn get_post(&self, id: &PostId) -> Result<Post, PostError>;

    /// # Errors
    /// * `NotFound` - No such post
    /// * `NotAuthorized` - Caller is not the post's author
    async fn delete_post(&self, id: &PostId, caller: &UserId) -> Result<(), PostError>;

    /// Add the caller's like.
    ///
    /// # Returns
    /// Likes after the change, newest first
    ///
    /// # Errors
    /// * `NotFound` - No such post
    /// * `AlreadyLiked` - Caller already likes the post
    async fn like_post(&self, id: &PostId, caller: &UserId) -> Result<Vec<Like>, PostError>;

    /// Remove the caller's like. A caller who never liked the post gets the
    /// likes back unchanged.
    ///
    /// # Errors
    /// * `NotFound` - No such post
    async fn unlike_post(&self, id: &PostId, caller: &UserId) -> Result<Vec<Like>, PostError>;

    /// # Returns
    /// Comments after the change, newest first
    async fn add_comment(
        &self,
        id: &PostId,
        author: &UserId,
        text: PostText,
    ) -> Result<Vec<Comment>, PostError>;

    /// # Errors
    /// * `NotFound` - No such post
    /// * `CommentNotFound` - No such comment on the post
    /// * `NotAuthorized` - Caller did not write the comment
    async fn delete_comment(
        &self,
        id: &PostId,
        comment: &CommentId,
        caller: &UserId,
    ) -> Result<Vec<Comment>, PostError>;
}

/// Persistence operations for posts, likes and comments.
#[async_trait]
pub trait PostRepository: Send + Sync + 'static {
    async fn create(&self, post: Post) -> Result<Post, PostError>;

    /// Post with its likes and comments loaded.
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostError>;

    async fn list_all(&self) -> Result<Vec<Post>, PostError>;

    /// # Returns
    /// `false` when there was no such post
    async fn delete(&self, id: &PostId) -> Result<bool, PostError>;

    /// Insert a like unless the user already has one on the post.
    ///
    /// # Returns
    /// `false` when the like was already present
    ///
    /// # Errors
    /// * `NotFound` - No such post
    async fn add_like(&self, id: &PostId, user: &UserId) -> Result<bool, PostError>;

    /// # Returns
    /// `false` when the user had no like on the post
    async fn remove_like(&self, id: &PostId, user: &UserId) -> Result<bool, PostError>;

    /// # Errors
    /// * `NotFound` - No such post
    async fn add_comment(&self, id: &PostId, comment: Comment) -> Result<(), PostError>;

    /// # Returns
    /// `false` when there was no such comment on the post
    async fn remove_comment(&self, id: &PostId, comment: &CommentId) -> Result<bool, PostError>;
}
