use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::post::errors::PostError;
use crate::domain::post::models::Comment;
use crate::domain::post::models::CommentId;
use crate::domain::post::models::Like;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostId;
use crate::domain::post::ports::PostRepository;
use crate::domain::user::models::UserId;

fn db_error(e: sqlx::Error) -> PostError {
    PostError::DatabaseError(e.to_string())
}

/// Maps a foreign key violation on a child row to the missing parent post.
fn missing_post_or_db_error(id: &PostId, e: sqlx::Error) -> PostError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return PostError::NotFound(id.to_string());
        }
    }
    db_error(e)
}

pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_post(row: &PgRow) -> Result<Post, PostError> {
        Ok(Post {
            id: PostId(row.try_get("id").map_err(db_error)?),
            user: UserId(row.try_get("user_id").map_err(db_error)?),
            text: row.try_get("text").map_err(db_error)?,
            name: row.try_get("name").map_err(db_error)?,
            avatar: row.try_get("avatar").map_err(db_error)?,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: row.try_get("created_at").map_err(db_error)?,
        })
    }

    async fn with_children(&self, mut posts: Vec<Post>) -> Result<Vec<Post>, PostError> {
        if posts.is_empty() {
            return Ok(posts);
        }

        let ids: Vec<Uuid> = posts.iter().map(|post| post.id.0).collect();

        let like_rows = sqlx::query(
            r#"
            SELECT post_id, user_id
            FROM post_likes
            WHERE post_id = ANY($1)
            ORDER BY seq DESC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let mut likes: HashMap<Uuid, Vec<Like>> = HashMap::new();
        for row in &like_rows {
            let post_id: Uuid = row.try_get("post_id").map_err(db_error)?;
            likes.entry(post_id).or_default().push(Like {
                user: UserId(row.try_get("user_id").map_err(db_error)?),
            });
        }

        let comment_rows = sqlx::query(
            r#"
            SELECT id, post_id, user_id, text, name, avatar, created_at
            FROM post_comments
            WHERE post_id = ANY($1)
            ORDER BY seq DESC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let mut comments: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for row in &comment_rows {
            let post_id: Uuid = row.try_get("post_id").map_err(db_error)?;
            comments.entry(post_id).or_default().push(Comment {
                id: CommentId(row.try_get("id").map_err(db_error)?),
                user: UserId(row.try_get("user_id").map_err(db_error)?),
                text: row.try_get("text").map_err(db_error)?,
                name: row.try_get("name").map_err(db_error)?,
                avatar: row.try_get("avatar").map_err(db_error)?,
                created_at: row.try_get("created_at").map_err(db_error)?,
            });
        }

        for post in &mut posts {
            post.likes = likes.remove(&post.id.0).unwrap_or_default();
            post.comments = comments.remove(&post.id.0).unwrap_or_default();
        }

        Ok(posts)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: Post) -> Result<Post, PostError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, user_id, text, name, avatar, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(post.id.0)
        .bind(post.user.0)
        .bind(&post.text)
        .bind(&post.name)
        .bind(&post.avatar)
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(post)
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, text, name, avatar, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let post = Self::row_to_post(&row)?;
        Ok(self.with_children(vec![post]).await?.pop())
    }

    async fn list_all(&self) -> Result<Vec<Post>, PostError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, text, name, avatar, created_at
            FROM posts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let posts = rows
            .iter()
            .map(Self::row_to_post)
            .collect::<Result<Vec<_>, _>>()?;

        self.with_children(posts).await
    }

    async fn delete(&self, id: &PostId) -> Result<bool, PostError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_like(&self, id: &PostId, user: &UserId) -> Result<bool, PostError> {
        let result = sqlx::query(
            r#"
            INSERT INTO post_likes (post_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (post_id, user_id) DO NOTHING
            "#,
        )
        .bind(id.0)
        .bind(user.0)
        .execute(&self.pool)
        .await
        .map_err(|e| missing_post_or_db_error(id, e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_like(&self, id: &PostId, user: &UserId) -> Result<bool, PostError> {
        let result = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
            .bind(id.0)
            .bind(user.0)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_comment(&self, id: &PostId, comment: Comment) -> Result<(), PostError> {
        sqlx::query(
            r#"
            INSERT INTO post_comments (id, post_id, user_id, text, name, avatar, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(comment.id.0)
        .bind(id.0)
        .bind(comment.user.0)
        .bind(&comment.text)
        .bind(&comment.name)
        .bind(&comment.avatar)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| missing_post_or_db_error(id, e))?;

        Ok(())
    }

    async fn remove_comment(&self, id: &PostId, comment: &CommentId) -> Result<bool, PostError> {
        let result = sqlx::query("DELETE FROM post_comments WHERE id = $1 AND post_id = $2")
            .bind(comment.0)
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
