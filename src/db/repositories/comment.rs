//! Comment repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::models::{Comment, CommentWithAuthor};

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Create a new comment
    async fn create(&self, post_id: i64, user_id: i64, text: &str) -> Result<Comment>;

    /// Get a comment by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>>;

    /// Get comments for a post, oldest first, with author info
    async fn list_by_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>>;

    /// Delete a comment
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based comment repository implementation
pub struct SqlxCommentRepository {
    pool: SqlitePool,
}

impl SqlxCommentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn create(&self, post_id: i64, user_id: i64, text: &str) -> Result<Comment> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO comments (post_id, user_id, text, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(post_id)
        .bind(user_id)
        .bind(text)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to insert comment")?;

        Ok(Comment {
            id: result.last_insert_rowid(),
            post_id,
            user_id,
            text: text.to_string(),
            created_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>> {
        let row = sqlx::query("SELECT * FROM comments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get comment")?;

        Ok(row.map(|r| Comment {
            id: r.get("id"),
            post_id: r.get("post_id"),
            user_id: r.get("user_id"),
            text: r.get("text"),
            created_at: r.get("created_at"),
        }))
    }

    async fn list_by_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>> {
        let rows = sqlx::query(
            r#"SELECT c.*, u.username, u.email
               FROM comments c
               JOIN users u ON c.user_id = u.id
               WHERE c.post_id = ?
               ORDER BY c.created_at ASC, c.id ASC"#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list comments")?;

        Ok(rows
            .iter()
            .map(|r| {
                let email: Option<String> = r.get("email");
                CommentWithAuthor {
                    id: r.get("id"),
                    post_id: r.get("post_id"),
                    user_id: r.get("user_id"),
                    username: r.get("username"),
                    text: r.get("text"),
                    created_at: r.get("created_at"),
                    avatar_url: CommentWithAuthor::gravatar_url(&email),
                }
            })
            .collect())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete comment")?;
        Ok(result.rows_affected() > 0)
    }
}
