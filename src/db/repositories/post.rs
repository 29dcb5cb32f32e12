//! Post repository
//!
//! Handles persistence for posts, including the paginated listings
//! (search, by-tag) and the most-recent query backing the aside widget.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::models::{ListParams, Post};

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Create a new post
    async fn create(&self, post: &Post) -> Result<Post>;

    /// Get a post by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Post>>;

    /// Get a post by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>>;

    /// Check whether a slug is already taken
    async fn slug_exists(&self, slug: &str) -> Result<bool>;

    /// List posts, newest first, optionally filtered by a search term
    /// matched against content and h1. Returns the page plus total count.
    async fn list(&self, search: Option<&str>, params: &ListParams) -> Result<(Vec<Post>, i64)>;

    /// List posts carrying the given tag, newest first
    async fn list_by_tag(&self, tag_id: i64, params: &ListParams) -> Result<(Vec<Post>, i64)>;

    /// Get the most recently created posts (highest ID first)
    async fn latest(&self, limit: i64) -> Result<Vec<Post>>;

    /// Update a post
    async fn update(&self, post: &Post) -> Result<Post>;

    /// Delete a post
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based post repository implementation
pub struct SqlxPostRepository {
    pool: SqlitePool,
}

impl SqlxPostRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn map_post(row: &sqlx::sqlite::SqliteRow) -> Post {
    Post {
        id: row.get("id"),
        h1: row.get("h1"),
        title: row.get("title"),
        slug: row.get("slug"),
        description: row.get("description"),
        content: row.get("content"),
        image: row.get("image"),
        author_id: row.get("author_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, post: &Post) -> Result<Post> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"INSERT INTO posts (h1, title, slug, description, content, image, author_id, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&post.h1)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.description)
        .bind(&post.content)
        .bind(&post.image)
        .bind(post.author_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to insert post")?;

        let mut created = post.clone();
        created.id = result.last_insert_rowid();
        created.created_at = now;
        created.updated_at = now;
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let row = sqlx::query("SELECT * FROM posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get post by id")?;

        Ok(row.as_ref().map(map_post))
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let row = sqlx::query("SELECT * FROM posts WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get post by slug")?;

        Ok(row.as_ref().map(map_post))
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check slug")?;
        Ok(count > 0)
    }

    async fn list(&self, search: Option<&str>, params: &ListParams) -> Result<(Vec<Post>, i64)> {
        let (total, rows) = match search {
            Some(term) if !term.trim().is_empty() => {
                let pattern = format!("%{}%", term.trim());
                let total: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM posts WHERE content LIKE ? OR h1 LIKE ?",
                )
                .bind(&pattern)
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await
                .context("Failed to count posts")?;

                let rows = sqlx::query(
                    r#"SELECT * FROM posts
                       WHERE content LIKE ? OR h1 LIKE ?
                       ORDER BY created_at DESC, id DESC
                       LIMIT ? OFFSET ?"#,
                )
                .bind(&pattern)
                .bind(&pattern)
                .bind(params.limit())
                .bind(params.offset())
                .fetch_all(&self.pool)
                .await
                .context("Failed to list posts")?;

                (total, rows)
            }
            _ => {
                let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
                    .fetch_one(&self.pool)
                    .await
                    .context("Failed to count posts")?;

                let rows = sqlx::query(
                    r#"SELECT * FROM posts
                       ORDER BY created_at DESC, id DESC
                       LIMIT ? OFFSET ?"#,
                )
                .bind(params.limit())
                .bind(params.offset())
                .fetch_all(&self.pool)
                .await
                .context("Failed to list posts")?;

                (total, rows)
            }
        };

        Ok((rows.iter().map(map_post).collect(), total))
    }

    async fn list_by_tag(&self, tag_id: i64, params: &ListParams) -> Result<(Vec<Post>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM post_tags WHERE tag_id = ?")
                .bind(tag_id)
                .fetch_one(&self.pool)
                .await
                .context("Failed to count tagged posts")?;

        let rows = sqlx::query(
            r#"SELECT p.* FROM posts p
               JOIN post_tags pt ON pt.post_id = p.id
               WHERE pt.tag_id = ?
               ORDER BY p.created_at DESC, p.id DESC
               LIMIT ? OFFSET ?"#,
        )
        .bind(tag_id)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list tagged posts")?;

        Ok((rows.iter().map(map_post).collect(), total))
    }

    async fn latest(&self, limit: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query("SELECT * FROM posts ORDER BY id DESC LIMIT ?")
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .context("Failed to get latest posts")?;

        Ok(rows.iter().map(map_post).collect())
    }

    async fn update(&self, post: &Post) -> Result<Post> {
        let now = Utc::now();
        sqlx::query(
            r#"UPDATE posts
               SET h1 = ?, title = ?, slug = ?, description = ?, content = ?, image = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(&post.h1)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.description)
        .bind(&post.content)
        .bind(&post.image)
        .bind(now)
        .bind(post.id)
        .execute(&self.pool)
        .await
        .context("Failed to update post")?;

        let mut updated = post.clone();
        updated.updated_at = now;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete post")?;
        Ok(result.rows_affected() > 0)
    }
}
