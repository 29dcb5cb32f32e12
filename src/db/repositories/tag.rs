//! Tag repository
//!
//! Tags are shared between posts through the `post_tags` join table.
//! `get_or_create` gives the create-or-reuse behavior post creation needs.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::models::{slugify, Tag};

/// Tag repository trait
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Get tag by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Tag>>;

    /// Get tag by name
    async fn get_by_name(&self, name: &str) -> Result<Option<Tag>>;

    /// Get an existing tag by name or create it
    async fn get_or_create(&self, name: &str) -> Result<Tag>;

    /// List all tags, alphabetically
    async fn list(&self) -> Result<Vec<Tag>>;

    /// Replace the tag set of a post
    async fn set_post_tags(&self, post_id: i64, tag_ids: &[i64]) -> Result<()>;

    /// Get tags for a post
    async fn get_by_post_id(&self, post_id: i64) -> Result<Vec<Tag>>;
}

/// SQLx-based tag repository implementation
pub struct SqlxTagRepository {
    pool: SqlitePool,
}

impl SqlxTagRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn map_tag(row: &sqlx::sqlite::SqliteRow) -> Tag {
    Tag {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Tag>> {
        // Stored slugs are lowercase; incoming path segments may not be
        let row = sqlx::query("SELECT * FROM tags WHERE slug = ?")
            .bind(slug.to_lowercase())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get tag by slug")?;

        Ok(row.as_ref().map(map_tag))
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Tag>> {
        let row = sqlx::query("SELECT * FROM tags WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get tag by name")?;

        Ok(row.as_ref().map(map_tag))
    }

    async fn get_or_create(&self, name: &str) -> Result<Tag> {
        if let Some(tag) = self.get_by_name(name).await? {
            return Ok(tag);
        }

        let now = Utc::now();
        let slug = slugify(name);
        let result = sqlx::query(
            "INSERT OR IGNORE INTO tags (name, slug, created_at) VALUES (?, ?, ?)",
        )
        .bind(name)
        .bind(&slug)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to insert tag")?;

        if result.rows_affected() > 0 {
            return Ok(Tag {
                id: result.last_insert_rowid(),
                name: name.to_string(),
                slug,
                created_at: now,
            });
        }

        // Lost a race with a concurrent insert
        self.get_by_name(name)
            .await?
            .context("Tag vanished after insert conflict")
    }

    async fn list(&self) -> Result<Vec<Tag>> {
        let rows = sqlx::query("SELECT * FROM tags ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list tags")?;

        Ok(rows.iter().map(map_tag).collect())
    }

    async fn set_post_tags(&self, post_id: i64, tag_ids: &[i64]) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin tx")?;

        sqlx::query("DELETE FROM post_tags WHERE post_id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .context("Failed to clear post tags")?;

        for tag_id in tag_ids {
            sqlx::query("INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?, ?)")
                .bind(post_id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await
                .context("Failed to attach tag")?;
        }

        tx.commit().await.context("Failed to commit tag update")?;
        Ok(())
    }

    async fn get_by_post_id(&self, post_id: i64) -> Result<Vec<Tag>> {
        let rows = sqlx::query(
            r#"SELECT t.* FROM tags t
               JOIN post_tags pt ON pt.tag_id = t.id
               WHERE pt.post_id = ?
               ORDER BY t.name ASC"#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to get post tags")?;

        Ok(rows.iter().map(map_tag).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{PostRepository, SqlxPostRepository, SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::{Post, User};

    async fn setup() -> (SqlxTagRepository, SqlxPostRepository, i64) {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();

        let users = SqlxUserRepository::new(pool.clone());
        let author = users
            .create(&User::new("author".to_string(), None, "hash".to_string()))
            .await
            .unwrap();

        (
            SqlxTagRepository::new(pool.clone()),
            SqlxPostRepository::new(pool),
            author.id,
        )
    }

    #[tokio::test]
    async fn test_get_or_create_reuses_existing() {
        let (tags, _posts, _) = setup().await;

        let first = tags.get_or_create("Rust").await.unwrap();
        let second = tags.get_or_create("Rust").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.slug, "rust");

        assert_eq!(tags.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_slug_lookup_is_case_insensitive() {
        let (tags, _posts, _) = setup().await;
        tags.get_or_create("Web Dev").await.unwrap();

        let found = tags.get_by_slug("Web-Dev").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().name, "Web Dev");
    }

    #[tokio::test]
    async fn test_set_post_tags_replaces_set() {
        let (tags, posts, author_id) = setup().await;
        let post = posts
            .create(&Post::new(
                "H".to_string(),
                "T".to_string(),
                "t".to_string(),
                String::new(),
                "body".to_string(),
                None,
                author_id,
            ))
            .await
            .unwrap();

        let a = tags.get_or_create("a").await.unwrap();
        let b = tags.get_or_create("b").await.unwrap();
        let c = tags.get_or_create("c").await.unwrap();

        tags.set_post_tags(post.id, &[a.id, b.id]).await.unwrap();
        assert_eq!(tags.get_by_post_id(post.id).await.unwrap().len(), 2);

        tags.set_post_tags(post.id, &[c.id]).await.unwrap();
        let current = tags.get_by_post_id(post.id).await.unwrap();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].name, "c");
    }
}
