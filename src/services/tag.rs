//! Tag service

use crate::db::repositories::TagRepository;
use crate::models::Tag;
use anyhow::{Context, Result};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum TagServiceError {
    #[error("Tag not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Tag service
pub struct TagService {
    tag_repo: Arc<dyn TagRepository>,
}

impl TagService {
    pub fn new(tag_repo: Arc<dyn TagRepository>) -> Self {
        Self { tag_repo }
    }

    /// List all tags, alphabetically
    pub async fn list(&self) -> Result<Vec<Tag>, TagServiceError> {
        let tags = self.tag_repo.list().await.context("Failed to list tags")?;
        Ok(tags)
    }

    /// Get a tag by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Tag, TagServiceError> {
        self.tag_repo
            .get_by_slug(slug)
            .await
            .context("Failed to get tag")?
            .ok_or_else(|| TagServiceError::NotFound(slug.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxTagRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> (TagService, Arc<SqlxTagRepository>) {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        let repo = Arc::new(SqlxTagRepository::new(pool));
        (TagService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_list_is_alphabetical() {
        let (service, repo) = setup().await;
        repo.get_or_create("zebra").await.unwrap();
        repo.get_or_create("apple").await.unwrap();

        let tags = service.list().await.unwrap();
        assert_eq!(tags[0].name, "apple");
        assert_eq!(tags[1].name, "zebra");
    }

    #[tokio::test]
    async fn test_get_by_slug_missing() {
        let (service, _repo) = setup().await;
        let result = service.get_by_slug("missing").await;
        assert!(matches!(result, Err(TagServiceError::NotFound(_))));
    }
}
