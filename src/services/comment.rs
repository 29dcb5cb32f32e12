//! Comment service
//!
//! Comments hang off posts addressed by slug. Creation requires an
//! authenticated user and non-empty text.

use crate::db::repositories::{CommentRepository, PostRepository};
use crate::models::{Comment, CommentWithAuthor, CreateCommentInput};
use anyhow::{Context, Result};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum CommentServiceError {
    #[error("Post not found: {0}")]
    PostNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Comment service
pub struct CommentService {
    comment_repo: Arc<dyn CommentRepository>,
    post_repo: Arc<dyn PostRepository>,
}

impl CommentService {
    pub fn new(
        comment_repo: Arc<dyn CommentRepository>,
        post_repo: Arc<dyn PostRepository>,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
        }
    }

    /// List the comments of the post with the given slug, oldest first
    pub async fn list_for_post(
        &self,
        post_slug: &str,
    ) -> Result<Vec<CommentWithAuthor>, CommentServiceError> {
        let post = self.resolve_post(post_slug).await?;
        let comments = self
            .comment_repo
            .list_by_post(post)
            .await
            .context("Failed to list comments")?;
        Ok(comments)
    }

    /// Add a comment to the post with the given slug
    pub async fn create_for_post(
        &self,
        post_slug: &str,
        user_id: i64,
        input: CreateCommentInput,
    ) -> Result<Comment, CommentServiceError> {
        let text = input.text.trim();
        if text.is_empty() {
            return Err(CommentServiceError::ValidationError(
                "Comment text must not be empty".to_string(),
            ));
        }

        let post = self.resolve_post(post_slug).await?;

        let comment = self
            .comment_repo
            .create(post, user_id, text)
            .await
            .context("Failed to create comment")?;

        tracing::debug!(comment_id = comment.id, post_id = post, "Comment added");
        Ok(comment)
    }

    async fn resolve_post(&self, slug: &str) -> Result<i64, CommentServiceError> {
        // Slugs are stored lowercase; accept any casing in the path
        let post = self
            .post_repo
            .get_by_slug(&slug.to_lowercase())
            .await
            .context("Failed to look up post")?
            .ok_or_else(|| CommentServiceError::PostNotFound(slug.to_string()))?;
        Ok(post.id)
    }
}
