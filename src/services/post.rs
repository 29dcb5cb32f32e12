//! Post service
//!
//! Business logic for posts: slug generation, tag attachment, ownership
//! checks on mutation, and the paginated listings the API exposes.

use crate::db::repositories::{PostRepository, TagRepository};
use crate::models::{
    slugify, CreatePostInput, ListParams, PagedResult, Post, Tag, UpdatePostInput,
};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Number of posts shown in the "latest posts" widget
pub const LATEST_POST_COUNT: i64 = 2;

/// Error types for post service operations
#[derive(Debug, thiserror::Error)]
pub enum PostServiceError {
    /// Post not found
    #[error("Post not found: {0}")]
    NotFound(String),

    /// Tag not found
    #[error("Tag not found: {0}")]
    TagNotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Caller is not allowed to modify this post
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Post service
pub struct PostService {
    post_repo: Arc<dyn PostRepository>,
    tag_repo: Arc<dyn TagRepository>,
}

impl PostService {
    pub fn new(post_repo: Arc<dyn PostRepository>, tag_repo: Arc<dyn TagRepository>) -> Self {
        Self {
            post_repo,
            tag_repo,
        }
    }

    /// Create a new post.
    ///
    /// The slug is taken from the input when given, otherwise derived from
    /// the title. Either way it is made unique by appending a numeric
    /// suffix if needed. Missing tags are created.
    pub async fn create(
        &self,
        input: CreatePostInput,
        author_id: i64,
    ) -> Result<Post, PostServiceError> {
        if input.title.trim().is_empty() {
            return Err(PostServiceError::ValidationError(
                "Title must not be empty".to_string(),
            ));
        }
        if input.content.trim().is_empty() {
            return Err(PostServiceError::ValidationError(
                "Content must not be empty".to_string(),
            ));
        }

        let base = match &input.slug {
            Some(slug) if !slug.trim().is_empty() => slugify(slug),
            _ => slugify(&input.title),
        };
        if base.is_empty() {
            return Err(PostServiceError::ValidationError(
                "Cannot derive a slug from the title".to_string(),
            ));
        }
        let slug = self.unique_slug(&base).await?;

        let h1 = if input.h1.trim().is_empty() {
            input.title.clone()
        } else {
            input.h1.clone()
        };

        let post = Post::new(
            h1,
            input.title,
            slug,
            input.description,
            input.content,
            input.image,
            author_id,
        );

        let created = self
            .post_repo
            .create(&post)
            .await
            .context("Failed to create post")?;

        self.attach_tags(created.id, &input.tags).await?;

        tracing::info!(post_id = created.id, slug = %created.slug, "Post created");

        Ok(created)
    }

    /// Get a post by slug.
    ///
    /// Stored slugs are lowercase; the incoming path segment is
    /// lowercased so links survive case mangling.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Post, PostServiceError> {
        self.post_repo
            .get_by_slug(&slug.to_lowercase())
            .await
            .context("Failed to get post")?
            .ok_or_else(|| PostServiceError::NotFound(slug.to_string()))
    }

    /// Get the tags attached to a post
    pub async fn tags_of(&self, post_id: i64) -> Result<Vec<Tag>, PostServiceError> {
        let tags = self
            .tag_repo
            .get_by_post_id(post_id)
            .await
            .context("Failed to load post tags")?;
        Ok(tags)
    }

    /// List posts, newest first, optionally filtered by a search term
    pub async fn list(
        &self,
        search: Option<&str>,
        params: &ListParams,
    ) -> Result<PagedResult<Post>, PostServiceError> {
        let (posts, total) = self
            .post_repo
            .list(search, params)
            .await
            .context("Failed to list posts")?;
        Ok(PagedResult::new(posts, total, params))
    }

    /// List posts carrying the tag with the given slug
    pub async fn list_by_tag_slug(
        &self,
        tag_slug: &str,
        params: &ListParams,
    ) -> Result<(Tag, PagedResult<Post>), PostServiceError> {
        let tag = self
            .tag_repo
            .get_by_slug(tag_slug)
            .await
            .context("Failed to look up tag")?
            .ok_or_else(|| PostServiceError::TagNotFound(tag_slug.to_string()))?;

        let (posts, total) = self
            .post_repo
            .list_by_tag(tag.id, params)
            .await
            .context("Failed to list posts by tag")?;

        Ok((tag, PagedResult::new(posts, total, params)))
    }

    /// Get the most recently created posts
    pub async fn latest(&self) -> Result<Vec<Post>, PostServiceError> {
        let posts = self
            .post_repo
            .latest(LATEST_POST_COUNT)
            .await
            .context("Failed to get latest posts")?;
        Ok(posts)
    }

    /// Update a post. Only the author may update it.
    pub async fn update(
        &self,
        slug: &str,
        input: UpdatePostInput,
        editor_id: i64,
    ) -> Result<Post, PostServiceError> {
        let mut post = self.get_by_slug(slug).await?;

        if post.author_id != editor_id {
            return Err(PostServiceError::Forbidden(
                "Only the author can modify this post".to_string(),
            ));
        }

        if !input.has_changes() {
            return Ok(post);
        }

        if let Some(h1) = input.h1 {
            post.h1 = h1;
        }
        if let Some(title) = input.title {
            post.title = title;
        }
        if let Some(new_slug) = input.slug {
            let candidate = slugify(&new_slug);
            if candidate.is_empty() {
                return Err(PostServiceError::ValidationError(
                    "Cannot derive a slug from the requested value".to_string(),
                ));
            }
            if candidate != post.slug {
                if self
                    .post_repo
                    .slug_exists(&candidate)
                    .await
                    .context("Failed to check slug")?
                {
                    return Err(PostServiceError::ValidationError(format!(
                        "Slug '{}' is already taken",
                        candidate
                    )));
                }
                post.slug = candidate;
            }
        }
        if let Some(description) = input.description {
            post.description = description;
        }
        if let Some(content) = input.content {
            post.content = content;
        }
        if let Some(image) = input.image {
            post.image = Some(image);
        }

        let updated = self
            .post_repo
            .update(&post)
            .await
            .context("Failed to update post")?;

        if let Some(tags) = &input.tags {
            self.attach_tags(updated.id, tags).await?;
        }

        Ok(updated)
    }

    /// Delete a post. Only the author may delete it.
    pub async fn delete(&self, slug: &str, editor_id: i64) -> Result<(), PostServiceError> {
        let post = self.get_by_slug(slug).await?;

        if post.author_id != editor_id {
            return Err(PostServiceError::Forbidden(
                "Only the author can delete this post".to_string(),
            ));
        }

        self.post_repo
            .delete(post.id)
            .await
            .context("Failed to delete post")?;

        tracing::info!(post_id = post.id, slug = %post.slug, "Post deleted");
        Ok(())
    }

    async fn attach_tags(&self, post_id: i64, names: &[String]) -> Result<(), PostServiceError> {
        let mut tag_ids = Vec::with_capacity(names.len());
        for name in names {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let tag = self
                .tag_repo
                .get_or_create(name)
                .await
                .context("Failed to resolve tag")?;
            if !tag_ids.contains(&tag.id) {
                tag_ids.push(tag.id);
            }
        }
        self.tag_repo
            .set_post_tags(post_id, &tag_ids)
            .await
            .context("Failed to attach tags")?;
        Ok(())
    }

    async fn unique_slug(&self, base: &str) -> Result<String, PostServiceError> {
        if !self
            .post_repo
            .slug_exists(base)
            .await
            .context("Failed to check slug")?
        {
            return Ok(base.to_string());
        }

        for n in 2..100 {
            let candidate = format!("{}-{}", base, n);
            if !self
                .post_repo
                .slug_exists(&candidate)
                .await
                .context("Failed to check slug")?
            {
                return Ok(candidate);
            }
        }

        Err(PostServiceError::ValidationError(format!(
            "Could not find a free slug for '{}'",
            base
        )))
    }
}
