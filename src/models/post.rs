//! Post model
//!
//! This module provides:
//! - `Post` entity representing a blog post
//! - Input types for creating and updating posts
//! - Pagination types shared by all list queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier
    pub id: i64,
    /// Page heading shown above the post body
    pub h1: String,
    /// Post title
    pub title: String,
    /// URL-friendly slug (unique)
    pub slug: String,
    /// Short description / teaser
    pub description: String,
    /// Post body
    pub content: String,
    /// Cover image URL
    pub image: Option<String>,
    /// Author user ID
    pub author_id: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with the given parameters
    pub fn new(
        h1: String,
        title: String,
        slug: String,
        description: String,
        content: String,
        image: Option<String>,
        author_id: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Will be set by the database
            h1,
            title,
            slug,
            description,
            content,
            image,
            author_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a new post
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostInput {
    pub h1: String,
    pub title: String,
    /// Optional slug; generated from the title when absent
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    pub content: String,
    pub image: Option<String>,
    /// Tag names; missing tags are created
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Input for updating an existing post
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePostInput {
    pub h1: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    /// Replaces the full tag set when present
    pub tags: Option<Vec<String>>,
}

impl UpdatePostInput {
    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.h1.is_some()
            || self.title.is_some()
            || self.slug.is_some()
            || self.description.is_some()
            || self.content.is_some()
            || self.image.is_some()
            || self.tags.is_some()
    }
}

/// Pagination parameters for list queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListParams {
    /// Page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

/// Default page size for all post listings
pub const DEFAULT_PAGE_SIZE: u32 = 2;

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListParams {
    /// Create new pagination parameters
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 100),
        }
    }

    /// Calculate the offset for database queries
    pub fn offset(&self) -> i64 {
        // i64 arithmetic: page comes from the query string and u32 math
        // would overflow at large page numbers
        (self.page as i64 - 1) * self.per_page as i64
    }

    /// Get the limit for database queries
    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// Paginated result container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: i64,
    /// Current page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl<T> PagedResult<T> {
    /// Create a new paginated result
    pub fn new(items: Vec<T>, total: i64, params: &ListParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            per_page: params.per_page,
        }
    }

    /// Calculate the total number of pages
    pub fn total_pages(&self) -> u32 {
        if self.per_page == 0 {
            return 0;
        }
        let per_page = self.per_page as i64;
        let pages = (self.total.max(0) + per_page - 1) / per_page;
        pages.min(u32::MAX as i64) as u32
    }

    /// Check if there is a next page
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Check if there is a previous page
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
