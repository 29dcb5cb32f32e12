//! Tag model
//!
//! Tags are free-form labels attachable to any number of posts. A tag is
//! identified by its name; the slug is the lowercased, URL-safe form used
//! in tag listing routes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    /// Unique identifier
    pub id: i64,
    /// Tag name (unique)
    pub name: String,
    /// URL-friendly slug (unique, lowercase)
    pub slug: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Create a new Tag with the given name.
    ///
    /// The slug is derived from the name. The ID will be set to 0 and
    /// should be assigned by the database.
    pub fn new(name: String) -> Self {
        let slug = slugify(&name);
        Self {
            id: 0, // Will be set by the database
            name,
            slug,
            created_at: Utc::now(),
        }
    }
}

/// Derive a URL-safe slug from a tag or post title.
///
/// Lowercases, keeps alphanumerics, and collapses everything else into
/// single hyphens.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_was_hyphen = true;

    for c in input.chars() {
        if c.is_alphanumeric() {
            for lc in c.to_lowercase() {
                slug.push(lc);
            }
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}
