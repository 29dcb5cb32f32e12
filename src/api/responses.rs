//! Shared API response types
//!
//! Common response structures used across multiple endpoints.

use serde::Serialize;

use crate::models::{CommentWithAuthor, Post, Tag, User};

/// Full post response used in detail and list endpoints
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub h1: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Author username
    pub author: String,
    /// Tag names
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Tag info embedded in post responses
#[derive(Debug, Serialize)]
pub struct TagInfo {
    pub id: i64,
    pub slug: String,
    pub name: String,
}

impl From<Tag> for TagInfo {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            slug: tag.slug,
            name: tag.name,
        }
    }
}

impl PostResponse {
    pub fn from_parts(post: Post, author: String, tags: Vec<Tag>) -> Self {
        Self {
            id: post.id,
            h1: post.h1,
            title: post.title,
            slug: post.slug,
            description: post.description,
            content: post.content,
            image: post.image,
            author,
            tags: tags.into_iter().map(|t| t.name).collect(),
            created_at: post.created_at.to_rfc3339(),
            updated_at: post.updated_at.to_rfc3339(),
        }
    }
}

/// Paginated post list response
#[derive(Debug, Serialize)]
pub struct PaginatedPostsResponse {
    pub posts: Vec<PostResponse>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

/// Comment response with author display info.
///
/// Comments are addressed by post slug on the wire, so the parent post
/// appears as its slug rather than a numeric id.
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    /// Slug of the post the comment belongs to
    pub post: String,
    pub username: String,
    pub text: String,
    pub avatar_url: String,
    pub created_date: String,
}

impl CommentResponse {
    pub fn from_comment(comment: CommentWithAuthor, post_slug: &str) -> Self {
        Self {
            id: comment.id,
            post: post_slug.to_string(),
            username: comment.username,
            text: comment.text,
            avatar_url: comment.avatar_url,
            created_date: comment.created_at.to_rfc3339(),
        }
    }
}

/// User response (never exposes the password hash)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Simple message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
