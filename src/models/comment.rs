//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Comment with author info for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentWithAuthor {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub avatar_url: String,
}

impl CommentWithAuthor {
    /// Generate Gravatar URL from email
    pub fn gravatar_url(email: &Option<String>) -> String {
        match email {
            Some(e) if !e.is_empty() => {
                let hash = format!("{:x}", md5::compute(e.trim().to_lowercase()));
                format!("https://www.gravatar.com/avatar/{}?d=mp&s=80", hash)
            }
            _ => "https://www.gravatar.com/avatar/?d=mp&s=80".to_string(),
        }
    }
}

/// Input for creating a comment
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentInput {
    pub text: String,
}

impl CreateCommentInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravatar_url_hashes_normalized_email() {
        let url = CommentWithAuthor::gravatar_url(&Some(" Reader@Example.COM ".to_string()));
        let expected_hash = format!("{:x}", md5::compute("reader@example.com"));
        assert!(url.contains(&expected_hash));
    }

    #[test]
    fn test_gravatar_url_fallback_without_email() {
        let url = CommentWithAuthor::gravatar_url(&None);
        assert_eq!(url, "https://www.gravatar.com/avatar/?d=mp&s=80");

        let url = CommentWithAuthor::gravatar_url(&Some(String::new()));
        assert_eq!(url, "https://www.gravatar.com/avatar/?d=mp&s=80");
    }
}
