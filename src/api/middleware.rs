//! API middleware
//!
//! Shared application state, the API error envelope, and the session
//! authentication middleware.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::User;
use crate::services::{
    CommentService, CommentServiceError, EmailService, EmailServiceError, PostService,
    PostServiceError, TagService, TagServiceError, UserService, UserServiceError,
};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub post_service: Arc<PostService>,
    pub tag_service: Arc<TagService>,
    pub comment_service: Arc<CommentService>,
    pub email_service: Arc<EmailService>,
}

/// Authenticated user extracted from request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "FORBIDDEN" => StatusCode::FORBIDDEN,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "CONFLICT" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

impl From<UserServiceError> for ApiError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::AuthenticationError(msg) => ApiError::unauthorized(msg),
            UserServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            UserServiceError::UserExists(msg) => ApiError::conflict(msg),
            UserServiceError::InternalError(e) => {
                tracing::error!(error = %e, "User service error");
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

impl From<PostServiceError> for ApiError {
    fn from(err: PostServiceError) -> Self {
        match err {
            PostServiceError::NotFound(slug) => {
                ApiError::not_found(format!("Post not found: {}", slug))
            }
            PostServiceError::TagNotFound(slug) => {
                ApiError::not_found(format!("Tag not found: {}", slug))
            }
            PostServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            PostServiceError::Forbidden(msg) => ApiError::forbidden(msg),
            PostServiceError::InternalError(e) => {
                tracing::error!(error = %e, "Post service error");
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

impl From<TagServiceError> for ApiError {
    fn from(err: TagServiceError) -> Self {
        match err {
            TagServiceError::NotFound(slug) => {
                ApiError::not_found(format!("Tag not found: {}", slug))
            }
            TagServiceError::InternalError(e) => {
                tracing::error!(error = %e, "Tag service error");
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

impl From<CommentServiceError> for ApiError {
    fn from(err: CommentServiceError) -> Self {
        match err {
            CommentServiceError::PostNotFound(slug) => {
                ApiError::not_found(format!("Post not found: {}", slug))
            }
            CommentServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            CommentServiceError::InternalError(e) => {
                tracing::error!(error = %e, "Comment service error");
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

impl From<EmailServiceError> for ApiError {
    fn from(err: EmailServiceError) -> Self {
        match err {
            EmailServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            EmailServiceError::DeliveryError(e) => {
                tracing::error!(error = %e, "Email delivery error");
                ApiError::internal_error("Failed to send message")
            }
        }
    }
}

/// Extract a session token from the Authorization header or the session
/// cookie.
pub fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    if let Some(cookie_header) = headers.get(header::COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                let cookie = cookie.trim();
                if let Some(token) = cookie.strip_prefix("session=") {
                    return Some(token.to_string());
                }
            }
        }
    }

    None
}

/// Authentication middleware
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token_from_headers(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;

    let user = state
        .user_service
        .validate_session(&token)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired session"))?;

    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}
