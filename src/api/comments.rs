//! Comment API endpoints
//!
//! - GET /api/v1/posts/{slug}/comments - Comments of a post
//! - POST /api/v1/posts/{slug}/comments - Add a comment (auth)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::api::responses::CommentResponse;
use crate::models::{CommentWithAuthor, CreateCommentInput};

/// GET /api/v1/posts/{slug}/comments - Comments of a post, oldest first
pub async fn get_comments(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let post_slug = slug.to_lowercase();
    let comments = state.comment_service.list_for_post(&post_slug).await?;
    Ok(Json(
        comments
            .into_iter()
            .map(|c| CommentResponse::from_comment(c, &post_slug))
            .collect(),
    ))
}

/// POST /api/v1/posts/{slug}/comments - Add a comment
pub async fn create_comment(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(input): Json<CreateCommentInput>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let post_slug = slug.to_lowercase();
    let comment = state
        .comment_service
        .create_for_post(&post_slug, user.0.id, input)
        .await?;

    let with_author = CommentWithAuthor {
        id: comment.id,
        post_id: comment.post_id,
        user_id: comment.user_id,
        username: user.0.username,
        text: comment.text,
        created_at: comment.created_at,
        avatar_url: CommentWithAuthor::gravatar_url(&user.0.email),
    };

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse::from_comment(with_author, &post_slug)),
    ))
}
