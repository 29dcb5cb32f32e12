//! Post API endpoints
//!
//! - GET /api/v1/posts - List posts with optional search, paginated
//! - GET /api/v1/posts/latest - Most recent posts
//! - GET /api/v1/posts/{slug} - Post detail
//! - POST /api/v1/posts - Create post (auth)
//! - PUT /api/v1/posts/{slug} - Update post (auth, author only)
//! - DELETE /api/v1/posts/{slug} - Delete post (auth, author only)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::api::responses::{PaginatedPostsResponse, PostResponse};
use crate::models::{CreatePostInput, ListParams, Post, UpdatePostInput, DEFAULT_PAGE_SIZE};

/// Query parameters for listing posts
#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    /// Search term matched against content and heading
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Assemble the full response for a post: author username plus tags.
pub(crate) async fn to_post_response(
    state: &AppState,
    post: Post,
) -> Result<PostResponse, ApiError> {
    let tags = state.post_service.tags_of(post.id).await?;
    let author = state
        .user_service
        .get_by_id(post.author_id)
        .await?
        .map(|u| u.username)
        .unwrap_or_default();
    Ok(PostResponse::from_parts(post, author, tags))
}

async fn to_post_responses(
    state: &AppState,
    posts: Vec<Post>,
) -> Result<Vec<PostResponse>, ApiError> {
    let mut responses = Vec::with_capacity(posts.len());
    for post in posts {
        responses.push(to_post_response(state, post).await?);
    }
    Ok(responses)
}

/// GET /api/v1/posts - List posts, newest first
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<PaginatedPostsResponse>, ApiError> {
    let params = ListParams::new(query.page, query.page_size);
    let result = state
        .post_service
        .list(query.search.as_deref(), &params)
        .await?;

    let total = result.total;
    let page = result.page;
    let page_size = result.per_page;
    let total_pages = result.total_pages();
    let posts = to_post_responses(&state, result.items).await?;

    Ok(Json(PaginatedPostsResponse {
        posts,
        total,
        page,
        page_size,
        total_pages,
    }))
}

/// GET /api/v1/posts/latest - Most recently published posts
pub async fn latest_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = state.post_service.latest().await?;
    Ok(Json(to_post_responses(&state, posts).await?))
}

/// GET /api/v1/posts/{slug} - Post detail
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state.post_service.get_by_slug(&slug).await?;
    Ok(Json(to_post_response(&state, post).await?))
}

/// POST /api/v1/posts - Create a post
pub async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(input): Json<CreatePostInput>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let post = state.post_service.create(input, user.0.id).await?;
    let response = to_post_response(&state, post).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /api/v1/posts/{slug} - Update a post
pub async fn update_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(input): Json<UpdatePostInput>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state.post_service.update(&slug, input, user.0.id).await?;
    Ok(Json(to_post_response(&state, post).await?))
}

/// DELETE /api/v1/posts/{slug} - Delete a post
pub async fn delete_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<StatusCode, ApiError> {
    state.post_service.delete(&slug, user.0.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
