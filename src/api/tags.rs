//! Tag API endpoints
//!
//! - GET /api/v1/tags - List all tags
//! - GET /api/v1/tags/{slug}/posts - Posts carrying a tag, paginated

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::api::middleware::{ApiError, AppState};
use crate::api::posts::{to_post_response, ListPostsQuery};
use crate::api::responses::{PaginatedPostsResponse, TagInfo};
use crate::models::ListParams;

/// Build the tags router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tags))
        .route("/{slug}/posts", get(get_tag_posts))
}

/// GET /api/v1/tags - List all tags
async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<TagInfo>>, ApiError> {
    let tags = state.tag_service.list().await?;
    Ok(Json(tags.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/tags/{slug}/posts - Posts carrying the tag
async fn get_tag_posts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<PaginatedPostsResponse>, ApiError> {
    let params = ListParams::new(query.page, query.page_size);
    let (_tag, result) = state.post_service.list_by_tag_slug(&slug, &params).await?;

    let total = result.total;
    let page = result.page;
    let page_size = result.per_page;
    let total_pages = result.total_pages();

    let mut posts = Vec::with_capacity(result.items.len());
    for post in result.items {
        posts.push(to_post_response(&state, post).await?);
    }

    Ok(Json(PaginatedPostsResponse {
        posts,
        total,
        page,
        page_size,
        total_pages,
    }))
}
