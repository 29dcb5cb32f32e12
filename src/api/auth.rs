//! Auth API endpoints
//!
//! - POST /api/v1/auth/register - Create an account
//! - POST /api/v1/auth/login - Exchange credentials for a session token
//! - POST /api/v1/auth/logout - Invalidate the current session (auth)
//! - GET /api/v1/auth/profile - Current user profile (auth)

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::AppendHeaders,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{
    session_token_from_headers, ApiError, AppState, AuthenticatedUser,
};
use crate::api::responses::{MessageResponse, UserResponse};
use crate::services::{LoginInput, RegisterInput};

/// Request body for registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub password2: String,
    pub email: Option<String>,
}

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response for a successful registration or login
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: String,
    pub user: UserResponse,
}

/// Session cookie mirroring the token in the JSON body
fn session_cookie(token: &str) -> String {
    format!(
        "session={}; Path=/; HttpOnly; SameSite=Lax; Max-Age=604800",
        token
    )
}

/// Routes that do not require authentication
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Routes behind the auth middleware
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/profile", get(profile))
}

/// POST /api/v1/auth/register - Create an account and start a session
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let mut input = RegisterInput::new(request.username, request.password, request.password2);
    if let Some(email) = request.email {
        input = input.with_email(email);
    }

    let user = state.user_service.register(input).await?;
    let session = state.user_service.create_session(user.id).await?;

    Ok((
        StatusCode::CREATED,
        AppendHeaders([(header::SET_COOKIE, session_cookie(&session.id))]),
        Json(SessionResponse {
            token: session.id,
            expires_at: session.expires_at.to_rfc3339(),
            user: user.into(),
        }),
    ))
}

/// POST /api/v1/auth/login - Exchange credentials for a session token
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let session = state
        .user_service
        .login(LoginInput::new(request.username, request.password))
        .await?;

    let user = state
        .user_service
        .get_by_id(session.user_id)
        .await?
        .ok_or_else(|| ApiError::internal_error("Session user missing"))?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, session_cookie(&session.id))]),
        Json(SessionResponse {
            token: session.id,
            expires_at: session.expires_at.to_rfc3339(),
            user: user.into(),
        }),
    ))
}

/// POST /api/v1/auth/logout - Invalidate the current session
async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    // require_auth already validated the token; re-read it for deletion
    if let Some(token) = session_token_from_headers(&headers) {
        state.user_service.logout(&token).await?;
    }
    Ok(Json(MessageResponse::new("Logged out")))
}

/// GET /api/v1/auth/profile - Current user profile
async fn profile(
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(user.0.into()))
}
