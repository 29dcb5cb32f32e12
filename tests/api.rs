//! End-to-end API tests
//!
//! Each test spins up the full router against an in-memory SQLite
//! database and a recording mail transport.

use anyhow::Result;
use async_trait::async_trait;
use axum_test::TestServer;
use lettre::Message;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use inkpost::api::{build_router, AppState};
use inkpost::config::EmailConfig;
use inkpost::db::repositories::{
    SqlxCommentRepository, SqlxPostRepository, SqlxSessionRepository, SqlxTagRepository,
    SqlxUserRepository,
};
use inkpost::db::{create_test_pool, migrations};
use inkpost::services::{
    CommentService, EmailService, Mailer, PostService, TagService, UserService,
};

/// Mail transport that records messages instead of sending them
struct RecordingMailer {
    sent: Mutex<Vec<Message>>,
}

impl RecordingMailer {
    fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    fn last_rendered(&self) -> String {
        let sent = self.sent.lock().unwrap();
        String::from_utf8(sent.last().expect("no email sent").formatted()).unwrap()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: Message) -> Result<()> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

async fn test_server() -> (TestServer, Arc<RecordingMailer>) {
    let pool = create_test_pool().await.unwrap();
    migrations::run_migrations(&pool).await.unwrap();

    let user_repo = Arc::new(SqlxUserRepository::new(pool.clone()));
    let session_repo = Arc::new(SqlxSessionRepository::new(pool.clone()));
    let post_repo = Arc::new(SqlxPostRepository::new(pool.clone()));
    let tag_repo = Arc::new(SqlxTagRepository::new(pool.clone()));
    let comment_repo = Arc::new(SqlxCommentRepository::new(pool));

    let email_config = EmailConfig {
        smtp_from: "blog@example.com".to_string(),
        contact_recipient: "admin@example.com".to_string(),
        ..Default::default()
    };
    let mailer = Arc::new(RecordingMailer::new());

    let state = AppState {
        user_service: Arc::new(UserService::new(user_repo, session_repo)),
        post_service: Arc::new(PostService::new(post_repo.clone(), tag_repo.clone())),
        tag_service: Arc::new(TagService::new(tag_repo)),
        comment_service: Arc::new(CommentService::new(comment_repo, post_repo)),
        email_service: Arc::new(EmailService::new(mailer.clone(), &email_config)),
    };

    let server = TestServer::new(build_router(state, "http://localhost:3000")).unwrap();
    (server, mailer)
}

/// Register a user and return a session token
async fn login_as(server: &TestServer, username: &str) -> String {
    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "username": username,
            "password": "s3cret-pw",
            "password2": "s3cret-pw",
            "email": format!("{}@example.com", username),
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "username": username, "password": "s3cret-pw" }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["token"].as_str().unwrap().to_string()
}

async fn create_post(server: &TestServer, token: &str, title: &str, tags: &[&str]) -> Value {
    let response = server
        .post("/api/v1/posts")
        .authorization_bearer(token)
        .json(&json!({
            "h1": title,
            "title": title,
            "description": "teaser",
            "content": format!("Body of {}", title),
            "tags": tags,
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}

#[tokio::test]
async fn register_returns_usable_session() {
    let (server, _mailer) = test_server().await;

    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "username": "alice",
            "password": "pw",
            "password2": "pw",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body = response.json::<Value>();
    assert_eq!(body["user"]["username"], "alice");

    let token = body["token"].as_str().unwrap();
    server
        .get("/api/v1/auth/profile")
        .authorization_bearer(token)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn register_rejects_password_mismatch() {
    let (server, _mailer) = test_server().await;

    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "username": "alice",
            "password": "one",
            "password2": "two",
        }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn register_rejects_duplicate_username() {
    let (server, _mailer) = test_server().await;
    login_as(&server, "alice").await;

    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "username": "alice",
            "password": "pw",
            "password2": "pw",
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn profile_requires_auth() {
    let (server, _mailer) = test_server().await;

    let response = server.get("/api/v1/auth/profile").await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);

    let token = login_as(&server, "alice").await;
    let response = server
        .get("/api/v1/auth/profile")
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["username"], "alice");
    // Password hash must never leak
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn logout_invalidates_token() {
    let (server, _mailer) = test_server().await;
    let token = login_as(&server, "alice").await;

    server
        .post("/api/v1/auth/logout")
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    let response = server
        .get("/api/v1/auth/profile")
        .authorization_bearer(&token)
        .await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_token_works_via_cookie() {
    let (server, _mailer) = test_server().await;
    let token = login_as(&server, "alice").await;

    let response = server
        .get("/api/v1/auth/profile")
        .add_header(
            axum::http::header::COOKIE,
            format!("session={}", token)
                .parse::<axum::http::HeaderValue>()
                .unwrap(),
        )
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn post_creation_requires_auth() {
    let (server, _mailer) = test_server().await;

    let response = server
        .post("/api/v1/posts")
        .json(&json!({ "h1": "X", "title": "X", "content": "body" }))
        .await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn post_listing_paginates_two_per_page() {
    let (server, _mailer) = test_server().await;
    let token = login_as(&server, "writer").await;

    for n in 1..=5 {
        create_post(&server, &token, &format!("Post {}", n), &[]).await;
    }

    let response = server.get("/api/v1/posts").await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["posts"].as_array().unwrap().len(), 2);
    assert_eq!(body["total"], 5);
    assert_eq!(body["page_size"], 2);
    assert_eq!(body["total_pages"], 3);
    // Newest first
    assert_eq!(body["posts"][0]["title"], "Post 5");

    let response = server.get("/api/v1/posts").add_query_param("page", 3).await;
    let body = response.json::<Value>();
    assert_eq!(body["posts"].as_array().unwrap().len(), 1);

    // Page size can be overridden
    let response = server
        .get("/api/v1/posts")
        .add_query_param("page_size", 10)
        .await;
    let body = response.json::<Value>();
    assert_eq!(body["posts"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn post_listing_tolerates_huge_page_numbers() {
    let (server, _mailer) = test_server().await;
    let token = login_as(&server, "writer").await;
    create_post(&server, &token, "Only One", &[]).await;

    let response = server
        .get("/api/v1/posts")
        .add_query_param("page", u32::MAX)
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["posts"].as_array().unwrap().len(), 0);
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn post_search_matches_content_and_heading() {
    let (server, _mailer) = test_server().await;
    let token = login_as(&server, "writer").await;

    create_post(&server, &token, "Ferrous metallurgy", &[]).await;
    create_post(&server, &token, "Gardening", &[]).await;

    let response = server
        .get("/api/v1/posts")
        .add_query_param("search", "ferrous")
        .await;
    let body = response.json::<Value>();
    assert_eq!(body["total"], 1);
    assert_eq!(body["posts"][0]["title"], "Ferrous metallurgy");
}

#[tokio::test]
async fn post_detail_includes_author_and_tags() {
    let (server, _mailer) = test_server().await;
    let token = login_as(&server, "writer").await;

    let created = create_post(&server, &token, "Tagged Post", &["Rust", "Web"]).await;
    assert_eq!(created["slug"], "tagged-post");

    let response = server.get("/api/v1/posts/tagged-post").await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["author"], "writer");
    // Tags are serialized as a list of names
    let tags = body["tags"].as_array().unwrap();
    assert_eq!(tags.len(), 2);
    assert!(tags.contains(&json!("Rust")));
    assert!(tags.contains(&json!("Web")));

    // Post slugs resolve case-insensitively
    let response = server.get("/api/v1/posts/Tagged-Post").await;
    response.assert_status_ok();

    let response = server.get("/api/v1/posts/missing").await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn latest_returns_two_newest_posts() {
    let (server, _mailer) = test_server().await;
    let token = login_as(&server, "writer").await;

    for n in 1..=3 {
        create_post(&server, &token, &format!("Post {}", n), &[]).await;
    }

    let response = server.get("/api/v1/posts/latest").await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    let posts = body.as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["title"], "Post 3");
    assert_eq!(posts[1]["title"], "Post 2");
}

#[tokio::test]
async fn only_author_can_modify_post() {
    let (server, _mailer) = test_server().await;
    let author_token = login_as(&server, "author").await;
    let other_token = login_as(&server, "other").await;

    create_post(&server, &author_token, "Mine", &[]).await;

    let response = server
        .put("/api/v1/posts/mine")
        .authorization_bearer(&other_token)
        .json(&json!({ "title": "Hijacked" }))
        .await;
    response.assert_status(axum::http::StatusCode::FORBIDDEN);

    let response = server
        .delete("/api/v1/posts/mine")
        .authorization_bearer(&other_token)
        .await;
    response.assert_status(axum::http::StatusCode::FORBIDDEN);

    let response = server
        .put("/api/v1/posts/mine")
        .authorization_bearer(&author_token)
        .json(&json!({ "title": "Renamed" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["title"], "Renamed");

    let response = server
        .delete("/api/v1/posts/mine")
        .authorization_bearer(&author_token)
        .await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);
    server
        .get("/api/v1/posts/mine")
        .await
        .assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn tag_listing_and_filtering() {
    let (server, _mailer) = test_server().await;
    let token = login_as(&server, "writer").await;

    create_post(&server, &token, "First", &["Rust"]).await;
    create_post(&server, &token, "Second", &["Rust", "Web Dev"]).await;
    create_post(&server, &token, "Third", &[]).await;

    let response = server.get("/api/v1/tags").await;
    response.assert_status_ok();
    let tags = response.json::<Value>();
    assert_eq!(tags.as_array().unwrap().len(), 2);

    let response = server.get("/api/v1/tags/rust/posts").await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["total"], 2);

    // Tag slugs resolve case-insensitively
    let response = server.get("/api/v1/tags/Web-Dev/posts").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["total"], 1);

    let response = server.get("/api/v1/tags/ghost/posts").await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comments_require_auth_and_are_post_scoped() {
    let (server, _mailer) = test_server().await;
    let token = login_as(&server, "writer").await;

    create_post(&server, &token, "First", &[]).await;
    create_post(&server, &token, "Second", &[]).await;

    // Unauthenticated comment is rejected
    let response = server
        .post("/api/v1/posts/first/comments")
        .json(&json!({ "text": "anonymous" }))
        .await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);

    let response = server
        .post("/api/v1/posts/first/comments")
        .authorization_bearer(&token)
        .json(&json!({ "text": "Great read" }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    // Reading comments is public
    let response = server.get("/api/v1/posts/first/comments").await;
    response.assert_status_ok();
    let comments = response.json::<Value>();
    assert_eq!(comments.as_array().unwrap().len(), 1);
    assert_eq!(comments[0]["username"], "writer");
    // The parent post is exposed by slug
    assert_eq!(comments[0]["post"], "first");
    assert!(comments[0]["created_date"].as_str().is_some());
    assert!(comments[0]["avatar_url"]
        .as_str()
        .unwrap()
        .contains("gravatar.com"));

    // The other post has no comments
    let response = server.get("/api/v1/posts/second/comments").await;
    assert_eq!(response.json::<Value>().as_array().unwrap().len(), 0);

    // Empty text is rejected
    let response = server
        .post("/api/v1/posts/first/comments")
        .authorization_bearer(&token)
        .json(&json!({ "text": "   " }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    // Commenting on a missing post is a 404
    let response = server
        .post("/api/v1/posts/ghost/comments")
        .authorization_bearer(&token)
        .json(&json!({ "text": "hello" }))
        .await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn contact_form_dispatches_exactly_one_email() {
    let (server, mailer) = test_server().await;

    let response = server
        .post("/api/v1/contact")
        .json(&json!({
            "name": "Alice",
            "email": "alice@example.com",
            "subject": "Question",
            "message": "How do I subscribe?",
        }))
        .await;
    response.assert_status_ok();

    assert_eq!(mailer.sent_count(), 1);
    let rendered = mailer.last_rendered();
    assert!(rendered.contains("Subject: From Alice | Question"));
    assert!(rendered.contains("Reply-To: alice@example.com"));
    assert!(rendered.contains("To: admin@example.com"));
}

#[tokio::test]
async fn contact_form_rejects_incomplete_submission() {
    let (server, mailer) = test_server().await;

    let response = server
        .post("/api/v1/contact")
        .json(&json!({
            "name": "Alice",
            "email": "alice@example.com",
            "subject": "",
            "message": "hi",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(mailer.sent_count(), 0);
}
