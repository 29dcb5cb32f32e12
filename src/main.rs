//! Inkpost - a lightweight blog backend

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inkpost::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{
            SqlxCommentRepository, SqlxPostRepository, SqlxSessionRepository, SqlxTagRepository,
            SqlxUserRepository, UserRepository,
        },
    },
    services::{
        CommentService, EmailService, PostService, SmtpMailer, TagService, UserService,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkpost=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Inkpost blog backend...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected");

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create repositories
    let user_repo = Arc::new(SqlxUserRepository::new(pool.clone()));
    let session_repo = Arc::new(SqlxSessionRepository::new(pool.clone()));
    let post_repo = Arc::new(SqlxPostRepository::new(pool.clone()));
    let tag_repo = Arc::new(SqlxTagRepository::new(pool.clone()));
    let comment_repo = Arc::new(SqlxCommentRepository::new(pool.clone()));

    let user_count = user_repo.count().await?;
    tracing::info!(users = user_count, "User accounts loaded");

    // Initialize services
    let user_service = Arc::new(UserService::new(user_repo, session_repo));
    let post_service = Arc::new(PostService::new(post_repo.clone(), tag_repo.clone()));
    let tag_service = Arc::new(TagService::new(tag_repo));
    let comment_service = Arc::new(CommentService::new(comment_repo, post_repo));

    let mailer = Arc::new(SmtpMailer::from_config(&config.email)?);
    let email_service = Arc::new(EmailService::new(mailer, &config.email));

    let state = AppState {
        user_service,
        post_service,
        tag_service,
        comment_service,
        email_service,
    };

    let app = api::build_router(state, &config.server.cors_origin);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
