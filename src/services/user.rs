//! User service
//!
//! Implements business logic for user management:
//! - Registration with password confirmation check
//! - Login/logout with opaque session tokens
//! - Session validation for the auth middleware

use crate::db::repositories::{SessionRepository, UserRepository};
use crate::models::{Session, User};
use crate::services::password::{hash_password, verify_password};
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Default session expiration time in days
const DEFAULT_SESSION_EXPIRATION_DAYS: i64 = 7;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Authentication failed (invalid credentials)
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// User already exists
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Input for user registration
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
    /// Confirmation password; must equal `password`
    pub password2: String,
    pub email: Option<String>,
}

impl RegisterInput {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        password2: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            password2: password2.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Input for user login
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

impl LoginInput {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// User service for managing users and authentication
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    session_expiration_days: i64,
}

impl UserService {
    /// Create a new user service with the given repositories
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            session_expiration_days: DEFAULT_SESSION_EXPIRATION_DAYS,
        }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if the username is empty or the confirmation
    ///   password does not match
    /// - `UserExists` if the username is already taken
    /// - `InternalError` for database errors
    pub async fn register(&self, input: RegisterInput) -> Result<User, UserServiceError> {
        let username = input.username.trim();
        if username.is_empty() {
            return Err(UserServiceError::ValidationError(
                "Username must not be empty".to_string(),
            ));
        }
        if input.password.is_empty() {
            return Err(UserServiceError::ValidationError(
                "Password must not be empty".to_string(),
            ));
        }
        if input.password != input.password2 {
            return Err(UserServiceError::ValidationError(
                "Passwords do not match".to_string(),
            ));
        }

        if self
            .user_repo
            .get_by_username(username)
            .await
            .context("Failed to check username")?
            .is_some()
        {
            return Err(UserServiceError::UserExists(format!(
                "Username '{}' is already taken",
                username
            )));
        }

        let password_hash = hash_password(&input.password).context("Failed to hash password")?;

        let user = User::new(username.to_string(), input.email, password_hash);

        let created = self
            .user_repo
            .create(&user)
            .await
            .context("Failed to create user")?;

        tracing::info!(user_id = created.id, username = %created.username, "User registered");

        Ok(created)
    }

    /// Login with credentials.
    ///
    /// Validates the provided credentials and creates a new session if
    /// valid.
    ///
    /// # Errors
    ///
    /// - `AuthenticationError` if credentials are invalid
    /// - `InternalError` for database errors
    pub async fn login(&self, input: LoginInput) -> Result<Session, UserServiceError> {
        let user = self
            .user_repo
            .get_by_username(input.username.trim())
            .await
            .context("Failed to look up user")?
            .ok_or_else(|| {
                UserServiceError::AuthenticationError(
                    "Invalid username or password".to_string(),
                )
            })?;

        let password_valid = verify_password(&input.password, &user.password_hash)
            .context("Failed to verify password")?;

        if !password_valid {
            return Err(UserServiceError::AuthenticationError(
                "Invalid username or password".to_string(),
            ));
        }

        // Opportunistic cleanup of stale sessions
        let removed = self
            .session_repo
            .delete_expired()
            .await
            .context("Failed to clean up expired sessions")?;
        if removed > 0 {
            tracing::debug!(removed, "Removed expired sessions");
        }

        self.create_session(user.id).await
    }

    /// Logout (invalidate session)
    pub async fn logout(&self, session_id: &str) -> Result<(), UserServiceError> {
        self.session_repo
            .delete(session_id)
            .await
            .context("Failed to delete session")?;
        Ok(())
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        let user = self
            .user_repo
            .get_by_id(id)
            .await
            .context("Failed to get user by ID")?;
        Ok(user)
    }

    /// Validate a session token and return the associated user.
    ///
    /// Expired sessions are removed as a side effect and treated as
    /// missing.
    pub async fn validate_session(&self, token: &str) -> Result<Option<User>, UserServiceError> {
        let session = match self
            .session_repo
            .get_by_id(token)
            .await
            .context("Failed to look up session")?
        {
            Some(session) => session,
            None => return Ok(None),
        };

        if session.is_expired() {
            self.session_repo
                .delete(&session.id)
                .await
                .context("Failed to delete expired session")?;
            return Ok(None);
        }

        let user = self
            .user_repo
            .get_by_id(session.user_id)
            .await
            .context("Failed to load session user")?;

        Ok(user)
    }

    /// Create a fresh session for a user without credential checks.
    /// Used after registration; login performs its own verification.
    pub async fn create_session(&self, user_id: i64) -> Result<Session, UserServiceError> {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().simple().to_string(),
            user_id,
            expires_at: now + Duration::days(self.session_expiration_days),
            created_at: now,
        };

        let created = self
            .session_repo
            .create(&session)
            .await
            .context("Failed to create session")?;

        Ok(created)
    }
}
