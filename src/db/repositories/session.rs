//! Session repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::models::Session;

/// Session repository trait
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Create a new session
    async fn create(&self, session: &Session) -> Result<Session>;

    /// Get session by ID (token)
    async fn get_by_id(&self, id: &str) -> Result<Option<Session>>;

    /// Delete a session
    async fn delete(&self, id: &str) -> Result<()>;

    /// Delete expired sessions
    async fn delete_expired(&self) -> Result<i64>;
}

/// SQLx-based session repository implementation
pub struct SqlxSessionRepository {
    pool: SqlitePool,
}

impl SqlxSessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for SqlxSessionRepository {
    async fn create(&self, session: &Session) -> Result<Session> {
        sqlx::query(
            r#"INSERT INTO sessions (id, user_id, expires_at, created_at)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(&session.id)
        .bind(session.user_id)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert session")?;

        Ok(session.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Session>> {
        let row = sqlx::query("SELECT * FROM sessions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get session")?;

        Ok(row.map(|r| Session {
            id: r.get("id"),
            user_id: r.get("user_id"),
            expires_at: r.get("expires_at"),
            created_at: r.get("created_at"),
        }))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete session")?;
        Ok(())
    }

    async fn delete_expired(&self) -> Result<i64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
            .bind(chrono::Utc::now())
            .execute(&self.pool)
            .await
            .context("Failed to delete expired sessions")?;
        Ok(result.rows_affected() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use crate::db::repositories::{SqlxUserRepository, UserRepository};
    use crate::models::User;
    use chrono::{Duration, Utc};

    async fn setup() -> (SqlxSessionRepository, i64) {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();

        let users = SqlxUserRepository::new(pool.clone());
        let user = users
            .create(&User::new("tester".to_string(), None, "hash".to_string()))
            .await
            .unwrap();

        (SqlxSessionRepository::new(pool), user.id)
    }

    #[tokio::test]
    async fn test_create_get_delete_session() {
        let (repo, user_id) = setup().await;
        let session = Session {
            id: "token-1".to_string(),
            user_id,
            expires_at: Utc::now() + Duration::days(7),
            created_at: Utc::now(),
        };

        repo.create(&session).await.unwrap();
        let found = repo.get_by_id("token-1").await.unwrap().unwrap();
        assert_eq!(found.user_id, user_id);
        assert!(!found.is_expired());

        repo.delete("token-1").await.unwrap();
        assert!(repo.get_by_id("token-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_expired_sessions() {
        let (repo, user_id) = setup().await;
        let expired = Session {
            id: "old".to_string(),
            user_id,
            expires_at: Utc::now() - Duration::days(1),
            created_at: Utc::now() - Duration::days(8),
        };
        let valid = Session {
            id: "new".to_string(),
            user_id,
            expires_at: Utc::now() + Duration::days(7),
            created_at: Utc::now(),
        };
        repo.create(&expired).await.unwrap();
        repo.create(&valid).await.unwrap();

        let removed = repo.delete_expired().await.unwrap();
        assert_eq!(removed, 1);
        assert!(repo.get_by_id("new").await.unwrap().is_some());
    }
}
