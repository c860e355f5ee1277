use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::time::Duration;

use crate::models::UserProfile;
use crate::services::store::{StoreError, UserStore};

/// PostgreSQL-backed user store
///
/// Holds the `users` table (id, email, bio, interests). Migrations run when
/// the client is created.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

fn user_from_row(row: &PgRow) -> UserProfile {
    UserProfile {
        id: row.get("id"),
        email: row.get("email"),
        bio: row.get("bio"),
        interests: row.get("interests"),
    }
}

#[async_trait]
impl UserStore for PostgresClient {
    async fn add_user(&self, user: &UserProfile) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO users (id, email, bio, interests)
            VALUES ($1, $2, $3, $4)
        "#;

        let result = sqlx::query(query)
            .bind(&user.id)
            .bind(&user.email)
            .bind(&user.bio)
            .bind(&user.interests)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {
                tracing::debug!("Stored user {}", user.id);
                Ok(())
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(StoreError::Conflict(
                format!("User {} or email {} already exists", user.id, user.email),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_user(&self, id: &str) -> Result<UserProfile, StoreError> {
        let query = r#"
            SELECT id, email, bio, interests
            FROM users
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("User {} not found", id)))?;

        Ok(user_from_row(&row))
    }

    async fn get_users(&self, ids: &[String]) -> Result<Vec<UserProfile>, StoreError> {
        let query = r#"
            SELECT id, email, bio, interests
            FROM users
            WHERE id = ANY($1)
        "#;

        let rows = sqlx::query(query).bind(ids).fetch_all(&self.pool).await?;

        let mut by_id: HashMap<String, UserProfile> = rows
            .iter()
            .map(|row| {
                let user = user_from_row(row);
                (user.id.clone(), user)
            })
            .collect();

        tracing::debug!("Fetched {} of {} requested users", by_id.len(), ids.len());

        ids.iter()
            .map(|id| {
                by_id
                    .remove(id)
                    .ok_or_else(|| StoreError::NotFound(format!("User {} not found", id)))
            })
            .collect()
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .unwrap_or_else(|e| {
                tracing::warn!("PostgreSQL health check failed: {}", e);
                false
            })
    }
}
