use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::UserProfile;

/// Errors that can occur when reading or writing users
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Relational store holding user profiles
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user; an existing id or email is a `Conflict`
    async fn add_user(&self, user: &UserProfile) -> Result<(), StoreError>;

    async fn get_user(&self, id: &str) -> Result<UserProfile, StoreError>;

    /// Fetch users in the requested order; any unknown id is `NotFound`
    async fn get_users(&self, ids: &[String]) -> Result<Vec<UserProfile>, StoreError>;

    async fn health_check(&self) -> bool;
}

/// Process-local user store
///
/// Used when no database URL is configured, and in tests.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserProfile>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn add_user(&self, user: &UserProfile) -> Result<(), StoreError> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.id) {
            return Err(StoreError::Conflict(format!("User {} already exists", user.id)));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!("Email {} already registered", user.email)));
        }

        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn get_user(&self, id: &str) -> Result<UserProfile, StoreError> {
        self.users
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("User {} not found", id)))
    }

    async fn get_users(&self, ids: &[String]) -> Result<Vec<UserProfile>, StoreError> {
        let users = self.users.read().await;

        ids.iter()
            .map(|id| {
                users
                    .get(id)
                    .cloned()
                    .ok_or_else(|| StoreError::NotFound(format!("User {} not found", id)))
            })
            .collect()
    }

    async fn health_check(&self) -> bool {
        true
    }
}
