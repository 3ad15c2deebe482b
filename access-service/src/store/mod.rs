//! Storage collaborators consumed by the access engine.
//!
//! The engine only sees these traits; persistence technology lives behind
//! them. [`memory`] provides the in-process implementations used by tests
//! and local runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Project, Token, TokenFilter, User, UserId};

pub mod memory;

pub use memory::{InMemoryProjectStore, InMemoryTokenStore, InMemoryUserStore};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `NotFound` when the user does not exist.
    async fn fetch_by_user_id(&self, id: &UserId) -> Result<User, StoreError>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Fails with `NotFound` when the project does not exist.
    async fn fetch_by_id(&self, project_id: i64) -> Result<Project, StoreError>;

    /// The creator-project user administering `project_id`, if any.
    ///
    /// Called with the creator project's own id, this yields the
    /// super-creator.
    async fn fetch_creator_of(&self, project_id: i64) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn insert(&self, token: &Token) -> Result<(), StoreError>;

    async fn find(&self, value: &str) -> Result<Option<Token>, StoreError>;

    /// Records for the given values; unknown values are skipped.
    async fn find_many(&self, values: &[String]) -> Result<Vec<Token>, StoreError>;

    async fn find_for_owner(
        &self,
        owner_id: &UserId,
        filter: TokenFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<Token>, StoreError>;

    /// Set `is_blocked` on every listed record in one write and return them.
    ///
    /// Never clears the flag, so concurrent callers cannot resurrect a token.
    async fn mark_blocked(&self, values: &[String]) -> Result<Vec<Token>, StoreError>;
}
