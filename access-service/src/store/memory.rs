use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ProjectStore, StoreError, TokenStore, UserStore};
use crate::models::{Project, Token, TokenFilter, User, UserId};

#[derive(Default)]
pub struct InMemoryUserStore {
    users: DashMap<UserId, User>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, user: User) {
        self.users.insert(user.id.clone(), user);
    }

    pub fn remove(&self, id: &UserId) -> Option<User> {
        self.users.remove(id).map(|(_, user)| user)
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn fetch_by_user_id(&self, id: &UserId) -> Result<User, StoreError> {
        self.users
            .get(id)
            .map(|user| user.clone())
            .ok_or_else(|| StoreError::NotFound(format!("User {}", id)))
    }
}

#[derive(Default)]
pub struct InMemoryProjectStore {
    projects: DashMap<i64, Project>,
    creators: DashMap<i64, User>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, project: Project) {
        self.projects.insert(project.id, project);
    }

    pub fn set_creator(&self, project_id: i64, creator: User) {
        self.creators.insert(project_id, creator);
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn fetch_by_id(&self, project_id: i64) -> Result<Project, StoreError> {
        self.projects
            .get(&project_id)
            .map(|project| project.clone())
            .ok_or_else(|| StoreError::NotFound(format!("Project {}", project_id)))
    }

    async fn fetch_creator_of(&self, project_id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.creators.get(&project_id).map(|creator| creator.clone()))
    }
}

/// Token store that counts writes, so idempotent paths can be asserted.
#[derive(Default)]
pub struct InMemoryTokenStore {
    tokens: DashMap<String, Token>,
    writes: AtomicUsize,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of write operations performed so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn insert(&self, token: &Token) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.tokens.insert(token.value.clone(), token.clone());
        Ok(())
    }

    async fn find(&self, value: &str) -> Result<Option<Token>, StoreError> {
        Ok(self.tokens.get(value).map(|token| token.clone()))
    }

    async fn find_many(&self, values: &[String]) -> Result<Vec<Token>, StoreError> {
        Ok(values
            .iter()
            .filter_map(|value| self.tokens.get(value).map(|token| token.clone()))
            .collect())
    }

    async fn find_for_owner(
        &self,
        owner_id: &UserId,
        filter: TokenFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<Token>, StoreError> {
        let mut tokens: Vec<Token> = self
            .tokens
            .iter()
            .filter(|entry| &entry.owner_id == owner_id && filter.matches(entry.value(), now))
            .map(|entry| entry.value().clone())
            .collect();
        tokens.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.value.cmp(&b.value)));
        Ok(tokens)
    }

    async fn mark_blocked(&self, values: &[String]) -> Result<Vec<Token>, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(values
            .iter()
            .filter_map(|value| {
                self.tokens.get_mut(value).map(|mut token| {
                    token.is_blocked = true;
                    token.clone()
                })
            })
            .collect())
    }
}
