//! User model - project-scoped user accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::authority::Authority;

const UNIVERSAL_DELIMITER: char = '$';

/// Composite user key: local identifier within a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId {
    pub local_id: String,
    pub project_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserIdError {
    #[error("ID and Project ID can't be blank")]
    Blank,

    #[error("Invalid project ID: {0}")]
    InvalidProjectId(String),

    #[error("Inconsistent user ID: {0}")]
    Inconsistent(String),
}

impl UserId {
    pub fn new(local_id: impl Into<String>, project_id: i64) -> Self {
        Self {
            local_id: local_id.into(),
            project_id,
        }
    }

    /// Boundary encoding: `<local_id>$<project_id>`.
    pub fn to_universal(&self) -> String {
        format!("{}{}{}", self.local_id, UNIVERSAL_DELIMITER, self.project_id)
    }

    /// Parse the boundary encoding.
    ///
    /// The project id is taken after the last delimiter, so local ids may
    /// themselves contain the delimiter.
    pub fn from_universal(universal: &str) -> Result<Self, UserIdError> {
        let (local_id, project_id) = universal
            .rsplit_once(UNIVERSAL_DELIMITER)
            .ok_or(UserIdError::Blank)?;
        let (local_id, project_id) = (local_id.trim(), project_id.trim());
        if local_id.is_empty() || project_id.is_empty() {
            return Err(UserIdError::Blank);
        }

        let project_id = project_id
            .parse()
            .map_err(|_| UserIdError::InvalidProjectId(project_id.to_string()))?;

        Ok(Self::new(local_id, project_id))
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_universal())
    }
}

impl std::str::FromStr for UserId {
    type Err = UserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_universal(s)
    }
}

/// User entity (project-scoped).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub authority: Authority,
    /// Pending verification token; present means the user is unverified.
    pub verification_token: Option<String>,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a verified user.
    pub fn new(id: UserId, authority: Authority) -> Self {
        Self {
            id,
            authority,
            verification_token: None,
            name: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_verification_token(mut self, token: impl Into<String>) -> Self {
        self.verification_token = Some(token.into());
        self
    }

    pub fn project_id(&self) -> i64 {
        self.id.project_id
    }

    pub fn is_verified(&self) -> bool {
        self.verification_token.is_none()
    }
}
