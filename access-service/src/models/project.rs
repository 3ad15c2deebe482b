//! Project model - the tenant that owns users and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::feature::{Feature, Integration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Review,
    Active,
    Blocked,
    Suspended,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Review => "review",
            ProjectStatus::Active => "active",
            ProjectStatus::Blocked => "blocked",
            ProjectStatus::Suspended => "suspended",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailConfig {
    pub api_key: String,
    pub domain: String,
    pub sender_name: String,
    pub sender_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub default_sender: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushConfig {
    pub project_name: String,
    pub service_account_key: String,
}

/// Optional provider settings; each is either present or absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectIntegrations {
    pub email: Option<EmailConfig>,
    pub sms: Option<SmsConfig>,
    pub push: Option<PushConfig>,
}

impl ProjectIntegrations {
    pub fn has(&self, integration: Integration) -> bool {
        match integration {
            Integration::Email => self.email.is_some(),
            Integration::Sms => self.sms.is_some(),
            Integration::Push => self.push.is_some(),
        }
    }
}

/// Project entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub status: ProjectStatus,
    pub on_hold: bool,
    pub anyone_can_search: bool,
    pub integrations: ProjectIntegrations,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Create an active project with no integrations configured.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: ProjectStatus::Active,
            on_hold: false,
            anyone_can_search: false,
            integrations: ProjectIntegrations::default(),
            created_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ProjectStatus::Active
    }
}

/// Feature readiness computed for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectState {
    pub project: Project,
    pub usable_features: Vec<Feature>,
    pub unusable_features: Vec<Feature>,
}

impl ProjectState {
    pub fn is_usable(&self, feature: Feature) -> bool {
        self.usable_features.contains(&feature)
    }
}
