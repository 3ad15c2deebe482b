//! Domain models for the access engine.
//!
//! Authorities, privileges and features are plain ordered enums; their
//! behaviour lives in the static tables next to them so the decision rules
//! stay data-driven.

pub mod auth_context;
pub mod authority;
pub mod feature;
pub mod privilege;
pub mod project;
pub mod token;
pub mod user;

pub use auth_context::AuthContext;
pub use authority::Authority;
pub use feature::{feature_rule, Feature, FeatureRule, Integration, FEATURE_RULES};
pub use privilege::{privilege_rule, Privilege, PrivilegeRule, SelfAccess, PRIVILEGE_RULES};
pub use project::{
    EmailConfig, Project, ProjectIntegrations, ProjectState, ProjectStatus, PushConfig, SmsConfig,
};
pub use token::{Token, TokenClaims, TokenCreator, TokenFilter, TokenMetadata};
pub use user::{User, UserId, UserIdError};
