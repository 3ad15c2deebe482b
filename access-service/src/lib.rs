//! Authorization and token-validity engine for a multi-tenant backend.
//!
//! Callers present an [`AuthContext`] to the [`AccessManager`], which
//! validates the token through the [`TokenAuthority`] and applies tenant
//! isolation, rank and creator rules against live store data.

pub mod config;
pub mod models;
pub mod services;
pub mod store;

use service_core::error::AppError;
use std::sync::Arc;

pub use config::AccessConfig;
pub use models::AuthContext;
pub use services::{AccessManager, ServiceError, TokenAuthority};

use crate::services::{SystemClock, TokenCodec, UuidTokenIds};
use crate::store::{ProjectStore, TokenStore, UserStore};

/// Wire the engine from configuration over the given stores, using the
/// system clock and random token ids.
pub fn build_engine(
    config: &AccessConfig,
    users: Arc<dyn UserStore>,
    projects: Arc<dyn ProjectStore>,
    tokens: Arc<dyn TokenStore>,
) -> Result<(Arc<TokenAuthority>, AccessManager), AppError> {
    let codec = TokenCodec::from_config(&config.jwt).map_err(AppError::ConfigError)?;

    let authority = Arc::new(TokenAuthority::new(
        tokens,
        codec,
        Arc::new(SystemClock),
        Arc::new(UuidTokenIds),
        config.token,
    ));
    let access = AccessManager::new(
        authority.clone(),
        users,
        projects,
        config.creator_project_id,
    );

    tracing::info!(
        service = %config.service_name,
        creator_project_id = config.creator_project_id,
        "Access engine initialized"
    );

    Ok((authority, access))
}
