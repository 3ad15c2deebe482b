use service_core::error::AppError;
use thiserror::Error;

use crate::models::Privilege;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("User is not verified")]
    NotVerified,

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Locked: {0}")]
    Locked(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Token is blocked")]
    TokenBlocked,

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Privilege {privilege} is not valid here: {reason}")]
    InvalidPrivilege {
        privilege: Privilege,
        reason: &'static str,
    },

    #[error("Storage error: {0}")]
    Store(anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    /// Failures that mean "this token cannot be used", as opposed to
    /// infrastructure failures that must propagate unchanged.
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            ServiceError::TokenExpired
                | ServiceError::TokenBlocked
                | ServiceError::MalformedToken(_)
                | ServiceError::NotFound(_)
        )
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ServiceError::NotFound(what),
            StoreError::Backend(e) => ServiceError::Store(e),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthorized(msg) => AppError::Unauthorized(anyhow::anyhow!(msg)),
            ServiceError::NotVerified => {
                AppError::Forbidden(anyhow::anyhow!("User is not verified"))
            }
            ServiceError::PreconditionFailed(msg) => {
                AppError::PreconditionFailed(anyhow::anyhow!(msg))
            }
            ServiceError::Locked(msg) => AppError::Locked(anyhow::anyhow!(msg)),
            ServiceError::NotFound(msg) => AppError::NotFound(anyhow::anyhow!(msg)),
            ServiceError::TokenExpired => AppError::Unauthorized(anyhow::anyhow!("Token expired")),
            ServiceError::TokenBlocked => {
                AppError::Unauthorized(anyhow::anyhow!("Token is blocked"))
            }
            ServiceError::MalformedToken(msg) => {
                AppError::Unauthorized(anyhow::anyhow!("Malformed token: {}", msg))
            }
            e @ ServiceError::InvalidPrivilege { .. } => {
                AppError::InternalError(anyhow::anyhow!(e.to_string()))
            }
            ServiceError::Store(e) => AppError::StorageError(e),
            ServiceError::Internal(e) => AppError::InternalError(e),
        }
    }
}
