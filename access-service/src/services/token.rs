//! Token lifecycle: issuance, validation and one-way blocking.
//!
//! `TokenAuthority` is the only component that writes token records. A
//! record is valid while it is neither blocked nor past `expires_at`; the
//! only mutation ever applied after issuance is `is_blocked = true`.

use chrono::{Duration, SubsecRound};
use std::collections::HashSet;
use std::sync::Arc;

use super::clock::{Clock, TokenIdGenerator};
use super::error::ServiceError;
use super::jwt::TokenCodec;
use crate::config::TokenConfig;
use crate::models::token::fingerprint;
use crate::models::{
    Authority, Token, TokenClaims, TokenCreator, TokenFilter, TokenMetadata, UserId,
};
use crate::store::TokenStore;

/// How much work `validate` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Signature and expiry only; no store access.
    Shallow,
    /// Additionally re-reads the stored record for block state.
    Deep,
}

pub struct TokenAuthority {
    store: Arc<dyn TokenStore>,
    codec: TokenCodec,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn TokenIdGenerator>,
    config: TokenConfig,
}

impl TokenAuthority {
    pub fn new(
        store: Arc<dyn TokenStore>,
        codec: TokenCodec,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn TokenIdGenerator>,
        config: TokenConfig,
    ) -> Self {
        Self {
            store,
            codec,
            clock,
            ids,
            config,
        }
    }

    pub async fn issue(
        &self,
        owner_id: &UserId,
        authority: Authority,
        is_static: bool,
        origin: Option<String>,
    ) -> Result<Token, ServiceError> {
        self.issue_for(TokenCreator::new(owner_id.clone(), authority, is_static).origin(origin))
            .await
    }

    pub async fn issue_for(&self, creator: TokenCreator) -> Result<Token, ServiceError> {
        let now = self.clock.now().trunc_subsecs(0);
        let expiry_days = if creator.is_static {
            self.config.static_expiry_days
        } else {
            self.config.default_expiry_days
        };
        let expires_at = Duration::try_days(expiry_days)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                tracing::error!(expiry_days, "Token expiry is out of range");
                ServiceError::Internal(anyhow::anyhow!(
                    "Token expiry of {} days is out of range",
                    expiry_days
                ))
            })?;

        let universal_id = creator.owner_id.to_universal();
        let claims = TokenClaims {
            sub: universal_id.clone(),
            jti: self.ids.next_id(),
            uid: creator.owner_id.local_id.clone(),
            pid: creator.owner_id.project_id,
            universal_id,
            authorities: creator.authority.encode_granted(),
            is_static: creator.is_static,
            origin: creator.origin.clone(),
            ip: creator.ip_address.clone(),
            geo: creator.geo.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let value = self.codec.encode(&claims).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            ServiceError::Internal(anyhow::anyhow!("Failed to sign token: {}", e))
        })?;

        let token = Token {
            value,
            owner_id: creator.owner_id,
            authority: creator.authority,
            is_static: creator.is_static,
            is_blocked: false,
            origin: creator.origin,
            ip_address: creator.ip_address,
            geo: creator.geo,
            created_at: now,
            expires_at,
        };

        self.store.insert(&token).await?;

        tracing::info!(
            owner_id = %token.owner_id,
            token = %token.fingerprint(),
            is_static = token.is_static,
            expires_at = %token.expires_at,
            "Token issued"
        );

        Ok(token)
    }

    pub async fn validate(
        &self,
        value: &str,
        mode: ValidationMode,
    ) -> Result<TokenMetadata, ServiceError> {
        let claims = self
            .codec
            .decode(value)
            .map_err(|e| ServiceError::MalformedToken(e.to_string()))?;
        let owner_id = claims
            .owner_id()
            .map_err(|e| ServiceError::MalformedToken(e.to_string()))?;
        self.check_claims(&claims)?;

        if mode == ValidationMode::Shallow {
            return Ok(TokenMetadata {
                value: value.to_string(),
                owner_id,
                authority: claims.authority(),
                is_static: claims.is_static,
                created_at: claims.issued_at(),
                expires_at: claims.expires_at(),
                origin: claims.origin,
            });
        }

        let token = self
            .store
            .find(value)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Token".to_string()))?;

        if token.owner_id != owner_id {
            return Err(ServiceError::MalformedToken(
                "Token owner does not match its record".to_string(),
            ));
        }
        if token.is_blocked {
            return Err(ServiceError::TokenBlocked);
        }
        if token.is_expired_at(self.clock.now()) {
            return Err(ServiceError::TokenExpired);
        }

        Ok(token.into())
    }

    /// Cheap expiry pre-check for claims that were already decoded.
    pub fn check_claims(&self, claims: &TokenClaims) -> Result<(), ServiceError> {
        if self.clock.now() >= claims.expires_at() {
            return Err(ServiceError::TokenExpired);
        }
        Ok(())
    }

    /// Block one token. Blocking an already-blocked token returns the
    /// existing record without writing.
    pub async fn block(&self, value: &str) -> Result<Token, ServiceError> {
        let token = self
            .store
            .find(value)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Token".to_string()))?;

        if token.is_blocked {
            tracing::debug!(token = %token.fingerprint(), "Token already blocked");
            return Ok(token);
        }

        let blocked = self
            .store
            .mark_blocked(std::slice::from_ref(&token.value))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::NotFound("Token".to_string()))?;

        tracing::info!(
            owner_id = %blocked.owner_id,
            token = %blocked.fingerprint(),
            "Token blocked"
        );

        Ok(blocked)
    }

    /// Block every currently valid token among `values`; expired, blocked
    /// and unknown values are skipped, and repeated values count once.
    pub async fn block_all(&self, values: &[String]) -> Result<Vec<Token>, ServiceError> {
        let now = self.clock.now();
        let mut seen = HashSet::new();
        let unique: Vec<String> = values
            .iter()
            .filter(|value| seen.insert(value.as_str()))
            .cloned()
            .collect();

        let valid: Vec<String> = self
            .store
            .find_many(&unique)
            .await?
            .into_iter()
            .filter(|token| token.is_valid_at(now))
            .map(|token| token.value)
            .collect();

        let blocked = self.mark_blocked(&valid).await?;
        tracing::info!(
            requested = values.len(),
            blocked = blocked.len(),
            "Tokens blocked"
        );
        Ok(blocked)
    }

    /// Block every valid token owned by `owner_id`.
    pub async fn block_all_for(&self, owner_id: &UserId) -> Result<Vec<Token>, ServiceError> {
        let valid: Vec<String> = self
            .store
            .find_for_owner(owner_id, TokenFilter::Valid, self.clock.now())
            .await?
            .into_iter()
            .map(|token| token.value)
            .collect();

        let blocked = self.mark_blocked(&valid).await?;
        tracing::info!(owner_id = %owner_id, blocked = blocked.len(), "Owner tokens blocked");
        Ok(blocked)
    }

    pub async fn fetch_all_for(
        &self,
        owner_id: &UserId,
        filter: TokenFilter,
    ) -> Result<Vec<Token>, ServiceError> {
        tracing::debug!(owner_id = %owner_id, filter = ?filter, "Listing tokens");
        Ok(self
            .store
            .find_for_owner(owner_id, filter, self.clock.now())
            .await?)
    }

    /// Replace a valid token with a fresh one carrying the same properties.
    ///
    /// The replacement is issued before the old token is blocked, so a failed
    /// issuance leaves the caller's current token usable.
    pub async fn refresh(
        &self,
        value: &str,
        ip_address: Option<String>,
    ) -> Result<Token, ServiceError> {
        let metadata = self.validate(value, ValidationMode::Deep).await?;

        tracing::debug!(
            owner_id = %metadata.owner_id,
            token = %fingerprint(value),
            "Refreshing token"
        );

        let creator = TokenCreator::new(metadata.owner_id, metadata.authority, metadata.is_static)
            .origin(metadata.origin)
            .ip_address(ip_address);
        let replacement = self.issue_for(creator).await?;

        self.block(value).await?;
        Ok(replacement)
    }

    async fn mark_blocked(&self, values: &[String]) -> Result<Vec<Token>, ServiceError> {
        if values.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.store.mark_blocked(values).await?)
    }
}
