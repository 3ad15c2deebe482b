//! Token models - stored token records and their signed claims.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::authority::Authority;
use super::user::{UserId, UserIdError};

/// Stored token record, keyed by its opaque value.
///
/// `authority` is the owner's level at issuance. It is informational only;
/// access decisions read the live user instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub value: String,
    pub owner_id: UserId,
    pub authority: Authority,
    pub is_static: bool,
    pub is_blocked: bool,
    pub origin: Option<String>,
    pub ip_address: Option<String>,
    pub geo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Token {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_blocked && !self.is_expired_at(now)
    }

    /// Short prefix safe to put in logs.
    pub fn fingerprint(&self) -> &str {
        fingerprint(&self.value)
    }
}

pub(crate) fn fingerprint(value: &str) -> &str {
    let end = value
        .char_indices()
        .nth(12)
        .map(|(index, _)| index)
        .unwrap_or(value.len());
    &value[..end]
}

/// Input for issuing a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCreator {
    pub owner_id: UserId,
    pub authority: Authority,
    pub is_static: bool,
    pub origin: Option<String>,
    pub ip_address: Option<String>,
    pub geo: Option<String>,
}

impl TokenCreator {
    pub fn new(owner_id: UserId, authority: Authority, is_static: bool) -> Self {
        Self {
            owner_id,
            authority,
            is_static,
            origin: None,
            ip_address: None,
            geo: None,
        }
    }

    pub fn origin(mut self, origin: Option<String>) -> Self {
        self.origin = origin;
        self
    }

    pub fn ip_address(mut self, ip_address: Option<String>) -> Self {
        self.ip_address = ip_address;
        self
    }

    pub fn geo(mut self, geo: Option<String>) -> Self {
        self.geo = geo;
        self
    }
}

/// Claims carried in the signed token envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (universal owner ID)
    pub sub: String,
    /// Token ID
    pub jti: String,
    /// Owner local ID
    pub uid: String,
    /// Owner project ID
    pub pid: i64,
    pub universal_id: String,
    /// Every granted authority, comma-joined
    pub authorities: String,
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<String>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    pub fn owner_id(&self) -> Result<UserId, UserIdError> {
        let owner_id = UserId::from_universal(&self.universal_id)?;
        if owner_id.local_id != self.uid || owner_id.project_id != self.pid {
            return Err(UserIdError::Inconsistent(self.universal_id.clone()));
        }
        Ok(owner_id)
    }

    pub fn authority(&self) -> Authority {
        Authority::decode_highest(&self.authorities)
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.iat, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// What a successful validation tells the caller about a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub value: String,
    pub owner_id: UserId,
    /// Issuance snapshot; never used for access decisions.
    pub authority: Authority,
    pub is_static: bool,
    pub origin: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TokenMetadata {
    pub fn project_id(&self) -> i64 {
        self.owner_id.project_id
    }
}

impl From<Token> for TokenMetadata {
    fn from(t: Token) -> Self {
        Self {
            value: t.value,
            owner_id: t.owner_id,
            authority: t.authority,
            is_static: t.is_static,
            origin: t.origin,
            created_at: t.created_at,
            expires_at: t.expires_at,
        }
    }
}

/// Selects which of an owner's tokens to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenFilter {
    #[default]
    All,
    /// Neither blocked nor expired.
    Valid,
    Blocked,
}

impl TokenFilter {
    pub fn matches(&self, token: &Token, now: DateTime<Utc>) -> bool {
        match self {
            TokenFilter::All => true,
            TokenFilter::Valid => token.is_valid_at(now),
            TokenFilter::Blocked => token.is_blocked,
        }
    }
}
