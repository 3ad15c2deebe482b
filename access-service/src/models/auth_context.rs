//! Caller credentials passed explicitly through every access check.

use super::token::TokenClaims;

/// Raw bearer token plus claims the transport layer may have decoded already.
///
/// Pre-parsed claims are only a hint for cheap pre-checks; access decisions
/// always re-validate the raw token against the token store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    token: String,
    claims: Option<TokenClaims>,
}

impl AuthContext {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            claims: None,
        }
    }

    pub fn with_claims(token: impl Into<String>, claims: TokenClaims) -> Self {
        Self {
            token: token.into(),
            claims: Some(claims),
        }
    }

    /// Build from an `Authorization` header value, accepting a `Bearer` prefix.
    pub fn from_bearer(header: &str) -> Option<Self> {
        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .unwrap_or(header)
            .trim();
        if token.is_empty() {
            return None;
        }
        Some(Self::new(token))
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn claims(&self) -> Option<&TokenClaims> {
        self.claims.as_ref()
    }
}
