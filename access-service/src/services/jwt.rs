use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, Secret};
use std::fs;

use crate::config::JwtConfig;
use crate::models::TokenClaims;

/// Signs and decodes the token envelope.
///
/// Does not enforce expiry; callers compare `exp` against their clock.
#[derive(Clone)]
pub struct TokenCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenCodec {
    pub fn from_config(config: &JwtConfig) -> Result<Self, anyhow::Error> {
        match config {
            JwtConfig::Hs256 { secret } => Ok(Self::from_secret(secret)),
            JwtConfig::Rs256 {
                private_key_path,
                public_key_path,
            } => Self::from_rsa_pem_files(private_key_path, public_key_path),
        }
    }

    pub fn from_secret(secret: &Secret<String>) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        tracing::info!("Token codec initialized with HS256 secret");
        Self {
            algorithm: Algorithm::HS256,
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
        }
    }

    /// Load RSA keys from PEM files
    pub fn from_rsa_pem_files(
        private_key_path: &str,
        public_key_path: &str,
    ) -> Result<Self, anyhow::Error> {
        let private_key_pem = fs::read_to_string(private_key_path).map_err(|e| {
            anyhow::anyhow!(
                "Failed to read private key from {}: {}",
                private_key_path,
                e
            )
        })?;

        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| anyhow::anyhow!("Failed to parse private key: {}", e))?;

        let public_key_pem = fs::read_to_string(public_key_path).map_err(|e| {
            anyhow::anyhow!("Failed to read public key from {}: {}", public_key_path, e)
        })?;

        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| anyhow::anyhow!("Failed to parse public key: {}", e))?;

        tracing::info!("Token codec initialized with RS256 keys");

        Ok(Self {
            algorithm: Algorithm::RS256,
            encoding_key,
            decoding_key,
        })
    }

    pub fn encode(&self, claims: &TokenClaims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
    }

    /// Verify the signature and decode the claims.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation)?;
        Ok(token_data.claims)
    }
}
