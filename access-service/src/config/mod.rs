use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// HS256 secrets shorter than this are rejected in production.
const MIN_PROD_SECRET_BYTES: usize = 32;

/// Upper bound for either token lifetime, roughly one hundred years.
const MAX_EXPIRY_DAYS: i64 = 36_500;

#[derive(Debug, Clone)]
pub struct AccessConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub token: TokenConfig,
    pub creator_project_id: i64,
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenConfig {
    pub default_expiry_days: i64,
    pub static_expiry_days: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            default_expiry_days: 1,
            static_expiry_days: 365,
        }
    }
}

/// Token signing material. Exactly one mode is configured.
#[derive(Debug, Clone)]
pub enum JwtConfig {
    Hs256 {
        secret: Secret<String>,
    },
    Rs256 {
        private_key_path: String,
        public_key_path: String,
    },
}

impl AccessConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let config = AccessConfig {
            common: common_config,
            environment,
            service_name: get_env("SERVICE_NAME", Some("access-service"), is_prod)?,
            token: TokenConfig {
                default_expiry_days: parse_env("TOKEN_DEFAULT_EXPIRY_DAYS", "1", is_prod)?,
                static_expiry_days: parse_env("TOKEN_STATIC_EXPIRY_DAYS", "365", is_prod)?,
            },
            creator_project_id: parse_env("CREATOR_PROJECT_ID", "1", is_prod)?,
            jwt: jwt_from_env()?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.token.default_expiry_days <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "TOKEN_DEFAULT_EXPIRY_DAYS must be positive"
            )));
        }

        if self.token.static_expiry_days <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "TOKEN_STATIC_EXPIRY_DAYS must be positive"
            )));
        }

        if self.token.default_expiry_days > MAX_EXPIRY_DAYS
            || self.token.static_expiry_days > MAX_EXPIRY_DAYS
        {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Token expiry must not exceed {} days",
                MAX_EXPIRY_DAYS
            )));
        }

        if self.token.static_expiry_days < self.token.default_expiry_days {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "TOKEN_STATIC_EXPIRY_DAYS must not be shorter than TOKEN_DEFAULT_EXPIRY_DAYS"
            )));
        }

        if self.creator_project_id <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "CREATOR_PROJECT_ID must be positive"
            )));
        }

        if self.environment == Environment::Prod {
            if let JwtConfig::Hs256 { secret } = &self.jwt {
                if secret.expose_secret().len() < MIN_PROD_SECRET_BYTES {
                    return Err(AppError::ConfigError(anyhow::anyhow!(
                        "JWT_SECRET must be at least {} bytes in production",
                        MIN_PROD_SECRET_BYTES
                    )));
                }
            }
        }

        Ok(())
    }
}

fn jwt_from_env() -> Result<JwtConfig, AppError> {
    let secret = env::var("JWT_SECRET").ok();
    let private_key_path = env::var("JWT_PRIVATE_KEY_PATH").ok();
    let public_key_path = env::var("JWT_PUBLIC_KEY_PATH").ok();

    match (secret, private_key_path, public_key_path) {
        (Some(secret), None, None) => Ok(JwtConfig::Hs256 {
            secret: Secret::new(secret),
        }),
        (None, Some(private_key_path), Some(public_key_path)) => Ok(JwtConfig::Rs256 {
            private_key_path,
            public_key_path,
        }),
        (None, None, None) => Err(AppError::ConfigError(anyhow::anyhow!(
            "JWT_SECRET or JWT_PRIVATE_KEY_PATH and JWT_PUBLIC_KEY_PATH must be set"
        ))),
        _ => Err(AppError::ConfigError(anyhow::anyhow!(
            "Configure either JWT_SECRET or both RSA key paths, not a mix"
        ))),
    }
}

fn parse_env(key: &str, default: &str, is_prod: bool) -> Result<i64, AppError> {
    get_env(key, Some(default), is_prod)?
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| {
            AppError::ConfigError(anyhow::anyhow!("{}: {}", key, e))
        })
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}
