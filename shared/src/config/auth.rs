//! Authentication configuration

use serde::{Deserialize, Serialize};

/// JWT signing and expiry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign tokens
    pub jwt_secret: String,

    /// Token lifetime in days
    #[serde(default = "default_token_expiry_days")]
    pub token_expiry_days: i64,

    /// Bcrypt cost factor for password hashing
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::from("insecure-dev-secret"),
            token_expiry_days: default_token_expiry_days(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl AuthConfig {
    /// Load from `JWT_SECRET` / `TOKEN_EXPIRY_DAYS` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            config.jwt_secret = secret;
        }
        if let Ok(days) = std::env::var("TOKEN_EXPIRY_DAYS") {
            if let Ok(days) = days.parse() {
                config.token_expiry_days = days;
            }
        }
        config
    }
}

fn default_token_expiry_days() -> i64 {
    30
}

fn default_bcrypt_cost() -> u32 {
    10
}
