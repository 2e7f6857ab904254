//! Access token claims.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::principal::Role;

/// Issuer recorded in every token
pub const TOKEN_ISSUER: &str = "rentnest";

/// JWT claim set carried by access tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id of the token holder
    pub sub: Uuid,
    /// Role at issue time; the live account is still re-read per request
    pub role: Role,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch
    pub exp: i64,
    /// Unique token id
    pub jti: Uuid,
    pub iss: String,
}

impl Claims {
    pub fn new(sub: Uuid, role: Role, expiry_days: i64) -> Self {
        let now = Utc::now();
        Self {
            sub,
            role,
            iat: now.timestamp(),
            exp: (now + Duration::days(expiry_days)).timestamp(),
            jti: Uuid::new_v4(),
            iss: TOKEN_ISSUER.to_string(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims_are_not_expired() {
        let claims = Claims::new(Uuid::new_v4(), Role::User, 30);
        assert!(!claims.is_expired());
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_zero_day_expiry_is_expired() {
        let claims = Claims::new(Uuid::new_v4(), Role::Admin, 0);
        assert!(claims.is_expired());
    }
}
