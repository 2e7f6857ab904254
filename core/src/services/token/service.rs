//! Access token issuing and verification.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::domain::entities::token::{Claims, TOKEN_ISSUER};
use crate::domain::entities::Role;
use crate::errors::{DomainError, DomainResult};

/// Issues and verifies HS256 access tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_days: i64,
}

impl TokenService {
    pub fn new(secret: &str, expiry_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_days,
        }
    }

    /// Issues a signed token for the given account
    pub fn issue(&self, account_id: Uuid, role: Role) -> DomainResult<String> {
        let claims = Claims::new(account_id, role, self.expiry_days);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign token: {e}")))
    }

    /// Verifies signature, expiry, and issuer, returning the claims
    pub fn verify(&self, token: &str) -> DomainResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| DomainError::unauthenticated("Invalid or expired token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_round_trip() {
        let service = TokenService::new("test-secret", 30);
        let account_id = Uuid::new_v4();

        let token = service.issue(account_id, Role::Agent).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, account_id);
        assert_eq!(claims.role, Role::Agent);
        assert_eq!(claims.iss, TOKEN_ISSUER);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = TokenService::new("secret-a", 30);
        let verifier = TokenService::new("secret-b", 30);

        let token = issuer.issue(Uuid::new_v4(), Role::User).unwrap();
        let err = verifier.verify(&token).unwrap_err();
        assert!(matches!(err, DomainError::Unauthenticated { .. }));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = TokenService::new("test-secret", 30);
        assert!(service.verify("not.a.token").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = TokenService::new("test-secret", -1);
        let token = service.issue(Uuid::new_v4(), Role::User).unwrap();
        assert!(service.verify(&token).is_err());
    }
}
