//! Registration, login, and principal resolution.
//!
//! Registration and login exist per role against separate account tables.
//! `resolve_principal` is the single place a token's claims are turned into
//! a live [`Principal`]; everything downstream trusts that resolution.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::{Admin, Agent, Claims, Principal, Role, User};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{AdminRepository, AgentRepository, UserRepository};
use crate::services::token::TokenService;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Authentication service for all three account roles
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    agent_repo: Arc<dyn AgentRepository>,
    admin_repo: Arc<dyn AdminRepository>,
    token_service: Arc<TokenService>,
    bcrypt_cost: u32,
}

/// A successful registration or login: the account plus a fresh token
#[derive(Debug)]
pub struct Authenticated<T> {
    pub account: T,
    pub token: String,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        agent_repo: Arc<dyn AgentRepository>,
        admin_repo: Arc<dyn AdminRepository>,
        token_service: Arc<TokenService>,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            user_repo,
            agent_repo,
            admin_repo,
            token_service,
            bcrypt_cost,
        }
    }

    fn validate_credentials(name: &str, email: &str, password: &str) -> DomainResult<()> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("Name is required"));
        }
        if email.trim().is_empty() || !email.contains('@') {
            return Err(DomainError::validation("A valid email is required"));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }

    fn hash_password(&self, password: &str) -> DomainResult<String> {
        bcrypt::hash(password, self.bcrypt_cost)
            .map_err(|e| DomainError::internal(format!("Password hashing failed: {e}")))
    }

    fn check_password(password: &str, hash: &str) -> DomainResult<()> {
        let ok = bcrypt::verify(password, hash)
            .map_err(|e| DomainError::internal(format!("Password check failed: {e}")))?;
        if ok {
            Ok(())
        } else {
            Err(DomainError::unauthenticated("Invalid email or password"))
        }
    }

    pub async fn register_user(
        &self,
        name: String,
        email: String,
        password: String,
        phone: String,
    ) -> DomainResult<Authenticated<User>> {
        Self::validate_credentials(&name, &email, &password)?;
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(DomainError::conflict("Email already registered"));
        }
        let hash = self.hash_password(&password)?;
        let user = self.user_repo.create(User::new(name, email, hash, phone)).await?;
        let token = self.token_service.issue(user.id, Role::User)?;
        info!(user_id = %user.id, "user registered");
        Ok(Authenticated {
            account: user,
            token,
        })
    }

    pub async fn login_user(
        &self,
        email: String,
        password: String,
    ) -> DomainResult<Authenticated<User>> {
        let mut user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| DomainError::unauthenticated("Invalid email or password"))?;
        Self::check_password(&password, &user.password_hash)?;
        user.touch_login();
        let user = self.user_repo.update(user).await?;
        let token = self.token_service.issue(user.id, Role::User)?;
        Ok(Authenticated {
            account: user,
            token,
        })
    }

    /// Registers an agent; the account starts pending admin approval
    pub async fn register_agent(
        &self,
        name: String,
        email: String,
        password: String,
        phone: String,
        certificate: Option<String>,
    ) -> DomainResult<Authenticated<Agent>> {
        Self::validate_credentials(&name, &email, &password)?;
        if self.agent_repo.find_by_email(&email).await?.is_some() {
            return Err(DomainError::conflict("Email already registered"));
        }
        let hash = self.hash_password(&password)?;
        let agent = self
            .agent_repo
            .create(Agent::new(name, email, hash, phone, certificate))
            .await?;
        let token = self.token_service.issue(agent.id, Role::Agent)?;
        info!(agent_id = %agent.id, "agent registered, pending approval");
        Ok(Authenticated {
            account: agent,
            token,
        })
    }

    pub async fn login_agent(
        &self,
        email: String,
        password: String,
    ) -> DomainResult<Authenticated<Agent>> {
        let agent = self
            .agent_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| DomainError::unauthenticated("Invalid email or password"))?;
        Self::check_password(&password, &agent.password_hash)?;
        if !agent.is_approved() {
            return Err(DomainError::forbidden(format!(
                "Your account is {}",
                agent.status.as_str()
            )));
        }
        let token = self.token_service.issue(agent.id, Role::Agent)?;
        Ok(Authenticated {
            account: agent,
            token,
        })
    }

    pub async fn register_admin(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> DomainResult<Authenticated<Admin>> {
        Self::validate_credentials(&name, &email, &password)?;
        if self.admin_repo.find_by_email(&email).await?.is_some() {
            return Err(DomainError::conflict("Email already registered"));
        }
        let hash = self.hash_password(&password)?;
        let admin = self
            .admin_repo
            .create(Admin::new(name, email, hash))
            .await?;
        let token = self.token_service.issue(admin.id, Role::Admin)?;
        info!(admin_id = %admin.id, "admin registered");
        Ok(Authenticated {
            account: admin,
            token,
        })
    }

    pub async fn login_admin(
        &self,
        email: String,
        password: String,
    ) -> DomainResult<Authenticated<Admin>> {
        let admin = self
            .admin_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| DomainError::unauthenticated("Invalid email or password"))?;
        Self::check_password(&password, &admin.password_hash)?;
        let token = self.token_service.issue(admin.id, Role::Admin)?;
        Ok(Authenticated {
            account: admin,
            token,
        })
    }

    /// Verifies a bearer token and loads the live account it names
    pub async fn resolve_token(&self, token: &str) -> DomainResult<Principal> {
        let claims = self.token_service.verify(token)?;
        self.resolve_principal(&claims).await
    }

    /// Loads the account behind verified claims. The account is re-read on
    /// every request so role or status changes take effect immediately.
    pub async fn resolve_principal(&self, claims: &Claims) -> DomainResult<Principal> {
        let principal = match claims.role {
            Role::User => self
                .user_repo
                .find_by_id(claims.sub)
                .await?
                .map(Principal::User),
            Role::Agent => self
                .agent_repo
                .find_by_id(claims.sub)
                .await?
                .map(Principal::Agent),
            Role::Admin => self
                .admin_repo
                .find_by_id(claims.sub)
                .await?
                .map(Principal::Admin),
        };
        principal.ok_or_else(|| {
            warn!(account_id = %claims.sub, role = claims.role.as_str(), "token names a missing account");
            DomainError::unauthenticated("Account no longer exists")
        })
    }

    /// Fails unless the caller is an admin
    pub fn require_admin(principal: &Principal) -> DomainResult<()> {
        if principal.is_admin() {
            Ok(())
        } else {
            Err(DomainError::forbidden("Admin access required"))
        }
    }

    /// Fails unless the caller is an approved agent; pending and rejected
    /// agents can authenticate but cannot manage listings
    pub fn require_approved_agent(principal: &Principal) -> DomainResult<Uuid> {
        match principal {
            Principal::Agent(agent) if agent.is_approved() => Ok(agent.id),
            Principal::Agent(_) => Err(DomainError::forbidden(
                "Agent account is not approved yet",
            )),
            _ => Err(DomainError::forbidden("Agent access required")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::AgentStatus;
    use crate::repositories::{MockAdminRepository, MockAgentRepository, MockUserRepository};

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockAgentRepository::new()),
            Arc::new(MockAdminRepository::new()),
            Arc::new(TokenService::new("test-secret", 30)),
            4,
        )
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let auth = service();
        let registered = auth
            .register_user(
                "Ada".to_string(),
                "ada@example.com".to_string(),
                "hunter42".to_string(),
                "0800".to_string(),
            )
            .await
            .unwrap();
        assert!(!registered.token.is_empty());

        let logged_in = auth
            .login_user("ada@example.com".to_string(), "hunter42".to_string())
            .await
            .unwrap();
        assert_eq!(logged_in.account.id, registered.account.id);
        assert!(logged_in.account.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let auth = service();
        auth.register_user(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "hunter42".to_string(),
            "0800".to_string(),
        )
        .await
        .unwrap();

        let err = auth
            .login_user("ada@example.com".to_string(), "wrong".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthenticated { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflict() {
        let auth = service();
        auth.register_user(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "hunter42".to_string(),
            "0800".to_string(),
        )
        .await
        .unwrap();

        let err = auth
            .register_user(
                "Other".to_string(),
                "ada@example.com".to_string(),
                "hunter42".to_string(),
                "0801".to_string(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let auth = service();
        let err = auth
            .register_user(
                "Ada".to_string(),
                "ada@example.com".to_string(),
                "abc".to_string(),
                "0800".to_string(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_unapproved_agent_cannot_login() {
        let agent_repo = Arc::new(MockAgentRepository::new());
        let auth = AuthService::new(
            Arc::new(MockUserRepository::new()),
            agent_repo.clone(),
            Arc::new(MockAdminRepository::new()),
            Arc::new(TokenService::new("test-secret", 30)),
            4,
        );
        let registered = auth
            .register_agent(
                "Bola".to_string(),
                "bola@example.com".to_string(),
                "hunter42".to_string(),
                "0800".to_string(),
                None,
            )
            .await
            .unwrap();

        let err = auth
            .login_agent("bola@example.com".to_string(), "hunter42".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden { .. }));

        let mut agent = registered.account;
        agent.set_status(AgentStatus::Approved);
        agent_repo.update(agent).await.unwrap();
        let logged_in = auth
            .login_agent("bola@example.com".to_string(), "hunter42".to_string())
            .await
            .unwrap();
        assert!(logged_in.account.is_approved());
    }

    #[tokio::test]
    async fn test_resolve_token_round_trip() {
        let auth = service();
        let registered = auth
            .register_agent(
                "Bola".to_string(),
                "bola@example.com".to_string(),
                "hunter42".to_string(),
                "0800".to_string(),
                None,
            )
            .await
            .unwrap();

        let principal = auth.resolve_token(&registered.token).await.unwrap();
        assert_eq!(principal.id(), registered.account.id);
        assert_eq!(principal.role(), Role::Agent);
        // Fresh agents authenticate but are not yet approved
        assert!(AuthService::require_approved_agent(&principal).is_err());
    }

    #[tokio::test]
    async fn test_guards() {
        let auth = service();
        let admin = auth
            .register_admin(
                "Root".to_string(),
                "root@example.com".to_string(),
                "hunter42".to_string(),
            )
            .await
            .unwrap();

        let principal = auth.resolve_token(&admin.token).await.unwrap();
        assert!(AuthService::require_admin(&principal).is_ok());
        assert!(AuthService::require_approved_agent(&principal).is_err());
    }
}
