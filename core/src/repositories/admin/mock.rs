//! Mock implementation of AdminRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::Admin;
use crate::errors::DomainError;

use super::trait_::AdminRepository;

/// In-memory admin repository
#[derive(Clone, Default)]
pub struct MockAdminRepository {
    admins: Arc<RwLock<HashMap<Uuid, Admin>>>,
}

impl MockAdminRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdminRepository for MockAdminRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>, DomainError> {
        let admins = self.admins.read().await;
        Ok(admins.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, DomainError> {
        let admins = self.admins.read().await;
        Ok(admins.values().find(|a| a.email == email).cloned())
    }

    async fn create(&self, admin: Admin) -> Result<Admin, DomainError> {
        let mut admins = self.admins.write().await;
        if admins.values().any(|a| a.email == admin.email) {
            return Err(DomainError::conflict("Email already registered"));
        }
        admins.insert(admin.id, admin.clone());
        Ok(admin)
    }
}
