//! Mock implementation of InspectionRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{InspectionRequest, InspectionStatus};
use crate::errors::DomainError;

use super::trait_::InspectionRepository;

/// In-memory inspection repository
#[derive(Clone, Default)]
pub struct MockInspectionRepository {
    requests: Arc<RwLock<HashMap<Uuid, InspectionRequest>>>,
}

impl MockInspectionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InspectionRepository for MockInspectionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<InspectionRequest>, DomainError> {
        let requests = self.requests.read().await;
        Ok(requests.get(&id).cloned())
    }

    async fn create(
        &self,
        request: InspectionRequest,
    ) -> Result<InspectionRequest, DomainError> {
        let mut requests = self.requests.write().await;
        requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn update(
        &self,
        request: InspectionRequest,
    ) -> Result<InspectionRequest, DomainError> {
        let mut requests = self.requests.write().await;
        if !requests.contains_key(&request.id) {
            return Err(DomainError::not_found("Inspection request"));
        }
        requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut requests = self.requests.write().await;
        Ok(requests.remove(&id).is_some())
    }

    async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<InspectionRequest>, DomainError> {
        let requests = self.requests.read().await;
        let mut mine: Vec<InspectionRequest> = requests
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }

    async fn find_pending_by_user_and_apartment(
        &self,
        user_id: Uuid,
        apartment_id: Uuid,
    ) -> Result<Option<InspectionRequest>, DomainError> {
        let requests = self.requests.read().await;
        Ok(requests
            .values()
            .find(|r| {
                r.user_id == user_id
                    && r.apartment_id == apartment_id
                    && r.status == InspectionStatus::Pending
            })
            .cloned())
    }

    async fn find_by_agent(
        &self,
        agent_id: Uuid,
    ) -> Result<Vec<InspectionRequest>, DomainError> {
        let requests = self.requests.read().await;
        let mut matched: Vec<InspectionRequest> = requests
            .values()
            .filter(|r| r.agent_id == agent_id)
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched)
    }

    async fn find_all(&self) -> Result<Vec<InspectionRequest>, DomainError> {
        let requests = self.requests.read().await;
        let mut all: Vec<InspectionRequest> = requests.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn count_by_status(&self, status: InspectionStatus) -> Result<u64, DomainError> {
        let requests = self.requests.read().await;
        Ok(requests.values().filter(|r| r.status == status).count() as u64)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let requests = self.requests.read().await;
        Ok(requests.len() as u64)
    }
}
