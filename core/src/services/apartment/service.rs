//! Apartment listing management.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::entities::{Apartment, ApartmentCategory, Principal};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{ApartmentFilter, ApartmentRepository};
use crate::services::auth::AuthService;
use rn_shared::types::{PaginatedResponse, Pagination};

/// Input for creating a listing
#[derive(Debug, Clone)]
pub struct NewApartment {
    pub location: String,
    pub price: f64,
    pub category: ApartmentCategory,
    pub description: String,
    pub images: Vec<String>,
}

/// Partial update of a listing; `None` fields stay untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateApartment {
    pub location: Option<String>,
    pub price: Option<f64>,
    pub category: Option<ApartmentCategory>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    /// Manual availability override by the owning agent. Not used by the
    /// booking flow, which goes through claim/release.
    pub availability: Option<bool>,
}

/// Listing management service
pub struct ApartmentService {
    apartment_repo: Arc<dyn ApartmentRepository>,
}

impl ApartmentService {
    pub fn new(apartment_repo: Arc<dyn ApartmentRepository>) -> Self {
        Self { apartment_repo }
    }

    fn validate(location: &str, price: f64, description: &str) -> DomainResult<()> {
        if location.trim().is_empty() {
            return Err(DomainError::validation("Location is required"));
        }
        if price <= 0.0 {
            return Err(DomainError::validation("Price must be greater than zero"));
        }
        if description.trim().is_empty() {
            return Err(DomainError::validation("Description is required"));
        }
        Ok(())
    }

    /// Creates a listing owned by the calling agent; approved agents only
    pub async fn create(
        &self,
        principal: &Principal,
        input: NewApartment,
    ) -> DomainResult<Apartment> {
        let agent_id = AuthService::require_approved_agent(principal)?;
        Self::validate(&input.location, input.price, &input.description)?;
        let apartment = self
            .apartment_repo
            .create(Apartment::new(
                agent_id,
                input.location,
                input.price,
                input.category,
                input.description,
                input.images,
            ))
            .await?;
        info!(apartment_id = %apartment.id, agent_id = %agent_id, "listing created");
        Ok(apartment)
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<Apartment> {
        self.apartment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Apartment"))
    }

    /// Public listing search
    pub async fn list(
        &self,
        filter: ApartmentFilter,
        pagination: Pagination,
    ) -> DomainResult<PaginatedResponse<Apartment>> {
        let page = self
            .apartment_repo
            .find_filtered(&filter, &pagination)
            .await?;
        let total = self.apartment_repo.count_filtered(&filter).await?;
        Ok(PaginatedResponse::new(page, &pagination, total))
    }

    /// The calling agent's own listings
    pub async fn list_mine(&self, principal: &Principal) -> DomainResult<Vec<Apartment>> {
        let agent_id = AuthService::require_approved_agent(principal)?;
        self.apartment_repo.find_by_agent(agent_id).await
    }

    async fn owned_or_admin(
        &self,
        principal: &Principal,
        id: Uuid,
    ) -> DomainResult<Apartment> {
        let apartment = self.get(id).await?;
        if principal.is_admin() {
            return Ok(apartment);
        }
        let agent_id = AuthService::require_approved_agent(principal)?;
        if !apartment.is_owned_by(agent_id) {
            return Err(DomainError::forbidden(
                "You can only manage your own listings",
            ));
        }
        Ok(apartment)
    }

    /// Updates a listing; owner agent or admin
    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        changes: UpdateApartment,
    ) -> DomainResult<Apartment> {
        let mut apartment = self.owned_or_admin(principal, id).await?;

        if let Some(location) = changes.location {
            apartment.location = location;
        }
        if let Some(price) = changes.price {
            apartment.price = price;
        }
        if let Some(category) = changes.category {
            apartment.category = category;
        }
        if let Some(description) = changes.description {
            apartment.description = description;
        }
        if let Some(images) = changes.images {
            apartment.images = images;
        }
        if let Some(availability) = changes.availability {
            apartment.availability = availability;
        }
        Self::validate(&apartment.location, apartment.price, &apartment.description)?;
        apartment.updated_at = chrono::Utc::now();
        self.apartment_repo.update(apartment).await
    }

    /// Deletes a listing; owner agent or admin
    pub async fn delete(&self, principal: &Principal, id: Uuid) -> DomainResult<()> {
        let apartment = self.owned_or_admin(principal, id).await?;
        self.apartment_repo.delete(apartment.id).await?;
        info!(apartment_id = %id, "listing deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Agent, AgentStatus, User};
    use crate::repositories::MockApartmentRepository;

    fn approved_agent() -> Principal {
        let mut agent = Agent::new(
            "Bola".to_string(),
            "bola@example.com".to_string(),
            "hash".to_string(),
            "0800".to_string(),
            None,
        );
        agent.set_status(AgentStatus::Approved);
        Principal::Agent(agent)
    }

    fn pending_agent() -> Principal {
        Principal::Agent(Agent::new(
            "Tunde".to_string(),
            "tunde@example.com".to_string(),
            "hash".to_string(),
            "0801".to_string(),
            None,
        ))
    }

    fn renter() -> Principal {
        Principal::User(User::new(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "hash".to_string(),
            "0802".to_string(),
        ))
    }

    fn new_listing() -> NewApartment {
        NewApartment {
            location: "Yaba".to_string(),
            price: 750.0,
            category: ApartmentCategory::Studio,
            description: "Compact studio".to_string(),
            images: vec![],
        }
    }

    fn service() -> ApartmentService {
        ApartmentService::new(Arc::new(MockApartmentRepository::new()))
    }

    #[tokio::test]
    async fn test_only_approved_agents_create() {
        let service = service();
        assert!(service.create(&approved_agent(), new_listing()).await.is_ok());
        assert!(matches!(
            service.create(&pending_agent(), new_listing()).await,
            Err(DomainError::Forbidden { .. })
        ));
        assert!(matches!(
            service.create(&renter(), new_listing()).await,
            Err(DomainError::Forbidden { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_is_owner_scoped() {
        let service = service();
        let owner = approved_agent();
        let apartment = service.create(&owner, new_listing()).await.unwrap();

        let intruder = approved_agent();
        let err = service
            .update(
                &intruder,
                apartment.id,
                UpdateApartment {
                    price: Some(900.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden { .. }));

        let updated = service
            .update(
                &owner,
                apartment.id,
                UpdateApartment {
                    price: Some(900.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, 900.0);
    }

    #[tokio::test]
    async fn test_invalid_price_rejected() {
        let service = service();
        let mut listing = new_listing();
        listing.price = 0.0;
        let err = service
            .create(&approved_agent(), listing)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
