//! Mock implementation of ApartmentRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::Apartment;
use crate::errors::DomainError;
use rn_shared::types::Pagination;

use super::trait_::{ApartmentFilter, ApartmentRepository};

/// In-memory apartment repository.
///
/// The availability claim runs under a single write lock so it has the
/// same winner-takes-all behavior as the conditional UPDATE in MySQL.
#[derive(Clone, Default)]
pub struct MockApartmentRepository {
    apartments: Arc<RwLock<HashMap<Uuid, Apartment>>>,
}

impl MockApartmentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(apartment: &Apartment, filter: &ApartmentFilter) -> bool {
    if let Some(location) = &filter.location {
        if !apartment
            .location
            .to_lowercase()
            .contains(&location.to_lowercase())
        {
            return false;
        }
    }
    if let Some(category) = filter.category {
        if apartment.category != category {
            return false;
        }
    }
    if let Some(min) = filter.min_price {
        if apartment.price < min {
            return false;
        }
    }
    if let Some(max) = filter.max_price {
        if apartment.price > max {
            return false;
        }
    }
    if let Some(available) = filter.available {
        if apartment.availability != available {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        if !apartment.location.to_lowercase().contains(&needle)
            && !apartment.description.to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    true
}

#[async_trait]
impl ApartmentRepository for MockApartmentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Apartment>, DomainError> {
        let apartments = self.apartments.read().await;
        Ok(apartments.get(&id).cloned())
    }

    async fn create(&self, apartment: Apartment) -> Result<Apartment, DomainError> {
        let mut apartments = self.apartments.write().await;
        apartments.insert(apartment.id, apartment.clone());
        Ok(apartment)
    }

    async fn update(&self, apartment: Apartment) -> Result<Apartment, DomainError> {
        let mut apartments = self.apartments.write().await;
        if !apartments.contains_key(&apartment.id) {
            return Err(DomainError::not_found("Apartment"));
        }
        apartments.insert(apartment.id, apartment.clone());
        Ok(apartment)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut apartments = self.apartments.write().await;
        Ok(apartments.remove(&id).is_some())
    }

    async fn find_filtered(
        &self,
        filter: &ApartmentFilter,
        pagination: &Pagination,
    ) -> Result<Vec<Apartment>, DomainError> {
        let apartments = self.apartments.read().await;
        let mut matched: Vec<Apartment> = apartments
            .values()
            .filter(|a| matches(a, filter))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .collect())
    }

    async fn count_filtered(&self, filter: &ApartmentFilter) -> Result<u64, DomainError> {
        let apartments = self.apartments.read().await;
        Ok(apartments.values().filter(|a| matches(a, filter)).count() as u64)
    }

    async fn find_by_agent(&self, agent_id: Uuid) -> Result<Vec<Apartment>, DomainError> {
        let apartments = self.apartments.read().await;
        let mut owned: Vec<Apartment> = apartments
            .values()
            .filter(|a| a.agent_id == agent_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn claim_availability(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut apartments = self.apartments.write().await;
        match apartments.get_mut(&id) {
            Some(apartment) if apartment.availability => {
                apartment.availability = false;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Ok(false),
        }
    }

    async fn release_availability(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut apartments = self.apartments.write().await;
        match apartments.get_mut(&id) {
            Some(apartment) => {
                apartment.availability = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_rating(
        &self,
        id: Uuid,
        average_rating: f64,
        total_reviews: u32,
    ) -> Result<(), DomainError> {
        let mut apartments = self.apartments.write().await;
        let apartment = apartments
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Apartment"))?;
        apartment.average_rating = average_rating;
        apartment.total_reviews = total_reviews;
        Ok(())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let apartments = self.apartments.read().await;
        Ok(apartments.len() as u64)
    }

    async fn count_available(&self) -> Result<u64, DomainError> {
        let apartments = self.apartments.read().await;
        Ok(apartments.values().filter(|a| a.availability).count() as u64)
    }

    async fn find_all(&self) -> Result<Vec<Apartment>, DomainError> {
        let apartments = self.apartments.read().await;
        Ok(apartments.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ApartmentCategory;

    fn sample_apartment(agent_id: Uuid, price: f64) -> Apartment {
        Apartment::new(
            agent_id,
            "Lekki Phase 1".to_string(),
            price,
            ApartmentCategory::Studio,
            "Bright studio near the water".to_string(),
            vec![],
        )
    }

    #[tokio::test]
    async fn test_claim_is_exclusive() {
        let repo = MockApartmentRepository::new();
        let apt = repo
            .create(sample_apartment(Uuid::new_v4(), 900.0))
            .await
            .unwrap();

        assert!(repo.claim_availability(apt.id).await.unwrap());
        assert!(!repo.claim_availability(apt.id).await.unwrap());

        assert!(repo.release_availability(apt.id).await.unwrap());
        assert!(repo.claim_availability(apt.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_claims_have_one_winner() {
        let repo = MockApartmentRepository::new();
        let apt = repo
            .create(sample_apartment(Uuid::new_v4(), 900.0))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let repo = repo.clone();
            let id = apt.id;
            handles.push(tokio::spawn(
                async move { repo.claim_availability(id).await },
            ));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_price_filter() {
        let repo = MockApartmentRepository::new();
        let agent = Uuid::new_v4();
        repo.create(sample_apartment(agent, 400.0)).await.unwrap();
        repo.create(sample_apartment(agent, 1500.0)).await.unwrap();

        let filter = ApartmentFilter {
            min_price: Some(1000.0),
            ..Default::default()
        };
        assert_eq!(repo.count_filtered(&filter).await.unwrap(), 1);
    }
}
