//! Apartment repository trait.
//!
//! Besides plain CRUD, the contract exposes `claim_availability` and
//! `release_availability` as conditional single-row updates. A booking is
//! only admitted when the claim reports that it flipped the row, which
//! makes concurrent booking attempts race on the database row rather than
//! on anything read earlier in the request.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{Apartment, ApartmentCategory};
use crate::errors::DomainError;
use rn_shared::types::Pagination;

/// Search filter for apartment listings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApartmentFilter {
    /// Case-insensitive substring match on location
    pub location: Option<String>,
    pub category: Option<ApartmentCategory>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub available: Option<bool>,
    /// Case-insensitive substring match on location or description
    pub search: Option<String>,
}

/// Persistence contract for [`Apartment`] listings
#[async_trait]
pub trait ApartmentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Apartment>, DomainError>;

    async fn create(&self, apartment: Apartment) -> Result<Apartment, DomainError>;

    async fn update(&self, apartment: Apartment) -> Result<Apartment, DomainError>;

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Filtered page of listings, newest first
    async fn find_filtered(
        &self,
        filter: &ApartmentFilter,
        pagination: &Pagination,
    ) -> Result<Vec<Apartment>, DomainError>;

    /// Total rows matching `filter`, ignoring pagination
    async fn count_filtered(&self, filter: &ApartmentFilter) -> Result<u64, DomainError>;

    /// Listings owned by one agent, newest first
    async fn find_by_agent(&self, agent_id: Uuid) -> Result<Vec<Apartment>, DomainError>;

    /// Atomically flips availability from `true` to `false`.
    ///
    /// Returns `true` when this call performed the flip. Returns `false`
    /// when the listing was already unavailable, in which case the caller
    /// lost the race and must not proceed.
    async fn claim_availability(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Marks the listing available again. Unconditional; releasing an
    /// already-available listing is a no-op that still returns `true`
    /// when the row exists.
    async fn release_availability(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Overwrites the denormalized rating aggregate
    async fn set_rating(
        &self,
        id: Uuid,
        average_rating: f64,
        total_reviews: u32,
    ) -> Result<(), DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;

    async fn count_available(&self) -> Result<u64, DomainError>;

    /// Every listing; used by the analytics collector
    async fn find_all(&self) -> Result<Vec<Apartment>, DomainError>;
}
