//! Booking repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{Booking, BookingStatus};
use crate::errors::DomainError;

/// Persistence contract for [`Booking`] records
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, DomainError>;

    async fn create(&self, booking: Booking) -> Result<Booking, DomainError>;

    async fn update(&self, booking: Booking) -> Result<Booking, DomainError>;

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Bookings made by one user, newest first
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>, DomainError>;

    /// Bookings against any of the given apartments, newest first; used to
    /// build an agent's booking inbox from their listing ids
    async fn find_by_apartments(&self, apartment_ids: &[Uuid])
        -> Result<Vec<Booking>, DomainError>;

    /// The pending or approved booking this user holds on the apartment,
    /// if any. At most one can exist at a time.
    async fn find_active_by_user_and_apartment(
        &self,
        user_id: Uuid,
        apartment_id: Uuid,
    ) -> Result<Option<Booking>, DomainError>;

    /// All bookings, newest first; admin console and analytics
    async fn find_all(&self) -> Result<Vec<Booking>, DomainError>;

    async fn count_by_status(&self, status: BookingStatus) -> Result<u64, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}
