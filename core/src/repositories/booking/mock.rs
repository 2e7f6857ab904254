//! Mock implementation of BookingRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{Booking, BookingStatus};
use crate::errors::DomainError;

use super::trait_::BookingRepository;

/// In-memory booking repository
#[derive(Clone, Default)]
pub struct MockBookingRepository {
    bookings: Arc<RwLock<HashMap<Uuid, Booking>>>,
}

impl MockBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for MockBookingRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, DomainError> {
        let bookings = self.bookings.read().await;
        Ok(bookings.get(&id).cloned())
    }

    async fn create(&self, booking: Booking) -> Result<Booking, DomainError> {
        let mut bookings = self.bookings.write().await;
        bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn update(&self, booking: Booking) -> Result<Booking, DomainError> {
        let mut bookings = self.bookings.write().await;
        if !bookings.contains_key(&booking.id) {
            return Err(DomainError::not_found("Booking"));
        }
        bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut bookings = self.bookings.write().await;
        Ok(bookings.remove(&id).is_some())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>, DomainError> {
        let bookings = self.bookings.read().await;
        let mut mine: Vec<Booking> = bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }

    async fn find_by_apartments(
        &self,
        apartment_ids: &[Uuid],
    ) -> Result<Vec<Booking>, DomainError> {
        let bookings = self.bookings.read().await;
        let mut matched: Vec<Booking> = bookings
            .values()
            .filter(|b| apartment_ids.contains(&b.apartment_id))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched)
    }

    async fn find_active_by_user_and_apartment(
        &self,
        user_id: Uuid,
        apartment_id: Uuid,
    ) -> Result<Option<Booking>, DomainError> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .values()
            .find(|b| {
                b.user_id == user_id && b.apartment_id == apartment_id && b.status.is_active()
            })
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Booking>, DomainError> {
        let bookings = self.bookings.read().await;
        let mut all: Vec<Booking> = bookings.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn count_by_status(&self, status: BookingStatus) -> Result<u64, DomainError> {
        let bookings = self.bookings.read().await;
        Ok(bookings.values().filter(|b| b.status == status).count() as u64)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let bookings = self.bookings.read().await;
        Ok(bookings.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_active_lookup_ignores_settled_bookings() {
        let repo = MockBookingRepository::new();
        let user = Uuid::new_v4();
        let apartment = Uuid::new_v4();

        let mut booking = Booking::new(user, apartment);
        booking.set_status(BookingStatus::Cancelled);
        repo.create(booking).await.unwrap();

        assert!(repo
            .find_active_by_user_and_apartment(user, apartment)
            .await
            .unwrap()
            .is_none());

        repo.create(Booking::new(user, apartment)).await.unwrap();
        assert!(repo
            .find_active_by_user_and_apartment(user, apartment)
            .await
            .unwrap()
            .is_some());
    }
}
