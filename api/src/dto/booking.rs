use serde::Deserialize;
use uuid::Uuid;

use rn_core::domain::entities::BookingStatus;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub apartment_id: Uuid,
}

/// Agent decision over a pending booking
#[derive(Debug, Clone, Deserialize)]
pub struct DecideBookingRequest {
    pub status: BookingStatus,
}
