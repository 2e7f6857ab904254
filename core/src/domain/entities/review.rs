//! Review entity.
//!
//! A user may leave at most one review per apartment, and only after
//! holding a confirmed booking for it. The apartment's denormalized rating
//! aggregate is recomputed by the review service on every mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lowest accepted rating
pub const MIN_RATING: u8 = 1;

/// Highest accepted rating
pub const MAX_RATING: u8 = 5;

/// A rating and comment left by a user for an apartment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub apartment_id: Uuid,
    /// Owning agent of the apartment at review time
    pub agent_id: Uuid,
    /// 1 to 5 stars
    pub rating: u8,
    pub comment: String,
    pub agent_response: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn new(
        user_id: Uuid,
        apartment_id: Uuid,
        agent_id: Uuid,
        rating: u8,
        comment: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            apartment_id,
            agent_id,
            rating,
            comment,
            agent_response: None,
            responded_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Records the owning agent's public response
    pub fn respond(&mut self, response: String) {
        self.agent_response = Some(response);
        self.responded_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }
}

/// Validates a rating value
pub fn rating_in_range(rating: u8) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}

/// Arithmetic mean of ratings rounded to one decimal; 0.0 when empty
pub fn average_rating(ratings: &[u8]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: u32 = ratings.iter().map(|r| *r as u32).sum();
    let mean = sum as f64 / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(!rating_in_range(0));
        assert!(rating_in_range(1));
        assert!(rating_in_range(5));
        assert!(!rating_in_range(6));
    }

    #[test]
    fn test_average_rounding() {
        assert_eq!(average_rating(&[4, 5]), 4.5);
        assert_eq!(average_rating(&[1, 2, 2]), 1.7);
        assert_eq!(average_rating(&[5, 5, 5]), 5.0);
        assert_eq!(average_rating(&[]), 0.0);
    }

    #[test]
    fn test_agent_response() {
        let mut review = Review::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            4,
            "Spacious, a bit noisy".to_string(),
        );
        assert!(review.responded_at.is_none());
        review.respond("Thanks, we fixed the generator".to_string());
        assert!(review.responded_at.is_some());
    }
}
