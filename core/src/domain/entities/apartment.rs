//! Apartment listing entity.
//!
//! The `availability` flag acts as a single-slot reservation mutex: one
//! active booking holds it at a time. It is only mutated through atomic
//! conditional updates on the repository (claim/release), never by a plain
//! read-modify-write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Listing category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApartmentCategory {
    #[serde(rename = "Studio")]
    Studio,
    #[serde(rename = "1-Bedroom")]
    OneBedroom,
    #[serde(rename = "2-Bedroom")]
    TwoBedroom,
    #[serde(rename = "Duplex")]
    Duplex,
}

impl ApartmentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Studio => "Studio",
            Self::OneBedroom => "1-Bedroom",
            Self::TwoBedroom => "2-Bedroom",
            Self::Duplex => "Duplex",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Studio" => Some(Self::Studio),
            "1-Bedroom" => Some(Self::OneBedroom),
            "2-Bedroom" => Some(Self::TwoBedroom),
            "Duplex" => Some(Self::Duplex),
            _ => None,
        }
    }
}

/// An apartment listing owned by an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Apartment {
    pub id: Uuid,

    /// Owning agent
    pub agent_id: Uuid,

    pub location: String,
    pub price: f64,
    pub category: ApartmentCategory,
    pub description: String,

    /// Image URLs
    pub images: Vec<String>,

    /// Single-slot reservation flag; false while an active booking holds it
    pub availability: bool,

    /// Denormalized mean of all review ratings, one decimal place
    pub average_rating: f64,

    /// Denormalized count of reviews
    pub total_reviews: u32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Apartment {
    /// Creates a new available listing
    pub fn new(
        agent_id: Uuid,
        location: String,
        price: f64,
        category: ApartmentCategory,
        description: String,
        images: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            agent_id,
            location,
            price,
            category,
            description,
            images,
            availability: true,
            average_rating: 0.0,
            total_reviews: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, agent_id: Uuid) -> bool {
        self.agent_id == agent_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Apartment {
        Apartment::new(
            Uuid::new_v4(),
            "Lekki Phase 1".to_string(),
            1200.0,
            ApartmentCategory::TwoBedroom,
            "Two bedroom flat with parking".to_string(),
            vec![],
        )
    }

    #[test]
    fn test_new_apartment_is_available() {
        let apartment = sample();
        assert!(apartment.availability);
        assert_eq!(apartment.average_rating, 0.0);
        assert_eq!(apartment.total_reviews, 0);
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&ApartmentCategory::OneBedroom).unwrap();
        assert_eq!(json, "\"1-Bedroom\"");
        assert_eq!(
            ApartmentCategory::parse("Duplex"),
            Some(ApartmentCategory::Duplex)
        );
    }

    #[test]
    fn test_ownership() {
        let apartment = sample();
        assert!(apartment.is_owned_by(apartment.agent_id));
        assert!(!apartment.is_owned_by(Uuid::new_v4()));
    }
}
