use serde::Deserialize;
use validator::Validate;

use rn_core::domain::entities::ApartmentCategory;
use rn_core::repositories::ApartmentFilter;
use rn_shared::types::Pagination;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateApartmentRequest {
    #[validate(length(min = 1, max = 255))]
    pub location: String,
    pub price: f64,
    pub category: ApartmentCategory,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateApartmentRequest {
    pub location: Option<String>,
    pub price: Option<f64>,
    pub category: Option<ApartmentCategory>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub availability: Option<bool>,
}

/// Search query for the public listing endpoint
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ApartmentQuery {
    pub location: Option<String>,
    pub category: Option<ApartmentCategory>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub available: Option<bool>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ApartmentQuery {
    pub fn filter(&self) -> ApartmentFilter {
        ApartmentFilter {
            location: self.location.clone(),
            category: self.category,
            min_price: self.min_price,
            max_price: self.max_price,
            available: self.available,
            search: self.search.clone(),
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page.unwrap_or(1), self.per_page.unwrap_or(20))
    }
}
