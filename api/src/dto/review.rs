use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReviewRequest {
    pub apartment_id: Uuid,
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[validate(length(min = 1))]
    pub comment: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateReviewRequest {
    pub rating: Option<u8>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RespondToReviewRequest {
    #[validate(length(min = 1))]
    pub response: String,
}
