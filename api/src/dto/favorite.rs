use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct AddFavoriteRequest {
    pub apartment_id: Uuid,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateFavoriteRequest {
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}
