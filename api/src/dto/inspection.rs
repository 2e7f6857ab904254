use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInspectionRequest {
    pub apartment_id: Uuid,
    pub date: DateTime<Utc>,
    pub time: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RescheduleInspectionRequest {
    pub date: DateTime<Utc>,
    pub time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecideInspectionRequest {
    pub approve: bool,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CompleteInspectionRequest {
    pub notes: Option<String>,
    #[serde(default)]
    pub follow_up_required: bool,
}
