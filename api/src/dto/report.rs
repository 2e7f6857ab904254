use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use rn_core::domain::entities::ReportType;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReportRequest {
    pub apartment_id: Uuid,
    #[validate(length(min = 1))]
    pub message: String,
    pub report_type: ReportType,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RespondToReportRequest {
    #[validate(length(min = 1))]
    pub response: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ResolveReportRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignReportRequest {
    pub agent_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct EscalateReportRequest {
    pub notes: Option<String>,
}
