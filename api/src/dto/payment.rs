use serde::Deserialize;
use uuid::Uuid;

use rn_core::domain::entities::PaymentMethod;

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentRequest {
    pub apartment_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub amount: f64,
    pub method: PaymentMethod,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RefundRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecideRefundRequest {
    pub approve: bool,
}
