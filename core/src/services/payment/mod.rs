pub mod service;
pub mod worker;

pub use service::PaymentService;
pub use worker::SettlementWorker;
