pub mod service;

pub use service::ReportService;
