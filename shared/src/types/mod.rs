//! Common type definitions shared across server modules

pub mod pagination;
pub mod response;

pub use pagination::{PaginatedResponse, Pagination};
pub use response::{ApiResponse, ErrorBody, MessageResponse};
