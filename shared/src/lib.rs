//! Shared utilities and common types for the RentNest server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Common API response structures
//! - Pagination helpers

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, DatabaseConfig, Environment, ServerConfig, SettlementConfig,
};
pub use types::{ApiResponse, ErrorBody, MessageResponse, PaginatedResponse, Pagination};
