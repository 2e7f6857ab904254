//! HTTP layer: DTOs, extractors, and route handlers on top of `rn_core`.

pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod state;

pub use errors::ApiError;
pub use state::{AppState, Repositories};
