//! Infrastructure layer: MySQL-backed repository implementations.
//!
//! Every repository trait from `rn_core` has a MySQL implementation here
//! built on SQLx. The schema lives in `migrations/`.

pub mod database;

pub use database::connection::create_pool;
