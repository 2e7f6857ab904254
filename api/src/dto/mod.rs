//! Request and response bodies.

pub mod admin;
pub mod analytics;
pub mod apartment;
pub mod auth;
pub mod booking;
pub mod favorite;
pub mod inspection;
pub mod notification;
pub mod payment;
pub mod report;
pub mod review;
