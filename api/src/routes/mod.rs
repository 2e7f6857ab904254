//! HTTP route handlers, one module per resource.
//!
//! Every module exposes a `scope()` builder; [`configure`] mounts them all
//! under `/api/v1` plus the unversioned health probe.

pub mod admin;
pub mod analytics;
pub mod apartments;
pub mod auth;
pub mod bookings;
pub mod favorites;
pub mod health;
pub mod inspections;
pub mod notifications;
pub mod payments;
pub mod reports;
pub mod reviews;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check));
    cfg.service(
        web::scope("/api/v1")
            .service(auth::scope())
            .service(apartments::scope())
            .service(bookings::scope())
            .service(payments::scope())
            .service(inspections::scope())
            .service(reviews::scope())
            .service(reports::scope())
            .service(favorites::scope())
            .service(notifications::scope())
            .service(admin::scope())
            .service(analytics::scope()),
    );
}
