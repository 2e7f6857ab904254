//! RentNest API server entry point.
//!
//! Wires the MySQL repositories into the service layer, spawns the payment
//! settlement worker and serves the HTTP API.

use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use rn_api::{routes, AppState, Repositories};
use rn_core::services::SettlementWorker;
use rn_infra::database::mysql::{
    MySqlAdminRepository, MySqlAgentRepository, MySqlAnalyticsRepository,
    MySqlApartmentRepository, MySqlBookingRepository, MySqlFavoriteRepository,
    MySqlInspectionRepository, MySqlNotificationRepository, MySqlPaymentRepository,
    MySqlReportRepository, MySqlReviewRepository, MySqlUserRepository,
};
use rn_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    info!(
        environment = ?config.environment,
        address = %config.server.bind_address(),
        "starting rentnest api"
    );

    let pool = rn_infra::create_pool(&config.database)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let repos = Repositories {
        users: Arc::new(MySqlUserRepository::new(pool.clone())),
        agents: Arc::new(MySqlAgentRepository::new(pool.clone())),
        admins: Arc::new(MySqlAdminRepository::new(pool.clone())),
        apartments: Arc::new(MySqlApartmentRepository::new(pool.clone())),
        bookings: Arc::new(MySqlBookingRepository::new(pool.clone())),
        payments: Arc::new(MySqlPaymentRepository::new(pool.clone())),
        inspections: Arc::new(MySqlInspectionRepository::new(pool.clone())),
        reviews: Arc::new(MySqlReviewRepository::new(pool.clone())),
        reports: Arc::new(MySqlReportRepository::new(pool.clone())),
        favorites: Arc::new(MySqlFavoriteRepository::new(pool.clone())),
        notifications: Arc::new(MySqlNotificationRepository::new(pool.clone())),
        analytics: Arc::new(MySqlAnalyticsRepository::new(pool)),
    };

    let state = web::Data::new(AppState::new(repos, &config.auth, &config.settlement));

    let worker = SettlementWorker::new(
        state.payments.clone(),
        Duration::from_secs(config.settlement.poll_interval_secs),
    );
    tokio::spawn(worker.run());

    // Expired notifications are swept on the same cadence as settlement
    let notifications = state.notifications.clone();
    let sweep_interval = Duration::from_secs(config.settlement.poll_interval_secs);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        loop {
            ticker.tick().await;
            match notifications.purge_expired().await {
                Ok(0) => {}
                Ok(n) => tracing::info!(purged = n, "expired notifications purged"),
                Err(e) => tracing::warn!(error = %e, "notification purge failed"),
            }
        }
    });

    let bind_address = config.server.bind_address();
    let workers = config.server.workers;

    let mut server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(TracingLogger::default())
            .wrap(middleware::NormalizePath::trim())
            .wrap(cors)
            .configure(routes::configure)
    })
    .bind(&bind_address)?;

    if workers > 0 {
        server = server.workers(workers);
    }

    info!(address = %bind_address, "listening");
    server.run().await
}
