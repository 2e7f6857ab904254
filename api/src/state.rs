//! Shared application state: one instance of every domain service.

use std::sync::Arc;

use rn_core::repositories::{
    AdminRepository, AgentRepository, AnalyticsRepository, ApartmentRepository,
    BookingRepository, FavoriteRepository, InspectionRepository, NotificationRepository,
    PaymentRepository, ReportRepository, ReviewRepository, UserRepository,
};
use rn_core::services::{
    AdminService, AnalyticsService, ApartmentService, AuthService, BookingService,
    FavoriteService, InspectionService, NotificationService, PaymentService, ReportService,
    ReviewService, TokenService,
};
use rn_shared::config::{AuthConfig, SettlementConfig};

/// The full set of repository implementations behind the services.
///
/// Production wires MySQL implementations; the integration tests wire the
/// in-memory mocks.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub agents: Arc<dyn AgentRepository>,
    pub admins: Arc<dyn AdminRepository>,
    pub apartments: Arc<dyn ApartmentRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub inspections: Arc<dyn InspectionRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub reports: Arc<dyn ReportRepository>,
    pub favorites: Arc<dyn FavoriteRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub analytics: Arc<dyn AnalyticsRepository>,
}

/// Application state shared across all request handlers
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub apartments: Arc<ApartmentService>,
    pub bookings: Arc<BookingService>,
    pub payments: Arc<PaymentService>,
    pub inspections: Arc<InspectionService>,
    pub reviews: Arc<ReviewService>,
    pub reports: Arc<ReportService>,
    pub favorites: Arc<FavoriteService>,
    pub notifications: Arc<NotificationService>,
    pub analytics: Arc<AnalyticsService>,
    pub admin: Arc<AdminService>,
}

impl AppState {
    /// Wires every service onto the given repositories
    pub fn new(repos: Repositories, auth: &AuthConfig, settlement: &SettlementConfig) -> Self {
        let token_service = Arc::new(TokenService::new(&auth.jwt_secret, auth.token_expiry_days));
        let auth_service = Arc::new(AuthService::new(
            repos.users.clone(),
            repos.agents.clone(),
            repos.admins.clone(),
            token_service,
            auth.bcrypt_cost,
        ));
        let notification_service = Arc::new(NotificationService::new(
            repos.notifications.clone(),
            repos.users.clone(),
        ));

        Self {
            auth: auth_service,
            apartments: Arc::new(ApartmentService::new(repos.apartments.clone())),
            bookings: Arc::new(BookingService::new(
                repos.bookings.clone(),
                repos.apartments.clone(),
                notification_service.clone(),
            )),
            payments: Arc::new(PaymentService::new(
                repos.payments.clone(),
                repos.bookings.clone(),
                repos.apartments.clone(),
                notification_service.clone(),
                chrono::Duration::seconds(settlement.settle_delay_secs),
            )),
            inspections: Arc::new(InspectionService::new(
                repos.inspections.clone(),
                repos.apartments.clone(),
                notification_service.clone(),
            )),
            reviews: Arc::new(ReviewService::new(
                repos.reviews.clone(),
                repos.apartments.clone(),
                repos.bookings.clone(),
                notification_service.clone(),
            )),
            reports: Arc::new(ReportService::new(
                repos.reports.clone(),
                repos.apartments.clone(),
                repos.agents.clone(),
                notification_service.clone(),
            )),
            favorites: Arc::new(FavoriteService::new(
                repos.favorites.clone(),
                repos.apartments.clone(),
            )),
            analytics: Arc::new(AnalyticsService::new(
                repos.analytics.clone(),
                repos.users.clone(),
                repos.agents.clone(),
                repos.apartments.clone(),
                repos.bookings.clone(),
                repos.inspections.clone(),
                repos.reports.clone(),
                repos.payments.clone(),
                repos.reviews.clone(),
            )),
            admin: Arc::new(AdminService::new(
                repos.users.clone(),
                repos.agents.clone(),
                notification_service.clone(),
            )),
            notifications: notification_service,
        }
    }
}
