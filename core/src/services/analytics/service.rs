//! Platform analytics collection and reporting.
//!
//! `collect` derives a full counter set from the live tables and upserts
//! it into the snapshot slot for (date, period); collecting the same slot
//! twice overwrites rather than duplicates. The dashboard reads compute
//! fresh numbers and never depend on a snapshot existing.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use crate::domain::entities::analytics::price_band;
use crate::domain::entities::{
    AgentStatus, AnalyticsPeriod, AnalyticsSnapshot, BookingStatus, Breakdown,
    InspectionStatus, Metrics, PaymentStatus, Principal, ReportStatus,
};
use crate::errors::DomainResult;
use crate::repositories::{
    AgentRepository, ApartmentRepository, BookingRepository, AnalyticsRepository,
    InspectionRepository, PaymentRepository, ReportRepository, ReviewRepository,
    UserRepository,
};
use crate::services::auth::AuthService;

/// How many locations the breakdown keeps
const TOP_LOCATIONS: usize = 10;

/// Revenue rollup for the admin console
#[derive(Debug, Clone, Serialize)]
pub struct RevenueReport {
    pub total_revenue: f64,
    pub average_transaction: f64,
    pub completed_payments: u64,
    pub refunded_payments: u64,
    pub refunded_amount: f64,
    /// Completed revenue keyed by `YYYY-MM` of the settlement instant
    pub by_month: HashMap<String, f64>,
    pub by_method: HashMap<String, f64>,
}

/// Account growth numbers for the admin console
#[derive(Debug, Clone, Serialize)]
pub struct UserReport {
    pub total_users: u64,
    pub new_users_30d: u64,
    pub total_agents: u64,
    pub approved_agents: u64,
    pub pending_agents: u64,
    pub users_with_bookings: u64,
}

/// Analytics service
pub struct AnalyticsService {
    analytics_repo: Arc<dyn AnalyticsRepository>,
    user_repo: Arc<dyn UserRepository>,
    agent_repo: Arc<dyn AgentRepository>,
    apartment_repo: Arc<dyn ApartmentRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    inspection_repo: Arc<dyn InspectionRepository>,
    report_repo: Arc<dyn ReportRepository>,
    payment_repo: Arc<dyn PaymentRepository>,
    review_repo: Arc<dyn ReviewRepository>,
}

fn period_start(date: NaiveDate, period: AnalyticsPeriod) -> DateTime<Utc> {
    let end = date.succ_opt().unwrap_or(date);
    let end = end.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let days = match period {
        AnalyticsPeriod::Daily => 1,
        AnalyticsPeriod::Weekly => 7,
        AnalyticsPeriod::Monthly => 30,
    };
    end - Duration::days(days)
}

fn period_end(date: NaiveDate) -> DateTime<Utc> {
    let end = date.succ_opt().unwrap_or(date);
    end.and_hms_opt(0, 0, 0).unwrap().and_utc()
}

fn in_window(at: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    at >= start && at < end
}

impl AnalyticsService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        analytics_repo: Arc<dyn AnalyticsRepository>,
        user_repo: Arc<dyn UserRepository>,
        agent_repo: Arc<dyn AgentRepository>,
        apartment_repo: Arc<dyn ApartmentRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        inspection_repo: Arc<dyn InspectionRepository>,
        report_repo: Arc<dyn ReportRepository>,
        payment_repo: Arc<dyn PaymentRepository>,
        review_repo: Arc<dyn ReviewRepository>,
    ) -> Self {
        Self {
            analytics_repo,
            user_repo,
            agent_repo,
            apartment_repo,
            booking_repo,
            inspection_repo,
            report_repo,
            payment_repo,
            review_repo,
        }
    }

    async fn compute(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<(Metrics, Breakdown)> {
        let mut metrics = Metrics::default();

        let users = self.user_repo.find_all().await?;
        metrics.total_users = users.len() as u64;
        metrics.new_users = users
            .iter()
            .filter(|u| in_window(u.created_at, start, end))
            .count() as u64;

        let agents = self.agent_repo.find_all().await?;
        metrics.total_agents = agents.len() as u64;
        metrics.new_agents = agents
            .iter()
            .filter(|a| in_window(a.created_at, start, end))
            .count() as u64;
        metrics.approved_agents = agents
            .iter()
            .filter(|a| a.status == AgentStatus::Approved)
            .count() as u64;
        metrics.pending_agents = agents
            .iter()
            .filter(|a| a.status == AgentStatus::Pending)
            .count() as u64;

        let apartments = self.apartment_repo.find_all().await?;
        metrics.total_apartments = apartments.len() as u64;
        metrics.new_apartments = apartments
            .iter()
            .filter(|a| in_window(a.created_at, start, end))
            .count() as u64;
        metrics.available_apartments =
            apartments.iter().filter(|a| a.availability).count() as u64;
        metrics.booked_apartments = metrics.total_apartments - metrics.available_apartments;

        let bookings = self.booking_repo.find_all().await?;
        metrics.total_bookings = bookings.len() as u64;
        metrics.new_bookings = bookings
            .iter()
            .filter(|b| in_window(b.created_at, start, end))
            .count() as u64;
        metrics.confirmed_bookings = bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Confirmed)
            .count() as u64;
        metrics.cancelled_bookings = bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Cancelled)
            .count() as u64;

        let inspections = self.inspection_repo.find_all().await?;
        metrics.total_inspections = inspections.len() as u64;
        metrics.new_inspections = inspections
            .iter()
            .filter(|i| in_window(i.created_at, start, end))
            .count() as u64;
        metrics.completed_inspections = inspections
            .iter()
            .filter(|i| i.status == InspectionStatus::Completed)
            .count() as u64;

        let reports = self.report_repo.find_all().await?;
        metrics.total_reports = reports.len() as u64;
        metrics.new_reports = reports
            .iter()
            .filter(|r| in_window(r.created_at, start, end))
            .count() as u64;
        metrics.resolved_reports = reports
            .iter()
            .filter(|r| r.status == ReportStatus::Resolved)
            .count() as u64;
        metrics.open_reports = reports
            .iter()
            .filter(|r| !matches!(r.status, ReportStatus::Resolved | ReportStatus::Closed))
            .count() as u64;

        let payments = self.payment_repo.find_all().await?;
        metrics.new_payments = payments
            .iter()
            .filter(|p| in_window(p.created_at, start, end))
            .count() as u64;
        let completed: Vec<_> = payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Completed)
            .collect();
        metrics.total_revenue = completed.iter().map(|p| p.amount).sum();
        metrics.average_transaction = if completed.is_empty() {
            0.0
        } else {
            metrics.total_revenue / completed.len() as f64
        };

        let reviews = self.review_repo.find_all().await?;
        metrics.total_reviews = reviews.len() as u64;
        metrics.new_reviews = reviews
            .iter()
            .filter(|r| in_window(r.created_at, start, end))
            .count() as u64;
        metrics.average_rating = if reviews.is_empty() {
            0.0
        } else {
            let sum: u32 = reviews.iter().map(|r| r.rating as u32).sum();
            let mean = sum as f64 / reviews.len() as f64;
            (mean * 10.0).round() / 10.0
        };

        let mut breakdown = Breakdown::default();
        let mut locations: HashMap<String, u64> = HashMap::new();
        for apartment in &apartments {
            *breakdown
                .apartment_categories
                .entry(apartment.category.as_str().to_string())
                .or_insert(0) += 1;
            *breakdown
                .price_ranges
                .entry(price_band(apartment.price).to_string())
                .or_insert(0) += 1;
            *locations.entry(apartment.location.clone()).or_insert(0) += 1;
        }
        let mut ranked: Vec<(String, u64)> = locations.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        breakdown.popular_locations = ranked.into_iter().take(TOP_LOCATIONS).collect();

        Ok((metrics, breakdown))
    }

    /// Collects and stores the snapshot for (date, period); idempotent per
    /// slot
    pub async fn collect(
        &self,
        date: NaiveDate,
        period: AnalyticsPeriod,
    ) -> DomainResult<AnalyticsSnapshot> {
        let start = period_start(date, period);
        let end = period_end(date);
        let (metrics, breakdown) = self.compute(start, end).await?;
        let snapshot = self
            .analytics_repo
            .upsert(AnalyticsSnapshot::new(date, period, metrics, breakdown))
            .await?;
        info!(date = %date, period = period.as_str(), "analytics snapshot collected");
        Ok(snapshot)
    }

    /// Live dashboard numbers for the admin console; admin only
    pub async fn dashboard(&self, principal: &Principal) -> DomainResult<(Metrics, Breakdown)> {
        AuthService::require_admin(principal)?;
        let end = Utc::now();
        let start = end - Duration::days(1);
        self.compute(start, end).await
    }

    /// Revenue totals and breakdowns over all payments; admin only
    pub async fn revenue(&self, principal: &Principal) -> DomainResult<RevenueReport> {
        AuthService::require_admin(principal)?;
        let payments = self.payment_repo.find_all().await?;

        let mut report = RevenueReport {
            total_revenue: 0.0,
            average_transaction: 0.0,
            completed_payments: 0,
            refunded_payments: 0,
            refunded_amount: 0.0,
            by_month: HashMap::new(),
            by_method: HashMap::new(),
        };
        for payment in &payments {
            match payment.status {
                PaymentStatus::Completed => {
                    report.completed_payments += 1;
                    report.total_revenue += payment.amount;
                    if let Some(paid_at) = payment.paid_at {
                        *report
                            .by_month
                            .entry(paid_at.format("%Y-%m").to_string())
                            .or_insert(0.0) += payment.amount;
                    }
                    *report
                        .by_method
                        .entry(payment.method.as_str().to_string())
                        .or_insert(0.0) += payment.amount;
                }
                PaymentStatus::Refunded => {
                    report.refunded_payments += 1;
                    report.refunded_amount += payment.amount;
                }
                _ => {}
            }
        }
        if report.completed_payments > 0 {
            report.average_transaction = report.total_revenue / report.completed_payments as f64;
        }
        Ok(report)
    }

    /// Registration and activity counters; admin only
    pub async fn users(&self, principal: &Principal) -> DomainResult<UserReport> {
        AuthService::require_admin(principal)?;
        let cutoff = Utc::now() - Duration::days(30);

        let users = self.user_repo.find_all().await?;
        let agents = self.agent_repo.find_all().await?;
        let bookings = self.booking_repo.find_all().await?;
        let booked: std::collections::HashSet<_> =
            bookings.iter().map(|b| b.user_id).collect();

        Ok(UserReport {
            total_users: users.len() as u64,
            new_users_30d: users.iter().filter(|u| u.created_at >= cutoff).count() as u64,
            total_agents: agents.len() as u64,
            approved_agents: agents
                .iter()
                .filter(|a| a.status == AgentStatus::Approved)
                .count() as u64,
            pending_agents: agents
                .iter()
                .filter(|a| a.status == AgentStatus::Pending)
                .count() as u64,
            users_with_bookings: users.iter().filter(|u| booked.contains(&u.id)).count()
                as u64,
        })
    }

    /// Stored snapshots of one period between two dates; admin only
    pub async fn history(
        &self,
        principal: &Principal,
        period: AnalyticsPeriod,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DomainResult<Vec<AnalyticsSnapshot>> {
        AuthService::require_admin(principal)?;
        self.analytics_repo.find_range(period, from, to).await
    }

    /// The most recent snapshot of one period; admin only
    pub async fn latest(
        &self,
        principal: &Principal,
        period: AnalyticsPeriod,
    ) -> DomainResult<Option<AnalyticsSnapshot>> {
        AuthService::require_admin(principal)?;
        self.analytics_repo.latest(period).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        Admin, Apartment, ApartmentCategory, Payment, PaymentMethod, User,
    };
    use crate::repositories::{
        MockAgentRepository, MockAnalyticsRepository, MockApartmentRepository,
        MockBookingRepository, MockInspectionRepository, MockPaymentRepository,
        MockReportRepository, MockReviewRepository, MockUserRepository,
    };

    struct Fixture {
        service: AnalyticsService,
        user_repo: Arc<MockUserRepository>,
        apartment_repo: Arc<MockApartmentRepository>,
        payment_repo: Arc<MockPaymentRepository>,
    }

    fn fixture() -> Fixture {
        let user_repo = Arc::new(MockUserRepository::new());
        let apartment_repo = Arc::new(MockApartmentRepository::new());
        let payment_repo = Arc::new(MockPaymentRepository::new());
        let service = AnalyticsService::new(
            Arc::new(MockAnalyticsRepository::new()),
            user_repo.clone(),
            Arc::new(MockAgentRepository::new()),
            apartment_repo.clone(),
            Arc::new(MockBookingRepository::new()),
            Arc::new(MockInspectionRepository::new()),
            Arc::new(MockReportRepository::new()),
            payment_repo.clone(),
            Arc::new(MockReviewRepository::new()),
        );
        Fixture {
            service,
            user_repo,
            apartment_repo,
            payment_repo,
        }
    }

    fn admin() -> Principal {
        Principal::Admin(Admin::new(
            "Root".to_string(),
            "root@example.com".to_string(),
            "hash".to_string(),
        ))
    }

    #[tokio::test]
    async fn test_collect_counts_and_is_idempotent() {
        let fx = fixture();
        fx.user_repo
            .create(User::new(
                "Ada".to_string(),
                "ada@example.com".to_string(),
                "hash".to_string(),
                "0800".to_string(),
            ))
            .await
            .unwrap();
        for (location, price) in [("Yaba", 400.0), ("Yaba", 800.0), ("Lekki", 2500.0)] {
            fx.apartment_repo
                .create(Apartment::new(
                    uuid::Uuid::new_v4(),
                    location.to_string(),
                    price,
                    ApartmentCategory::Studio,
                    "desc".to_string(),
                    vec![],
                ))
                .await
                .unwrap();
        }

        let today = Utc::now().date_naive();
        let snapshot = fx
            .service
            .collect(today, AnalyticsPeriod::Daily)
            .await
            .unwrap();
        assert_eq!(snapshot.metrics.total_users, 1);
        assert_eq!(snapshot.metrics.new_users, 1);
        assert_eq!(snapshot.metrics.total_apartments, 3);
        assert_eq!(snapshot.breakdown.popular_locations.get("Yaba"), Some(&2));
        assert_eq!(snapshot.breakdown.price_ranges.get("0-500"), Some(&1));
        assert_eq!(snapshot.breakdown.price_ranges.get("2001+"), Some(&1));

        // Second collection replaces the slot instead of duplicating it
        let again = fx
            .service
            .collect(today, AnalyticsPeriod::Daily)
            .await
            .unwrap();
        assert_eq!(again.metrics.total_apartments, 3);
    }

    #[tokio::test]
    async fn test_revenue_report_counts_completed_and_refunded() {
        let fx = fixture();
        let user_id = uuid::Uuid::new_v4();
        let apartment_id = uuid::Uuid::new_v4();

        let mut completed = Payment::new(
            user_id,
            apartment_id,
            None,
            1200.0,
            PaymentMethod::Card,
            "USD".to_string(),
            "TXN-1".to_string(),
            Duration::seconds(0),
        );
        completed.status = PaymentStatus::Completed;
        completed.paid_at = Some(Utc::now());
        fx.payment_repo.create(completed).await.unwrap();

        let mut refunded = Payment::new(
            user_id,
            apartment_id,
            None,
            800.0,
            PaymentMethod::BankTransfer,
            "USD".to_string(),
            "TXN-2".to_string(),
            Duration::seconds(0),
        );
        refunded.status = PaymentStatus::Refunded;
        fx.payment_repo.create(refunded).await.unwrap();

        let report = fx.service.revenue(&admin()).await.unwrap();
        assert_eq!(report.completed_payments, 1);
        assert_eq!(report.total_revenue, 1200.0);
        assert_eq!(report.average_transaction, 1200.0);
        assert_eq!(report.refunded_payments, 1);
        assert_eq!(report.refunded_amount, 800.0);
        assert_eq!(report.by_method.get("card"), Some(&1200.0));
        let month = Utc::now().format("%Y-%m").to_string();
        assert_eq!(report.by_month.get(&month), Some(&1200.0));
    }

    #[tokio::test]
    async fn test_user_report_requires_admin() {
        let fx = fixture();
        let user = User::new(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "hash".to_string(),
            "0800".to_string(),
        );
        let principal = Principal::User(user);
        assert!(fx.service.users(&principal).await.is_err());
        let report = fx.service.users(&admin()).await.unwrap();
        assert_eq!(report.total_users, 0);
    }
}
