//! End-to-end HTTP tests running the full routing and service stack over
//! the in-memory repositories.

use std::sync::Arc;

use actix_web::{test, web, App};
use serde_json::{json, Value};
use uuid::Uuid;

use rn_api::{routes, AppState, Repositories};
use rn_core::domain::entities::{Apartment, ApartmentCategory};
use rn_core::repositories::ApartmentRepository;
use rn_core::repositories::{
    MockAdminRepository, MockAgentRepository, MockAnalyticsRepository, MockApartmentRepository,
    MockBookingRepository, MockFavoriteRepository, MockInspectionRepository,
    MockNotificationRepository, MockPaymentRepository, MockReportRepository,
    MockReviewRepository, MockUserRepository,
};
use rn_shared::config::{AuthConfig, SettlementConfig};

struct TestEnv {
    state: web::Data<AppState>,
    apartments: Arc<MockApartmentRepository>,
}

fn test_env() -> TestEnv {
    let apartments = Arc::new(MockApartmentRepository::new());
    let repos = Repositories {
        users: Arc::new(MockUserRepository::new()),
        agents: Arc::new(MockAgentRepository::new()),
        admins: Arc::new(MockAdminRepository::new()),
        apartments: apartments.clone(),
        bookings: Arc::new(MockBookingRepository::new()),
        payments: Arc::new(MockPaymentRepository::new()),
        inspections: Arc::new(MockInspectionRepository::new()),
        reviews: Arc::new(MockReviewRepository::new()),
        reports: Arc::new(MockReportRepository::new()),
        favorites: Arc::new(MockFavoriteRepository::new()),
        notifications: Arc::new(MockNotificationRepository::new()),
        analytics: Arc::new(MockAnalyticsRepository::new()),
    };
    let auth = AuthConfig {
        jwt_secret: "test-secret".into(),
        token_expiry_days: 1,
        // lowest cost bcrypt allows, to keep the tests fast
        bcrypt_cost: 4,
    };
    TestEnv {
        state: web::Data::new(AppState::new(repos, &auth, &SettlementConfig::default())),
        apartments,
    }
}

macro_rules! init_app {
    ($env:expr) => {
        test::init_service(
            App::new()
                .app_data($env.state.clone())
                .configure(routes::configure),
        )
        .await
    };
}

async fn seed_apartment(env: &TestEnv) -> Apartment {
    env.apartments
        .create(Apartment::new(
            Uuid::new_v4(),
            "Victoria Island, Lagos".to_string(),
            1200.0,
            ApartmentCategory::Studio,
            "Bright studio close to the waterfront".to_string(),
            vec![],
        ))
        .await
        .expect("seed apartment")
}

fn user_payload(email: &str) -> Value {
    json!({
        "name": "Ada Obi",
        "email": email,
        "password": "s3cret-pass",
        "phone": "+2348012345678",
    })
}

#[actix_web::test]
async fn register_login_and_token_gate() {
    let env = test_env();
    let app = init_app!(env);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/user/register")
            .set_json(user_payload("ada@example.com"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], "ada@example.com");
    let token = body["token"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/user/login")
            .set_json(json!({ "email": "ada@example.com", "password": "s3cret-pass" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    // no token, no bookings
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/bookings/mine").to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/bookings/mine")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn duplicate_registration_is_rejected() {
    let env = test_env();
    let app = init_app!(env);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/user/register")
            .set_json(user_payload("dup@example.com"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/user/register")
            .set_json(user_payload("dup@example.com"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "CONFLICT");
}

async fn register_and_token(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    path: &str,
    payload: Value,
) -> (Value, String) {
    let resp = test::call_service(
        app,
        test::TestRequest::post()
            .uri(path)
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().expect("token").to_string();
    (body, token)
}

#[actix_web::test]
async fn booking_race_has_one_winner() {
    let env = test_env();
    let apartment = seed_apartment(&env).await;
    let app = init_app!(env);

    let (_, first) = register_and_token(
        &app,
        "/api/v1/auth/user/register",
        user_payload("first@example.com"),
    )
    .await;
    let (_, second) = register_and_token(
        &app,
        "/api/v1/auth/user/register",
        user_payload("second@example.com"),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/bookings")
            .insert_header(("Authorization", format!("Bearer {first}")))
            .set_json(json!({ "apartment_id": apartment.id }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let booking: Value = test::read_body_json(resp).await;
    assert_eq!(booking["status"], "pending");
    let booking_id = booking["id"].as_str().unwrap().to_string();

    // apartment is taken; the second caller loses
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/bookings")
            .insert_header(("Authorization", format!("Bearer {second}")))
            .set_json(json!({ "apartment_id": apartment.id }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "CONFLICT");

    // cancelling releases availability and the second caller can book
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/bookings/{booking_id}/cancel"))
            .insert_header(("Authorization", format!("Bearer {first}")))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/bookings")
            .insert_header(("Authorization", format!("Bearer {second}")))
            .set_json(json!({ "apartment_id": apartment.id }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
}

#[actix_web::test]
async fn admin_routes_reject_other_roles() {
    let env = test_env();
    let app = init_app!(env);

    let (_, user_token) = register_and_token(
        &app,
        "/api/v1/auth/user/register",
        user_payload("plain@example.com"),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/users")
            .insert_header(("Authorization", format!("Bearer {user_token}")))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 403);

    let (_, admin_token) = register_and_token(
        &app,
        "/api/v1/auth/admin/register",
        json!({
            "name": "Root Admin",
            "email": "admin@example.com",
            "password": "s3cret-pass",
        }),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/users")
            .insert_header(("Authorization", format!("Bearer {admin_token}")))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn agent_listing_requires_approval() {
    let env = test_env();
    let app = init_app!(env);

    let (agent_body, agent_token) = register_and_token(
        &app,
        "/api/v1/auth/agent/register",
        json!({
            "name": "Ben Eze",
            "email": "agent@example.com",
            "password": "s3cret-pass",
            "phone": "+2348098765432",
        }),
    )
    .await;
    let agent_id = agent_body["agent"]["id"].as_str().unwrap().to_string();

    let listing = json!({
        "location": "Lekki Phase 1, Lagos",
        "price": 2500.0,
        "category": "2-Bedroom",
        "description": "Two bedroom flat with parking",
    });

    // pending agents cannot publish
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/apartments")
            .insert_header(("Authorization", format!("Bearer {agent_token}")))
            .set_json(listing.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 403);

    let (_, admin_token) = register_and_token(
        &app,
        "/api/v1/auth/admin/register",
        json!({
            "name": "Root Admin",
            "email": "admin@example.com",
            "password": "s3cret-pass",
        }),
    )
    .await;
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/admin/agents/{agent_id}/decide"))
            .insert_header(("Authorization", format!("Bearer {admin_token}")))
            .set_json(json!({ "approve": true }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    // approval is read from the account on every request, the old token works
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/apartments")
            .insert_header(("Authorization", format!("Bearer {agent_token}")))
            .set_json(listing)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
}

#[actix_web::test]
async fn review_rating_is_validated() {
    let env = test_env();
    let apartment = seed_apartment(&env).await;
    let app = init_app!(env);

    let (_, token) = register_and_token(
        &app,
        "/api/v1/auth/user/register",
        user_payload("reviewer@example.com"),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/reviews")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({
                "apartment_id": apartment.id,
                "rating": 0,
                "comment": "?",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}
